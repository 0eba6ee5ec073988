//! Record derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Field, Fields, Ident, Result};

/// Parse the paging attribute and extract configuration
struct FieldConfig {
    /// The field identifier
    ident: Ident,
    /// Property name to expose (may be renamed)
    property_name: String,
    /// Whether to hide this field
    skip: bool,
    /// Whether the field is itself a record
    nested: bool,
    /// The field type
    ty: syn::Type,
}

impl FieldConfig {
    /// Lowercase ASCII with underscores removed, as matched by `segment_matches`.
    fn normalized_name(&self) -> String {
        self.property_name
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }
}

fn parse_field_config(field: &Field) -> Result<FieldConfig> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new(field.span(), "tuple structs are not supported"))?;

    let mut property_name = ident.unraw().to_string();
    let mut skip = false;
    let mut nested = false;

    for attr in &field.attrs {
        if attr.path().is_ident("paging") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value = meta.value()?;
                    let lit: syn::LitStr = value.parse()?;
                    property_name = lit.value();
                } else if meta.path.is_ident("skip") {
                    skip = true;
                } else if meta.path.is_ident("nested") {
                    nested = true;
                } else {
                    return Err(meta.error(format!(
                        "unknown paging attribute `{}`",
                        meta.path
                            .get_ident()
                            .map(|i| i.to_string())
                            .unwrap_or_default()
                    )));
                }
                Ok(())
            })?;
        }
    }

    if property_name.is_empty() || property_name.contains('.') {
        return Err(Error::new(
            field.span(),
            "property names must be non-empty and must not contain '.'",
        ));
    }

    Ok(FieldConfig {
        ident,
        property_name,
        skip,
        nested,
        ty: field.ty.clone(),
    })
}

pub fn derive_record_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return Err(Error::new(input.span(), "only named fields are supported")),
        },
        _ => return Err(Error::new(input.span(), "only structs are supported")),
    };

    let field_configs: Vec<FieldConfig> = fields
        .iter()
        .map(parse_field_config)
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .filter(|c| !c.skip)
        .collect();

    // Static kind lookup, delegating the rest of the path to nested records
    let kind_arms: Vec<TokenStream> = field_configs
        .iter()
        .map(|config| {
            let normalized = config.normalized_name();
            let ty = &config.ty;
            let lookup = if config.nested {
                quote! {
                    rest.and_then(<#ty as paging::Record>::field_kind)
                }
            } else {
                quote! {
                    match rest {
                        None => Some(<#ty as paging::ToValue>::KIND),
                        Some(_) => None,
                    }
                }
            };
            quote! {
                if paging::record::segment_matches(head, #normalized) {
                    return #lookup;
                }
            }
        })
        .collect();

    // Instance reads
    let field_arms: Vec<TokenStream> = field_configs
        .iter()
        .map(|config| {
            let normalized = config.normalized_name();
            let field_ident = &config.ident;
            let read = if config.nested {
                quote! {
                    rest.and_then(|rest| paging::Record::field(&self.#field_ident, rest))
                }
            } else {
                quote! {
                    match rest {
                        None => Some(paging::ToValue::to_value(&self.#field_ident)),
                        Some(_) => None,
                    }
                }
            };
            quote! {
                if paging::record::segment_matches(head, #normalized) {
                    return #read;
                }
            }
        })
        .collect();

    let property_names: Vec<&str> = field_configs
        .iter()
        .map(|c| c.property_name.as_str())
        .collect();

    let expanded = quote! {
        impl #impl_generics paging::Record for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn field_kind(path: &str) -> Option<paging::FieldKind> {
                let (head, rest) = paging::record::split_path(path);
                #(#kind_arms)*
                None
            }

            #[allow(unused_variables)]
            fn field(&self, path: &str) -> Option<paging::Value> {
                let (head, rest) = paging::record::split_path(path);
                #(#field_arms)*
                None
            }

            fn property_names() -> &'static [&'static str] {
                &[#(#property_names),*]
            }
        }
    };

    Ok(expanded)
}
