//! Derive macros for the paging crate
//!
//! This crate provides the `Record` derive macro, which exposes struct
//! fields to the filter compiler and the ordering applier by property path.
//!
//! The macro is re-exported from the `paging` crate, so users typically
//! don't need to depend on this crate directly.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod record;

/// Derive macro for addressing struct fields by property path.
///
/// This macro generates an implementation of the `Record` trait. Every
/// field type must implement `paging::ToValue`, except nested records.
///
/// # Attributes
///
/// - `#[paging(rename = "PropertyName")]` - Address this field under a different name
/// - `#[paging(skip)]` - Hide this field from filters and sorting
/// - `#[paging(nested)]` - The field is itself a `Record`; `Venue.Name` reads `Name` of `venue`
///
/// # Example
///
/// ```ignore
/// use paging::Record;
///
/// #[derive(Record)]
/// pub struct Concert {
///     pub id: i64,
///     pub name: String,
///     #[paging(nested)]
///     pub venue: Venue,
///     #[paging(skip)]
///     pub internal_notes: String,
/// }
/// ```
#[proc_macro_derive(Record, attributes(paging))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::derive_record_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
