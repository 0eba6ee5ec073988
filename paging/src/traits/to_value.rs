//! ToValue trait for converting Rust field types to filterable values

use crate::value::{FieldKind, Value};
use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;

/// Trait for types that can be read as a filterable property.
///
/// This is automatically implemented for common Rust types and can
/// be manually implemented for custom types (e.g., enums stored as text).
/// `KIND` is the static schema information the filter compiler binds
/// literals against.
pub trait ToValue {
    /// Kind of the property when declared with this type.
    const KIND: FieldKind;

    /// Convert this value to a dynamic value.
    fn to_value(&self) -> Value;
}

impl ToValue for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! impl_to_value_int {
    ($($t:ty),*) => {
        $(impl ToValue for $t {
            const KIND: FieldKind = FieldKind::Integer;

            fn to_value(&self) -> Value {
                Value::from(*self)
            }
        })*
    };
}

impl_to_value_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl ToValue for f32 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_value(&self) -> Value {
        Value::F64(f64::from(*self))
    }
}

impl ToValue for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_value(&self) -> Value {
        Value::F64(*self)
    }
}

impl ToValue for Decimal {
    const KIND: FieldKind = FieldKind::Decimal;

    fn to_value(&self) -> Value {
        Value::Decimal(*self)
    }
}

impl ToValue for String {
    const KIND: FieldKind = FieldKind::String;

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ToValue for str {
    const KIND: FieldKind = FieldKind::String;

    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToValue for DateTime<Utc> {
    const KIND: FieldKind = FieldKind::DateTime;

    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }
}

impl ToValue for DateTime<FixedOffset> {
    const KIND: FieldKind = FieldKind::DateTimeOffset;

    fn to_value(&self) -> Value {
        Value::DateTimeOffset(*self)
    }
}

// Implement for Option<T>
impl<T: ToValue> ToValue for Option<T> {
    const KIND: FieldKind = T::KIND;

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

// Implement for references
impl<T: ToValue + ?Sized> ToValue for &T {
    const KIND: FieldKind = T::KIND;

    fn to_value(&self) -> Value {
        (*self).to_value()
    }
}
