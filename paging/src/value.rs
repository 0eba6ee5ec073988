//! Dynamic Value type for filter operands and record properties

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The static kind of a record property.
///
/// Literals are coerced into the property's kind before a predicate is bound,
/// the same way a query engine coerces constants against a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Bool,
    Integer,
    Float,
    Decimal,
    String,
    DateTime,
    DateTimeOffset,
}

impl FieldKind {
    /// Name used in error messages
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Decimal => "decimal",
            FieldKind::String => "string",
            FieldKind::DateTime => "datetime",
            FieldKind::DateTimeOffset => "datetimeoffset",
        }
    }

    /// Whether values of this kind are numbers
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FieldKind::Integer | FieldKind::Float | FieldKind::Decimal
        )
    }
}

/// A dynamic value that can represent any filterable property.
///
/// Equality and hashing are total: floats compare by bit pattern so that
/// requests carrying float filters can be used as map keys.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent value
    Null,
    /// Boolean value
    Bool(bool),
    /// Signed integer
    I64(i64),
    /// Unsigned integer
    U64(u64),
    /// Floating point
    F64(f64),
    /// Fixed-point decimal
    Decimal(Decimal),
    /// String/text value
    String(String),
    /// Instant in UTC
    DateTime(DateTime<Utc>),
    /// Instant with its original offset
    DateTimeOffset(DateTime<FixedOffset>),
}

impl Value {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I64(_) => "i64",
            Value::U64(_) => "u64",
            Value::F64(_) => "f64",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::DateTimeOffset(_) => "datetimeoffset",
        }
    }

    /// The kind of this value, `None` for null.
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(FieldKind::Bool),
            Value::I64(_) | Value::U64(_) => Some(FieldKind::Integer),
            Value::F64(_) => Some(FieldKind::Float),
            Value::Decimal(_) => Some(FieldKind::Decimal),
            Value::String(_) => Some(FieldKind::String),
            Value::DateTime(_) => Some(FieldKind::DateTime),
            Value::DateTimeOffset(_) => Some(FieldKind::DateTimeOffset),
        }
    }

    /// Borrow the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The string form of the value as used by text containment filters.
    ///
    /// Null renders as the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::U64(v) => v.to_string(),
            Value::F64(v) => v.to_string(),
            Value::Decimal(v) => v.normalize().to_string(),
            Value::String(v) => v.clone(),
            Value::DateTime(v) => v.to_rfc3339(),
            Value::DateTimeOffset(v) => v.to_rfc3339(),
        }
    }

    /// Compare two values.
    ///
    /// Numbers compare across widths, both date-time variants compare as
    /// instants. Null equals only null and is unordered against anything else.
    /// Values of unrelated kinds are incomparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Null, _) | (_, Value::Null) => None,
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (a, b) if a.is_datetime() && b.is_datetime() => {
                Some(a.as_instant()?.cmp(&b.as_instant()?))
            }
            (a, b) if a.is_numeric() && b.is_numeric() => compare_numbers(a, b),
            _ => None,
        }
    }

    /// Coerce this value into the given kind without losing information.
    ///
    /// Strings convert into date-time kinds when they parse as ISO-8601;
    /// nothing else converts to or from strings. Null casts to every kind.
    pub fn cast_to(&self, kind: FieldKind) -> Option<Value> {
        if self.is_null() {
            return Some(Value::Null);
        }
        match kind {
            FieldKind::Bool => match self {
                Value::Bool(v) => Some(Value::Bool(*v)),
                _ => None,
            },
            FieldKind::String => match self {
                Value::String(v) => Some(Value::String(v.clone())),
                _ => None,
            },
            FieldKind::Integer => match self {
                Value::I64(_) | Value::U64(_) => Some(self.clone()),
                Value::Decimal(d) if d.fract().is_zero() => d.to_i64().map(Value::I64),
                Value::F64(f) if f.fract() == 0.0 && f.is_finite() => {
                    let i = *f as i64;
                    (i as f64 == *f).then_some(Value::I64(i))
                }
                _ => None,
            },
            FieldKind::Float => self.as_f64().map(Value::F64),
            FieldKind::Decimal => self.as_decimal().map(Value::Decimal),
            FieldKind::DateTime => match self {
                Value::DateTime(v) => Some(Value::DateTime(*v)),
                Value::DateTimeOffset(v) => Some(Value::DateTime(v.with_timezone(&Utc))),
                Value::String(s) => parse_datetime(s).map(|dt| Value::DateTime(dt.with_timezone(&Utc))),
                _ => None,
            },
            FieldKind::DateTimeOffset => match self {
                Value::DateTimeOffset(v) => Some(Value::DateTimeOffset(*v)),
                Value::DateTime(v) => Some(Value::DateTimeOffset(v.fixed_offset())),
                Value::String(s) => parse_datetime(s).map(Value::DateTimeOffset),
                _ => None,
            },
        }
    }

    /// Coerce a filter literal against a property of the given kind.
    ///
    /// Numbers stay as they are when the property is numeric, so `2009.5`
    /// still compares against an integer property. Everything else goes
    /// through [`cast_to`](Self::cast_to).
    pub fn coerce_to(&self, kind: FieldKind) -> Option<Value> {
        if kind.is_numeric() && self.is_numeric() {
            return Some(self.clone());
        }
        self.cast_to(kind)
    }

    fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::I64(_) | Value::U64(_) | Value::F64(_) | Value::Decimal(_)
        )
    }

    fn is_datetime(&self) -> bool {
        matches!(self, Value::DateTime(_) | Value::DateTimeOffset(_))
    }

    fn as_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(v) => Some(*v),
            Value::DateTimeOffset(v) => Some(v.with_timezone(&Utc)),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::I64(v) => Some(*v as f64),
            Value::U64(v) => Some(*v as f64),
            Value::F64(v) => Some(*v),
            Value::Decimal(v) => v.to_f64(),
            _ => None,
        }
    }

    fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::I64(v) => Some(Decimal::from(*v)),
            Value::U64(v) => Some(Decimal::from(*v)),
            Value::F64(v) => Decimal::from_f64(*v),
            Value::Decimal(v) => Some(*v),
            _ => None,
        }
    }
}

fn compare_numbers(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::I64(x), Value::I64(y)) => Some(x.cmp(y)),
        (Value::U64(x), Value::U64(y)) => Some(x.cmp(y)),
        (Value::I64(x), Value::U64(y)) => Some(i128::from(*x).cmp(&i128::from(*y))),
        (Value::U64(x), Value::I64(y)) => Some(i128::from(*x).cmp(&i128::from(*y))),
        (Value::F64(_), _) | (_, Value::F64(_)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        _ => Some(a.as_decimal()?.cmp(&b.as_decimal()?)),
    }
}

/// Parse an ISO-8601 date-time under invariant rules.
///
/// Inputs without an offset are taken as UTC. A bare date means midnight UTC.
pub fn parse_datetime(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive).fixed_offset());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a.to_bits() == b.to_bits(),
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::DateTimeOffset(a), Value::DateTimeOffset(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(v) => v.hash(state),
            Value::I64(v) => v.hash(state),
            Value::U64(v) => v.hash(state),
            Value::F64(v) => v.to_bits().hash(state),
            Value::Decimal(v) => v.hash(state),
            Value::String(v) => v.hash(state),
            Value::DateTime(v) => v.hash(state),
            Value::DateTimeOffset(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::String(s) => write!(f, "\"{s}\""),
            other => f.write_str(&other.to_text()),
        }
    }
}

// Implement From for common types
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::I64(i64::from(v))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::U64(u64::from(v))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::U64(v as u64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F64(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::DateTimeOffset(v)
    }
}

// Implement From for Option<T> where T: Into<Value>
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_numbers_compare_across_widths() {
        assert_eq!(
            Value::I64(5000).compare(&Value::Decimal(Decimal::new(5000, 0))),
            Some(Ordering::Equal)
        );
        assert_eq!(
            Value::U64(3).compare(&Value::I64(-1)),
            Some(Ordering::Greater)
        );
        assert_eq!(Value::F64(1.5).compare(&Value::I64(2)), Some(Ordering::Less));
    }

    #[test]
    fn test_null_is_unordered() {
        assert_eq!(Value::Null.compare(&Value::Null), Some(Ordering::Equal));
        assert_eq!(Value::Null.compare(&Value::I64(1)), None);
    }

    #[test]
    fn test_mismatched_kinds_are_incomparable() {
        assert_eq!(Value::from("5").compare(&Value::I64(5)), None);
        assert_eq!(Value::Bool(true).compare(&Value::I64(1)), None);
    }

    #[test]
    fn test_datetimes_compare_as_instants() {
        let utc = Utc.with_ymd_and_hms(2012, 1, 1, 0, 0, 0).unwrap();
        let offset = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2012, 1, 1, 1, 0, 0)
            .unwrap();
        assert_eq!(
            Value::DateTime(utc).compare(&Value::DateTimeOffset(offset)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_cast_string_to_datetime() {
        let cast = Value::from("2012-01-01T00:00:00Z").cast_to(FieldKind::DateTime);
        assert_eq!(
            cast,
            Some(Value::DateTime(Utc.with_ymd_and_hms(2012, 1, 1, 0, 0, 0).unwrap()))
        );
        assert_eq!(Value::from("wrong-type").cast_to(FieldKind::Decimal), None);
    }

    #[test]
    fn test_cast_integral_decimal_to_integer() {
        assert_eq!(
            Value::Decimal(Decimal::new(2010, 0)).cast_to(FieldKind::Integer),
            Some(Value::I64(2010))
        );
        assert_eq!(
            Value::Decimal(Decimal::new(20105, 1)).cast_to(FieldKind::Integer),
            None
        );
    }

    #[test]
    fn test_parse_datetime_formats() {
        assert!(parse_datetime("2019-01-01").is_some());
        assert!(parse_datetime("2019-01-01T10:00:00").is_some());
        assert!(parse_datetime("2019-01-01T10:00:00+02:00").is_some());
        assert!(parse_datetime("5000").is_none());
        assert!(parse_datetime("").is_none());
    }

    #[test]
    fn test_text_form() {
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::Decimal(Decimal::new(15000, 0)).to_text(), "15000");
        assert_eq!(Value::from("Audi").to_text(), "Audi");
        assert_eq!(Value::Decimal(Decimal::new(50000, 1)).to_text(), "5000");
        assert_eq!(Value::Decimal(Decimal::new(12500, 3)).to_text(), "12.5");
    }

    #[test]
    fn test_coerce_keeps_fractional_numbers() {
        let half = Value::Decimal(Decimal::new(20095, 1));
        assert_eq!(half.coerce_to(FieldKind::Integer), Some(half.clone()));
        assert_eq!(Value::F64(0.5).coerce_to(FieldKind::Integer), Some(Value::F64(0.5)));
        assert_eq!(Value::from("2010").coerce_to(FieldKind::Integer), None);
        assert_eq!(Value::I64(3).coerce_to(FieldKind::String), None);
    }
}
