//! Filter values: the per-property entries of a paging request's filter map

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value as Json};

use crate::error::{Error, Result};
use crate::value::Value;

/// Mapping from property path to filter value.
///
/// Insertion order is the order in which the compiler applies the entries.
pub type FilterMap = IndexMap<String, FilterValue>;

/// The value of one filter entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Skipped by the compiler
    Null,
    /// A string (containment or relational expression) or a scalar equality
    Scalar(Value),
    /// Operator token (`>`, `>=`, `<`, `<=`, `=`) to comparand
    Range(IndexMap<String, Value>),
    /// Set membership, OR across the elements
    Set(Vec<Value>),
}

impl FilterValue {
    /// Build a range value from `(operator, comparand)` pairs.
    pub fn range<K, V>(bounds: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        FilterValue::Range(
            bounds
                .into_iter()
                .map(|(op, value)| (op.into(), value.into()))
                .collect(),
        )
    }

    /// Build a set value.
    pub fn set<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        FilterValue::Set(values.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null | FilterValue::Scalar(Value::Null))
    }

    /// Convert a JSON value into a filter value for `property`.
    ///
    /// Arrays become sets and objects become ranges. Sets and ranges may only
    /// hold scalars; anything nested deeper is
    /// [`Error::UnsupportedFilterValueType`].
    pub fn from_json(property: &str, json: Json) -> Result<Self> {
        match json {
            Json::Null => Ok(FilterValue::Null),
            Json::Array(items) => items
                .into_iter()
                .map(|item| scalar_from_json(property, item))
                .collect::<Result<Vec<_>>>()
                .map(FilterValue::Set),
            Json::Object(bounds) => bounds
                .into_iter()
                .map(|(op, item)| Ok((op, scalar_from_json(property, item)?)))
                .collect::<Result<IndexMap<_, _>>>()
                .map(FilterValue::Range),
            scalar => Ok(FilterValue::Scalar(scalar_from_json(property, scalar)?)),
        }
    }

    /// The JSON form of this filter value.
    pub fn to_json(&self) -> Json {
        match self {
            FilterValue::Null => Json::Null,
            FilterValue::Scalar(value) => value_to_json(value),
            FilterValue::Range(bounds) => Json::Object(
                bounds
                    .iter()
                    .map(|(op, value)| (op.clone(), value_to_json(value)))
                    .collect::<Map<_, _>>(),
            ),
            FilterValue::Set(values) => Json::Array(values.iter().map(value_to_json).collect()),
        }
    }
}

/// Convert a JSON object into a filter map, keeping key order.
pub fn filter_map_from_json(json: Json) -> Result<FilterMap> {
    match json {
        Json::Null => Ok(FilterMap::new()),
        Json::Object(entries) => entries
            .into_iter()
            .map(|(property, value)| {
                let value = FilterValue::from_json(&property, value)?;
                Ok((property, value))
            })
            .collect(),
        other => Err(Error::UnsupportedFilterValueType {
            property: "Filter".to_string(),
            type_name: json_type_name(&other).to_string(),
        }),
    }
}

/// The JSON form of a filter map.
pub fn filter_map_to_json(filter: &FilterMap) -> Json {
    Json::Object(
        filter
            .iter()
            .map(|(property, value)| (property.clone(), value.to_json()))
            .collect(),
    )
}

fn scalar_from_json(property: &str, json: Json) -> Result<Value> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(b)),
        Json::String(s) => Ok(Value::String(s)),
        Json::Number(n) => Ok(number_to_value(&n)),
        other => Err(Error::UnsupportedFilterValueType {
            property: property.to_string(),
            type_name: json_type_name(&other).to_string(),
        }),
    }
}

fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        return Value::I64(i);
    }
    if let Some(u) = n.as_u64() {
        return Value::U64(u);
    }
    match Decimal::from_str(&n.to_string()) {
        Ok(d) => Value::Decimal(d),
        Err(_) => n.as_f64().map(Value::F64).unwrap_or(Value::Null),
    }
}

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::I64(i) => Json::from(*i),
        Value::U64(u) => Json::from(*u),
        Value::F64(f) => Number::from_f64(*f).map(Json::Number).unwrap_or(Json::Null),
        Value::Decimal(d) => Number::from_str(&d.normalize().to_string())
            .map(Json::Number)
            .unwrap_or_else(|_| Json::String(d.to_string())),
        Value::String(s) => Json::String(s.clone()),
        Value::DateTime(dt) => Json::String(dt.to_rfc3339()),
        Value::DateTimeOffset(dt) => Json::String(dt.to_rfc3339()),
    }
}

fn json_type_name(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FilterValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = Json::deserialize(deserializer)?;
        FilterValue::from_json("", json).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<Json> for FilterValue {
    type Error = Error;

    fn try_from(json: Json) -> Result<Self> {
        FilterValue::from_json("", json)
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FilterValue::Null,
            other => FilterValue::Scalar(other),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($t:ty),*) => {
        $(impl From<$t> for FilterValue {
            fn from(v: $t) -> Self {
                FilterValue::Scalar(Value::from(v))
            }
        })*
    };
}

impl_from_scalar!(
    bool,
    i32,
    i64,
    u32,
    u64,
    usize,
    f64,
    Decimal,
    String,
    &str,
    DateTime<Utc>,
    DateTime<FixedOffset>
);

impl<T: Into<Value>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        FilterValue::set(values)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for FilterValue {
    fn from(values: [T; N]) -> Self {
        FilterValue::set(values)
    }
}

pub(crate) fn serialize_filter_map<S: Serializer>(
    filter: &FilterMap,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    filter_map_to_json(filter).serialize(serializer)
}

pub(crate) fn deserialize_filter_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<FilterMap, D::Error> {
    let json = Json::deserialize(deserializer)?;
    filter_map_from_json(json).map_err(serde::de::Error::custom)
}
