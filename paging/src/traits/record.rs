//! Record trait: property lookup on the element type

use crate::value::{FieldKind, Value};

/// A type whose properties can be addressed by name.
///
/// Property paths are dotted (`Venue.Name`). Each segment matches a field
/// ignoring ASCII case and underscores, so `LastService`, `lastservice` and
/// `last_service` all address the same field.
///
/// This trait is typically implemented via the `#[derive(Record)]` macro.
///
/// # Manual Implementation
///
/// ```ignore
/// use paging::{FieldKind, Record, ToValue, Value};
/// use paging::record::{segment_matches, split_path};
///
/// pub struct User {
///     pub id: i64,
///     pub user_name: String,
/// }
///
/// impl Record for User {
///     fn field_kind(path: &str) -> Option<FieldKind> {
///         match split_path(path) {
///             (head, None) if segment_matches(head, "id") => Some(FieldKind::Integer),
///             (head, None) if segment_matches(head, "username") => Some(FieldKind::String),
///             _ => None,
///         }
///     }
///
///     fn field(&self, path: &str) -> Option<Value> {
///         match split_path(path) {
///             (head, None) if segment_matches(head, "id") => Some(self.id.to_value()),
///             (head, None) if segment_matches(head, "username") => Some(self.user_name.to_value()),
///             _ => None,
///         }
///     }
///
///     fn property_names() -> &'static [&'static str] {
///         &["id", "user_name"]
///     }
/// }
/// ```
pub trait Record {
    /// Static kind of the property at `path`, `None` if there is no such property.
    fn field_kind(path: &str) -> Option<FieldKind>;

    /// Read the property at `path`, `None` if there is no such property.
    fn field(&self, path: &str) -> Option<Value>;

    /// Top-level property names, in declaration order.
    fn property_names() -> &'static [&'static str];

    /// Whether `path` names a property of this type.
    fn has_property(path: &str) -> bool {
        Self::field_kind(path).is_some()
    }
}

/// Split a dotted path into its first segment and the remainder.
pub fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (head.trim(), Some(rest)),
        None => (path.trim(), None),
    }
}

/// Normalize a property name: lowercase ASCII, underscores removed.
pub fn normalize_segment(segment: &str) -> String {
    segment
        .chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Compare a path segment with an already normalized property name.
pub fn segment_matches(segment: &str, normalized: &str) -> bool {
    segment
        .chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .eq(normalized.chars())
}
