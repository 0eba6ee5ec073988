//! Sort specification and its string grammar
//!
//! The string form is a comma-separated list of terms, each being
//! `<property>` or `<property> <order>`:
//!
//! ```text
//! Venue.Name, Name desc
//! ```
//!
//! Order tokens are case-insensitive (`asc`, `ascending`, `desc`,
//! `descending`); a term without one sorts ascending.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Direction of one sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Parse an order token, ignoring case.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.eq_ignore_ascii_case("asc") || token.eq_ignore_ascii_case("ascending") {
            Some(SortOrder::Ascending)
        } else if token.eq_ignore_ascii_case("desc") || token.eq_ignore_ascii_case("descending")
        {
            Some(SortOrder::Descending)
        } else {
            None
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("Asc"),
            SortOrder::Descending => f.write_str("Desc"),
        }
    }
}

/// Ordered mapping from property path to sort direction.
///
/// Insertion order is key priority. Keys are unique: inserting an existing
/// key updates its direction and keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec(IndexMap<String, SortOrder>);

impl SortSpec {
    /// Create an empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key, builder style.
    pub fn then(mut self, property: impl Into<String>, order: SortOrder) -> Self {
        self.insert(property, order);
        self
    }

    /// Add or update a key.
    pub fn insert(&mut self, property: impl Into<String>, order: SortOrder) {
        self.0.insert(property.into(), order);
    }

    /// Direction of `property`, if present.
    pub fn get(&self, property: &str) -> Option<SortOrder> {
        self.0.get(property).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate keys in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, SortOrder)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// The same keys with every direction flipped.
    pub fn reversed(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.reversed()))
                .collect(),
        )
    }

    /// Parse the string form.
    ///
    /// `None`, empty and whitespace-only input yield an empty specification.
    /// Empty term slots are skipped.
    pub fn parse(sort_by: Option<&str>) -> Result<Self> {
        let mut spec = Self::new();
        let Some(sort_by) = sort_by else {
            return Ok(spec);
        };

        for term in sort_by.split(',') {
            let term = term.trim();
            if term.is_empty() {
                continue;
            }

            let (property, order) = match term.split_once(char::is_whitespace) {
                Some((property, token)) => {
                    let token = token.trim();
                    let order = SortOrder::parse(token).ok_or_else(|| Error::InvalidSortOrder {
                        term: term.to_string(),
                        token: token.to_string(),
                    })?;
                    (property, order)
                }
                None => (term, SortOrder::Ascending),
            };
            spec.insert(property, order);
        }

        Ok(spec)
    }

    /// Canonical string form: `"k1 Asc, k2 Desc"`.
    ///
    /// An empty specification has no string form.
    pub fn to_sort_by(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(
            self.iter()
                .map(|(property, order)| format!("{property} {order}"))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

impl FromStr for SortSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(Some(s))
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_sort_by().as_deref().unwrap_or_default())
    }
}

impl<K: Into<String>> FromIterator<(K, SortOrder)> for SortSpec {
    fn from_iter<I: IntoIterator<Item = (K, SortOrder)>>(iter: I) -> Self {
        let mut spec = Self::new();
        for (property, order) in iter {
            spec.insert(property, order);
        }
        spec
    }
}

impl<'a> IntoIterator for &'a SortSpec {
    type Item = (&'a String, &'a SortOrder);
    type IntoIter = indexmap::map::Iter<'a, String, SortOrder>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
