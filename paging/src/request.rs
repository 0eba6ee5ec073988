//! Paging request: page window, sorting, search and filter

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filter::{deserialize_filter_map, serialize_filter_map, FilterMap, FilterValue};
use crate::sort::SortSpec;

/// A declarative request for one page of a filtered, sorted source.
///
/// `sort_by` is the canonical sort state; [`sorting`](Self::sorting) is a
/// view computed from it on demand.
///
/// # Example
///
/// ```ignore
/// use paging::{PagingRequest, SortOrder, SortSpec};
///
/// let request = PagingRequest::new()
///     .with_page(2)
///     .with_items_per_page(30)
///     .with_sorting(SortSpec::new().then("Venue.Name", SortOrder::Ascending));
///
/// assert_eq!(
///     request.to_query_string(),
///     "CurrentPage=2&ItemsPerPage=30&SortBy=Venue.Name%20Asc"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PagingRequest {
    /// One-based page index
    pub current_page: usize,
    /// Page size, 0 means a single page holding every match
    pub items_per_page: usize,
    /// String form of the sort specification
    pub sort_by: Option<String>,
    /// Flip every sort direction
    pub reverse: bool,
    /// Free-text search, only used together with a caller search predicate
    pub search: Option<String>,
    /// Per-property filter entries
    #[serde(
        serialize_with = "serialize_filter_map",
        deserialize_with = "deserialize_filter_map"
    )]
    pub filter: FilterMap,
}

impl Default for PagingRequest {
    fn default() -> Self {
        Self {
            current_page: 1,
            items_per_page: 0,
            sort_by: None,
            reverse: false,
            search: None,
            filter: FilterMap::new(),
        }
    }
}

impl PagingRequest {
    /// Create a request for the first page holding everything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, current_page: usize) -> Self {
        self.current_page = current_page;
        self
    }

    pub fn with_items_per_page(mut self, items_per_page: usize) -> Self {
        self.items_per_page = items_per_page;
        self
    }

    pub fn with_sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    pub fn with_sorting(mut self, sorting: SortSpec) -> Self {
        self.set_sorting(Some(sorting));
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Add one filter entry, replacing any previous value for `property`.
    pub fn with_filter(mut self, property: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filter.insert(property.into(), value.into());
        self
    }

    /// Decode the sort specification from `sort_by`.
    pub fn sorting(&self) -> Result<SortSpec> {
        SortSpec::parse(self.sort_by.as_deref())
    }

    /// Replace the sort state. `None` or an empty specification clears it.
    pub fn set_sorting(&mut self, sorting: Option<SortSpec>) {
        self.sort_by = sorting.and_then(|spec| spec.to_sort_by());
    }

    /// Whether a non-blank sort string is present.
    pub fn has_sort_by(&self) -> bool {
        self.sort_by.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    /// Percent-encoded query string.
    ///
    /// Key order is fixed: `CurrentPage`, `ItemsPerPage`, then `SortBy`,
    /// `Reverse` and `Search` when set. The filter is never included.
    pub fn to_query_string(&self) -> String {
        let mut query = format!(
            "CurrentPage={}&ItemsPerPage={}",
            self.current_page, self.items_per_page
        );
        if let Some(sort_by) = self.sort_by.as_deref().filter(|s| !s.is_empty()) {
            query.push_str("&SortBy=");
            query.push_str(&urlencoding::encode(sort_by));
        }
        if self.reverse {
            query.push_str("&Reverse=True");
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            query.push_str("&Search=");
            query.push_str(&urlencoding::encode(search));
        }
        query
    }

    /// Parse the format produced by [`to_query_string`](Self::to_query_string).
    ///
    /// Keys match ignoring case; unknown keys are ignored.
    pub fn from_query_string(query: &str) -> Result<Self> {
        let mut request = Self::default();
        let query = query.trim().trim_start_matches('?');

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
            let value = urlencoding::decode(raw)
                .map_err(|e| Error::InvalidQueryString(format!("{key}: {e}")))?;

            if key.eq_ignore_ascii_case("CurrentPage") {
                request.current_page = parse_number(key, &value)?;
                if request.current_page == 0 {
                    return Err(Error::InvalidQueryString(
                        "CurrentPage must be at least 1".to_string(),
                    ));
                }
            } else if key.eq_ignore_ascii_case("ItemsPerPage") {
                request.items_per_page = parse_number(key, &value)?;
            } else if key.eq_ignore_ascii_case("SortBy") {
                request.sort_by = Some(value.into_owned()).filter(|s| !s.is_empty());
            } else if key.eq_ignore_ascii_case("Reverse") {
                request.reverse = parse_bool(key, &value)?;
            } else if key.eq_ignore_ascii_case("Search") {
                request.search = Some(value.into_owned()).filter(|s| !s.is_empty());
            }
        }

        Ok(request)
    }
}

fn parse_number(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidQueryString(format!("{key} is not a number: '{value}'")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::InvalidQueryString(format!(
            "{key} is not a boolean: '{value}'"
        )))
    }
}

// Filter is not hashed.
impl Hash for PagingRequest {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.current_page.hash(state);
        self.items_per_page.hash(state);
        self.sort_by.hash(state);
        self.reverse.hash(state);
        self.search.hash(state);
    }
}

impl fmt::Display for PagingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl FromStr for PagingRequest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_query_string(s)
    }
}
