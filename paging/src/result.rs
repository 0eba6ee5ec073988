//! Pagination result: one page of items plus the counts to navigate

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::request::PagingRequest;

/// One page of mapped items.
///
/// `total_count` counts matches after search and filter; `total_count_unfiltered`
/// counts the whole source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaginationResult<T> {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub total_count_unfiltered: usize,
    pub items: Vec<T>,
}

impl<T> Default for PaginationResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> PaginationResult<T> {
    /// A single empty page.
    pub fn empty() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_count: 0,
            total_count_unfiltered: 0,
            items: Vec::new(),
        }
    }

    /// A single page holding all of `items`.
    pub fn from_items(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            current_page: 1,
            total_pages: 1,
            total_count: count,
            total_count_unfiltered: count,
            items,
        }
    }

    /// The page `request` asked for, with counts captured by the pipeline.
    ///
    /// `total_pages` is `ceil(total_count / items_per_page)`, or 1 when the
    /// request does not page.
    pub fn from_parts(
        request: &PagingRequest,
        items: Option<Vec<T>>,
        total_count: usize,
        total_count_unfiltered: usize,
    ) -> Self {
        let total_pages = match request.items_per_page {
            0 => 1,
            per_page => total_count.div_ceil(per_page),
        };
        Self {
            current_page: request.current_page,
            total_pages,
            total_count,
            total_count_unfiltered,
            items: items.unwrap_or_default(),
        }
    }

    /// Whether a page after the current one exists.
    pub fn has_more_pages(&self) -> bool {
        self.total_pages > self.current_page
    }

    /// Whether a scrolling consumer has loaded everything `request` can reach.
    pub fn should_stop_scroll(&self, request: &PagingRequest) -> bool {
        request.items_per_page.saturating_mul(request.current_page) >= self.total_count
    }

    /// Project the items into another type, keeping page and counts.
    ///
    /// `projection` must preserve order and length.
    pub fn map_items<U, F>(self, projection: F) -> PaginationResult<U>
    where
        F: FnOnce(Vec<T>) -> Vec<U>,
    {
        PaginationResult {
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_count: self.total_count,
            total_count_unfiltered: self.total_count_unfiltered,
            items: projection(self.items),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Whether to stop loading more pages.
///
/// Without a result nothing has been loaded yet, so scrolling goes on.
pub fn stop_scroll<T>(
    result: Option<&PaginationResult<T>>,
    request: Option<&PagingRequest>,
) -> Result<bool> {
    let Some(result) = result else {
        return Ok(false);
    };
    let request = request.ok_or(Error::NullArgument("request"))?;
    Ok(result.should_stop_scroll(request))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: usize, per_page: usize) -> PagingRequest {
        PagingRequest::new()
            .with_page(page)
            .with_items_per_page(per_page)
    }

    #[test]
    fn test_empty_result() {
        let result = PaginationResult::<i32>::default();
        assert_eq!(result.current_page, 1);
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.total_count, 0);
        assert!(result.is_empty());
        assert!(!result.has_more_pages());
    }

    #[test]
    fn test_from_items() {
        let result = PaginationResult::from_items(vec![1, 2, 3]);
        assert_eq!(result.total_count, 3);
        assert_eq!(result.total_count_unfiltered, 3);
        assert_eq!(result.total_pages, 1);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let result = PaginationResult::from_parts(&request(1, 4), Some(vec![0; 4]), 10, 10);
        assert_eq!(result.total_pages, 3);
        assert!(result.has_more_pages());

        let result = PaginationResult::<i32>::from_parts(&request(1, 4), None, 8, 10);
        assert_eq!(result.total_pages, 2);
        assert!(result.items.is_empty());

        let result = PaginationResult::<i32>::from_parts(&request(1, 4), None, 0, 10);
        assert_eq!(result.total_pages, 0);
    }

    #[test]
    fn test_no_paging_is_one_page() {
        let result = PaginationResult::from_parts(&request(3, 0), Some(vec![1, 2]), 2, 5);
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.current_page, 3);
    }

    #[test]
    fn test_stop_scroll() {
        let result = PaginationResult::from_parts(&request(2, 5), Some(vec![0; 5]), 12, 12);
        assert!(!stop_scroll(Some(&result), Some(&request(2, 5))).unwrap());
        assert!(stop_scroll(Some(&result), Some(&request(3, 5))).unwrap());
        assert!(!stop_scroll::<i32>(None, Some(&request(3, 5))).unwrap());
        assert!(!stop_scroll::<i32>(None, None).unwrap());
        assert!(matches!(
            stop_scroll(Some(&result), None),
            Err(Error::NullArgument("request"))
        ));
    }

    #[test]
    fn test_map_items_keeps_counts() {
        let result = PaginationResult::from_parts(&request(2, 2), Some(vec![3, 4]), 5, 7);
        let mapped = result.map_items(|items| items.into_iter().map(|i| i.to_string()).collect());
        assert_eq!(mapped.items, vec!["3", "4"]);
        assert_eq!(mapped.current_page, 2);
        assert_eq!(mapped.total_pages, 3);
        assert_eq!(mapped.total_count, 5);
        assert_eq!(mapped.total_count_unfiltered, 7);
    }

    #[test]
    fn test_json_shape() {
        let result = PaginationResult::from_items(vec!["a"]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "CurrentPage": 1,
                "TotalPages": 1,
                "TotalCount": 1,
                "TotalCountUnfiltered": 1,
                "Items": ["a"]
            })
        );
    }
}
