//! Pagination pipeline: search, filter, count, sort, page, project

use crate::compiler::FilterCompiler;
use crate::config::PagingOptions;
use crate::error::Result;
use crate::log;
use crate::ordering::OrderingApplier;
use crate::request::PagingRequest;
use crate::result::PaginationResult;
use crate::traits::DeferredQuery;

/// Runs a paging request against a deferred query.
///
/// # Example
///
/// ```ignore
/// use paging::{MemoryQuery, Paginator, PagingOptions, PagingRequest};
///
/// let paginator = Paginator::new(PagingOptions::default().with_default_order_by("Id"));
/// let request = PagingRequest::new().with_items_per_page(20).with_sort_by("Name");
///
/// let page = paginator
///     .paginate(Some(&request), MemoryQuery::new(cars), |cars| {
///         cars.into_iter().map(CarDto::from).collect()
///     }, None)
///     .await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    compiler: FilterCompiler,
    ordering: OrderingApplier,
}

impl Paginator {
    pub fn new(options: PagingOptions) -> Self {
        Self {
            compiler: FilterCompiler::new(&options),
            ordering: OrderingApplier::new(options),
        }
    }

    /// Select the requested page of `query` and project it.
    ///
    /// Without a request the whole query becomes a single page. `search` is
    /// applied only when the request carries a search string.
    /// `projection` is called exactly once, on the materialized page.
    pub async fn paginate<Q, D, F>(
        &self,
        request: Option<&PagingRequest>,
        query: Q,
        projection: F,
        search: Option<Q::Predicate>,
    ) -> Result<PaginationResult<D>>
    where
        Q: DeferredQuery,
        F: FnOnce(Vec<Q::Item>) -> Vec<D>,
    {
        let Some(request) = request else {
            let items = query.materialize().await?;
            return Ok(PaginationResult::from_items(projection(items)));
        };

        let total_count_unfiltered = query.count().await?;

        let mut query = query;
        if let (Some(_), Some(predicate)) = (request.search.as_deref(), search) {
            query = query.filter(predicate);
        }
        if !request.filter.is_empty() {
            query = self.compiler.apply(query, &request.filter)?;
        }

        let total_count = query.count().await?;
        log::debug(&format!(
            "Paging matched {total_count} of {total_count_unfiltered} items"
        ));

        let mut query = self.ordering.apply(query, request);
        if request.items_per_page > 0 {
            let skip = request
                .current_page
                .saturating_sub(1)
                .saturating_mul(request.items_per_page);
            query = query.skip(skip).take(request.items_per_page);
        }

        let items = query.materialize().await?;
        let result = PaginationResult::from_parts(
            request,
            Some(projection(items)),
            total_count,
            total_count_unfiltered,
        );
        log::info(&format!(
            "Paging page {} of {} with {} items",
            result.current_page,
            result.total_pages,
            result.len()
        ));
        Ok(result)
    }

    /// Select the requested page of `query` without projecting it.
    pub async fn paginate_entities<Q>(
        &self,
        request: Option<&PagingRequest>,
        query: Q,
        search: Option<Q::Predicate>,
    ) -> Result<PaginationResult<Q::Item>>
    where
        Q: DeferredQuery,
    {
        self.paginate(request, query, |items| items, search).await
    }
}

/// Run `request` against `query` with default options.
pub async fn paginate<Q, D, F>(
    request: Option<&PagingRequest>,
    query: Q,
    projection: F,
    search: Option<Q::Predicate>,
) -> Result<PaginationResult<D>>
where
    Q: DeferredQuery,
    F: FnOnce(Vec<Q::Item>) -> Vec<D>,
{
    Paginator::default()
        .paginate(request, query, projection, search)
        .await
}
