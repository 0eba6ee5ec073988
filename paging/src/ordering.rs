//! Ordering applier: sort a deferred query by the request, or by the default

use crate::config::PagingOptions;
use crate::log;
use crate::predicate::OrderClause;
use crate::request::PagingRequest;
use crate::sort::SortSpec;
use crate::traits::DeferredQuery;

/// Orders a deferred query before it is paged.
///
/// Paging needs a well-defined order, so a query always leaves the applier
/// ordered unless even the default ordering is rejected.
#[derive(Debug, Clone, Default)]
pub struct OrderingApplier {
    options: PagingOptions,
}

impl OrderingApplier {
    pub fn new(options: PagingOptions) -> Self {
        Self { options }
    }

    /// Order `query` by the request's sort string, honoring `reverse`.
    ///
    /// An undecodable or rejected sort falls back to the default ordering.
    /// `reverse` has no effect without a sort string.
    pub fn apply<Q: DeferredQuery>(&self, query: Q, request: &PagingRequest) -> Q {
        if !request.has_sort_by() {
            return self.order_by_default(query);
        }

        match request.sorting() {
            Ok(spec) if !spec.is_empty() => self.order_by_sorting(query, &spec, request.reverse),
            Ok(_) => self.order_by_default(query),
            Err(err) => {
                log::warning(&format!("Paging.SortBy ignored: {err}"));
                self.order_by_default(query)
            }
        }
    }

    /// Order `query` by `spec`, flipping every direction when `reverse` is set.
    pub fn order_by_sorting<Q: DeferredQuery>(&self, query: Q, spec: &SortSpec, reverse: bool) -> Q {
        let spec = if reverse { spec.reversed() } else { spec.clone() };
        let sort_by = spec.to_sort_by().unwrap_or_default();
        log::debug(&format!(
            "Paging.SortBy \"{sort_by}\"{}",
            if reverse { " (Reversed)" } else { "" }
        ));

        match query.order_by(&OrderClause::By(spec)) {
            Ok(ordered) => ordered,
            Err(err) => {
                log::warning(&format!("Paging.SortBy \"{sort_by}\" failed: {err}"));
                self.order_by_default(query)
            }
        }
    }

    /// Order `query` by the configured default ordering.
    ///
    /// Returns `query` unordered when the default is rejected too.
    pub fn order_by_default<Q: DeferredQuery>(&self, query: Q) -> Q {
        let default = &self.options.default_order_by;
        log::debug(&format!("Paging.OrderByDefault({default})"));

        let clause = match self.options.default_order_clause() {
            Ok(clause) => clause,
            Err(err) => {
                log::error(&format!("Paging.OrderByDefault({default}) is invalid"), &err);
                return query;
            }
        };

        match query.order_by(&clause) {
            Ok(ordered) => ordered,
            Err(err) => {
                log::error(&format!("Paging.OrderByDefault({default}) failed"), &err);
                query
            }
        }
    }
}

/// Order `query` by the request with default options.
pub fn apply_ordering<Q: DeferredQuery>(query: Q, request: &PagingRequest) -> Q {
    OrderingApplier::default().apply(query, request)
}

/// Order `query` by an explicit sort specification with default options.
pub fn order_by_sorting<Q: DeferredQuery>(query: Q, spec: &SortSpec, reverse: bool) -> Q {
    OrderingApplier::default().order_by_sorting(query, spec, reverse)
}
