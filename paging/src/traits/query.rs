//! DeferredQuery trait for lazily evaluated data sources

use crate::error::{QueryError, Result};
use crate::predicate::{FilterPredicate, OrderClause};
use async_trait::async_trait;

/// A not-yet-executed query against some data source.
///
/// Every builder operation yields a new query and leaves the receiver
/// untouched, so a rejected predicate can be dropped while the caller keeps
/// the query it had. Only [`count`](Self::count) and
/// [`materialize`](Self::materialize) touch the source.
///
/// This trait abstracts over storage engines, allowing the same paging
/// pipeline to run against an in-memory collection, a SQL query builder, etc.
#[async_trait]
pub trait DeferredQuery: Sized + Send + Sync {
    /// Element type produced by the query.
    type Item: Send;

    /// Caller-supplied search predicate in the engine's native form.
    type Predicate: Send;

    /// Restrict the query with a native predicate.
    fn filter(&self, predicate: Self::Predicate) -> Self;

    /// Restrict the query with a compiled filter predicate.
    ///
    /// Returns an error if the engine cannot bind the predicate, e.g. the
    /// property does not exist or the literal does not fit its type.
    fn filter_where(&self, predicate: &FilterPredicate) -> std::result::Result<Self, QueryError>;

    /// Order the query, replacing any previous ordering.
    fn order_by(&self, clause: &OrderClause) -> std::result::Result<Self, QueryError>;

    /// Bypass the first `count` elements.
    fn skip(&self, count: usize) -> Self;

    /// Keep at most `count` elements.
    fn take(&self, count: usize) -> Self;

    /// Count the elements the query currently selects.
    async fn count(&self) -> Result<usize>;

    /// Execute the query and collect its elements.
    async fn materialize(&self) -> Result<Vec<Self::Item>>;
}
