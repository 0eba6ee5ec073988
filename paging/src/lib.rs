//! paging - Pagination, filtering and sorting over deferred queries
//!
//! A caller describes the page it wants with a [`PagingRequest`] (page
//! index, page size, sort string, free-text search and a per-property
//! filter map) and hands over a [`DeferredQuery`]. The [`Paginator`] runs
//! search, filter, count, sort and page against the query, projects the page
//! and returns a [`PaginationResult`] with the counts needed to navigate.
//!
//! # Features
//!
//! - **Sort Grammar**: `"Venue.Name, Name desc"` parsed into an ordered [`SortSpec`]
//! - **Filter Compiler**: scalars, relational strings (`">=5000"`), ranges and sets
//! - **Tolerant Input**: malformed filters and unknown sort keys are logged and dropped
//! - **Derive Macro**: `#[derive(Record)]` exposes struct fields by property path
//! - **In-Memory Engine**: [`MemoryQuery`] runs the whole pipeline over a slice
//!
//! # Example
//!
//! ```ignore
//! use paging::{paginate, MemoryQuery, PagingRequest, Record};
//!
//! #[derive(Clone, Record)]
//! pub struct Car {
//!     pub id: i64,
//!     pub name: String,
//!     pub year: i32,
//! }
//!
//! async fn first_page(cars: Vec<Car>) -> paging::Result<paging::PaginationResult<Car>> {
//!     let request = PagingRequest::new()
//!         .with_items_per_page(10)
//!         .with_sort_by("Year desc, Name")
//!         .with_filter("Year", ">=2010");
//!
//!     paginate(Some(&request), MemoryQuery::new(cars), |cars| cars, None).await
//! }
//! ```

pub mod compiler;
pub mod config;
pub mod error;
pub mod filter;
pub mod log;
pub mod memory;
pub mod ordering;
pub mod pipeline;
pub mod predicate;
pub mod request;
pub mod result;
pub mod sort;
pub mod traits;
pub mod value;

#[cfg(test)]
mod fixtures;

// Re-export the derive macro
pub use paging_derive::Record;

// Re-export main types
pub use compiler::{apply_filter, try_where, FilterCompiler};
pub use config::PagingOptions;
pub use error::{Error, QueryError, Result};
pub use filter::{FilterMap, FilterValue};
pub use memory::MemoryQuery;
pub use ordering::{apply_ordering, order_by_sorting, OrderingApplier};
pub use pipeline::{paginate, Paginator};
pub use predicate::{CaseSensitivity, CompareOp, FilterPredicate, OrderClause};
pub use request::PagingRequest;
pub use result::{stop_scroll, PaginationResult};
pub use sort::{SortOrder, SortSpec};
pub use traits::{record, DeferredQuery, Record, ToValue};
pub use value::{FieldKind, Value};
