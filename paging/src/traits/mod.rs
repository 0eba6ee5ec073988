//! Core traits for paging

mod query;
pub mod record;
mod to_value;

pub use query::DeferredQuery;
pub use record::Record;
pub use to_value::ToValue;
