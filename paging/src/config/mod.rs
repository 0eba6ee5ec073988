//! Paging options

pub mod defaults;
mod options;

pub use options::PagingOptions;
