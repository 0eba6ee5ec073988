//! Error types for paging

use thiserror::Error;

/// Result type alias for paging operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers of the paging layer.
///
/// Recoverable input defects (malformed predicates, unknown sort properties)
/// never show up here; they are logged and dropped inside the filter compiler
/// and the ordering applier.
#[derive(Error, Debug)]
pub enum Error {
    /// A sort term carries an order token that is neither ascending nor descending
    #[error("Invalid sort order '{token}' in sort term '{term}'")]
    InvalidSortOrder { term: String, token: String },

    /// A range filter key does not start with `>`, `<` or `=`
    #[error("Filter range operator '{operator}' is not supported. Affected property: {property}")]
    UnsupportedFilterOperator { property: String, operator: String },

    /// A filter value has none of the accepted shapes
    #[error("Filter values of type '{type_name}' are not supported. Affected property: {property}")]
    UnsupportedFilterValueType {
        property: String,
        type_name: String,
    },

    /// A required argument was absent
    #[error("Argument must not be null: {0}")]
    NullArgument(&'static str),

    /// A query string could not be parsed into a paging request
    #[error("Invalid query string: {0}")]
    InvalidQueryString(String),

    /// The deferred query failed while counting or materializing
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors raised by a deferred query engine while building or running a query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// A generated predicate could not be parsed or bound
    #[error("Predicate parse error: {0}")]
    PredicateParse(String),

    /// The predicate or ordering names a property the element type does not have
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// A literal cannot be compared with the property it is bound to
    #[error("Type mismatch on '{property}': expected {expected}, got {actual}")]
    TypeMismatch {
        property: String,
        expected: &'static str,
        actual: String,
    },

    /// The ordering expression was rejected
    #[error("Order by error: {0}")]
    OrderBy(String),

    /// Storage backend failure
    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
