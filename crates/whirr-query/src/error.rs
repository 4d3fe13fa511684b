use thiserror::Error;
use whirr_store::StoreError;

/// Errors from query resolution.
///
/// "No entries found" is not among them: an empty result is a successful
/// resolution.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Reverse lookup on an attribute no schema marks as a lookup key.
    #[error("attribute not searchable: {0}")]
    UnsearchableAttribute(String),

    /// Set expansion exceeded the recursion depth bound.
    #[error("set expansion exceeded maximum depth of {limit}")]
    DepthExceeded { limit: usize },

    /// The query mode does not apply to the requested class(es).
    #[error("query mode {mode} not supported for requested classes")]
    UnsupportedMode { mode: &'static str },

    /// A prefix-mode query key that is not a CIDR prefix.
    #[error("not a valid prefix: {0}")]
    InvalidPrefix(String),

    /// A requested source is not configured.
    #[error("unknown source: {0}")]
    UnknownSource(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for query operations.
pub type QueryResult<T> = Result<T, QueryError>;
