use whirr_types::ObjectKey;

/// Errors from storage gateway operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// The addressed object does not exist.
    #[error("object not found: {0}")]
    NotFound(ObjectKey),

    /// A compare-and-swap write observed a different version than expected.
    /// `None` means "object absent".
    #[error("version conflict on {key}: expected {expected:?}, actual {actual:?}")]
    VersionConflict {
        key: ObjectKey,
        expected: Option<u64>,
        actual: Option<u64>,
    },

    /// The backend did not answer within its deadline.
    #[error("storage timeout")]
    Timeout,

    /// The backend is unreachable or refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
