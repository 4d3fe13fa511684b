use thiserror::Error;
use whirr_rpsl::ParseError;
use whirr_store::StoreError;
use whirr_types::ObjectKey;
use whirr_validate::Violations;

/// Errors from the write pipeline.
///
/// The pipeline never partially commits: any of these surfaced before the
/// storage write means nothing was written.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] Violations),

    /// No credential on any responsible maintainer matched the proof.
    /// Deliberately carries no detail.
    #[error("authorization failed")]
    AuthorizationDenied,

    /// Deletion blocked by a live reference from another object.
    #[error("referential conflict: {0}")]
    ReferentialConflict(String),

    #[error("object not found: {0}")]
    NotFound(ObjectKey),

    /// A concurrent writer won the compare-and-swap race on every allowed
    /// retry.
    #[error("update conflict: concurrent modification")]
    Conflict,

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Result alias for update operations.
pub type UpdateResult<T> = Result<T, UpdateError>;
