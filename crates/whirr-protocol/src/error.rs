use thiserror::Error;

/// Errors from parsing protocol input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("empty request")]
    EmptyRequest,

    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("flag {0} requires an argument")]
    MissingArgument(String),

    #[error("no search term given")]
    MissingSearchTerm,

    #[error("conflicting query mode flags")]
    ConflictingFlags,

    #[error("unknown object class: {0}")]
    UnknownClass(String),

    #[error("invalid source name: {0}")]
    InvalidSource(String),

    #[error("submission block contains no object")]
    EmptySubmission,

    #[error("invalid signature encoding")]
    InvalidSignature,
}

/// Result alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
