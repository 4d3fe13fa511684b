use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown object class: {0}")]
    UnknownClass(String),

    #[error("invalid source name: {0}")]
    InvalidSource(String),

    #[error("invalid AS number: {0}")]
    InvalidAsNumber(String),

    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),
}
