use thiserror::Error;

/// Errors from running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
