use thiserror::Error;

/// Errors from credential handling.
///
/// Authorization outcomes are not errors: a failed match is a
/// [`Decision::Denied`](crate::Decision::Denied), carrying no detail about
/// which credential failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("unknown auth scheme: {0}")]
    UnknownScheme(String),

    #[error("malformed credential: {0}")]
    MalformedCredential(String),
}

/// Result alias for credential operations.
pub type AuthResult<T> = Result<T, AuthError>;
