use thiserror::Error;

/// Errors from parsing RPSL text.
///
/// Parse errors are always reported to the submitter and are never fatal to
/// the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The input contained no attribute lines at all.
    #[error("empty object text")]
    Empty,

    /// A line had no attribute name before the first colon.
    #[error("line {line}: malformed attribute line: {content}")]
    MalformedLine { line: usize, content: String },

    /// An attribute name contained invalid characters.
    #[error("line {line}: invalid attribute name: {name}")]
    InvalidAttributeName { line: usize, name: String },

    /// The first attribute did not name a known object class.
    #[error("first attribute does not identify an object class: {0}")]
    UnknownClass(String),

    /// A continuation line appeared before any attribute.
    #[error("line {line}: continuation line before first attribute")]
    ContinuationBeforeAttribute { line: usize },

    /// More than one object in input where a single object was expected.
    #[error("expected a single object, found trailing content")]
    MultipleObjects,
}

/// Result alias for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;
