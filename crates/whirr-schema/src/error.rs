use thiserror::Error;
use whirr_types::ObjectClass;

/// Errors from schema operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A primary-key attribute required by the schema is absent.
    #[error("{class}: missing primary key attribute {attribute}")]
    MissingPrimaryKey {
        class: ObjectClass,
        attribute: String,
    },
}

/// Result alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
