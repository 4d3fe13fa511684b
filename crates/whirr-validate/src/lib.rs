//! Validation for the whirr routing registry.
//!
//! Applies the class schema (cardinality, value syntax, references) plus
//! referential checks to a candidate object before it may be committed.
//! All violations are collected and reported together; validation never
//! partially applies. Deletions are validated for existence and
//! referential integrity only.

pub mod lookup;
pub mod validator;
pub mod violation;

pub use lookup::ObjectLookup;
pub use validator::{validate, validate_delete, DeleteError, ValidationMode};
pub use violation::{Violation, Violations};
