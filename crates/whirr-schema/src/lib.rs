//! Schema registry for the whirr routing registry.
//!
//! Defines, per RPSL object class, which attributes are allowed, how often
//! they may appear, what their values must look like, which of them form the
//! primary key, which are indexed for reverse lookup, and which reference
//! other objects. The table is embedded and immutable: built once at startup
//! with [`SchemaRegistry::builtin`] and shared by reference.

pub mod error;
pub mod registry;
pub mod rule;
pub mod syntax;

pub use error::{SchemaError, SchemaResult};
pub use registry::{Schema, SchemaRegistry};
pub use rule::{AttributeRule, Cardinality};
pub use syntax::ValueSyntax;
