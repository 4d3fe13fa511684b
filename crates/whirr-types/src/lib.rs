//! Foundation types for the whirr routing registry.
//!
//! This crate provides the RPSL object model and the identity types used
//! throughout the system. Every other whirr crate depends on `whirr-types`.
//!
//! # Key Types
//!
//! - [`RpslObject`] — an ordered list of attributes plus a class tag
//! - [`ObjectClass`] — the closed set of supported object classes
//! - [`Source`] — which registry/mirror an object belongs to
//! - [`ObjectKey`] — (source, class, primary key) identity of a stored object
//! - [`AsNumber`] — autonomous system number

pub mod class;
pub mod error;
pub mod key;
pub mod object;
pub mod primitives;
pub mod source;

pub use class::ObjectClass;
pub use error::TypeError;
pub use key::{normalize_pk, ObjectKey};
pub use object::{split_list_value, RpslAttribute, RpslObject};
pub use primitives::{parse_prefix, AsNumber};
pub use source::Source;
