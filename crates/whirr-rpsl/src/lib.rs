//! RPSL text parsing and canonical serialization.
//!
//! Bidirectional mapping between raw RPSL text and [`RpslObject`]:
//! attribute lines, continuation lines, end-of-line comments, blank-line
//! object boundaries. Unknown attributes are preserved (flagged
//! `unrecognized`) so round-trips are lossless even for
//! forward-incompatible objects.
//!
//! [`RpslObject`]: whirr_types::RpslObject

pub mod error;
pub mod parser;
pub mod serializer;

pub use error::{ParseError, ParseResult};
pub use parser::{parse_object, split_paragraphs};
pub use serializer::{semantically_equal, serialize};
