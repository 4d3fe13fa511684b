use std::fmt;

use serde::{Deserialize, Serialize};

use crate::class::ObjectClass;
use crate::source::Source;

/// Unique identity of a stored object: (source, class, primary key).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectKey {
    pub source: Source,
    pub class: ObjectClass,
    pub pk: String,
}

impl ObjectKey {
    /// Build a key from an already-normalized primary key string.
    pub fn new(source: Source, class: ObjectClass, pk: String) -> Self {
        Self { source, class, pk }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.source, self.class, self.pk)
    }
}

/// Normalize a primary-key fragment: collapse internal whitespace runs to a
/// single space, trim, upper-case.
///
/// Primary keys must compare equal regardless of the whitespace and casing
/// of the submitted text.
pub fn normalize_pk(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}
