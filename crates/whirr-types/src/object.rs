use serde::{Deserialize, Serialize};

use crate::class::ObjectClass;

/// One attribute of an RPSL object: a lowercase name and its value.
///
/// Continuation lines have already been joined into `value` by the parser,
/// separated by single newlines. `unrecognized` marks attributes the schema
/// for the object's class does not define; they are preserved through
/// serialization rather than dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpslAttribute {
    pub name: String,
    pub value: String,
    pub unrecognized: bool,
}

impl RpslAttribute {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            value: value.to_string(),
            unrecognized: false,
        }
    }
}

/// A parsed RPSL object: its class and the ordered attribute list.
///
/// The struct itself enforces nothing beyond the class tag; schema
/// conformance is the validator's job. Attribute order is preserved exactly
/// as parsed; canonical ordering is applied at serialization time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpslObject {
    pub class: ObjectClass,
    pub attributes: Vec<RpslAttribute>,
}

impl RpslObject {
    pub fn new(class: ObjectClass, attributes: Vec<RpslAttribute>) -> Self {
        Self { class, attributes }
    }

    /// The first value of the named attribute, if present.
    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// All values of the named attribute, in order.
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| a.name == name)
            .map(|a| a.value.as_str())
            .collect()
    }

    /// Number of occurrences of the named attribute.
    pub fn count(&self, name: &str) -> usize {
        self.attributes.iter().filter(|a| a.name == name).count()
    }

    /// The `source:` attribute value, if present.
    pub fn source_value(&self) -> Option<&str> {
        self.first_value("source")
    }

    /// The value of the class attribute (the object's name / key seed).
    pub fn class_value(&self) -> Option<&str> {
        self.first_value(self.class.as_str())
    }
}

/// Split a list-valued attribute (e.g. `members:`) into its elements.
///
/// Elements are separated by commas and/or whitespace; empty elements are
/// dropped. Continuation newlines inside the value behave as whitespace.
pub fn split_list_value(value: &str) -> Vec<&str> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
