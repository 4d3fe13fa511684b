use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Name of the registry or mirror a stored object belongs to.
///
/// Source names are normalized to upper case on construction so lookups are
/// case-insensitive. Valid names are non-empty and use letters, digits and
/// dashes only.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Source(String);

impl Source {
    pub fn new(name: &str) -> Result<Self, TypeError> {
        let trimmed = name.trim();
        if trimmed.is_empty()
            || !trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(TypeError::InvalidSource(name.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Source({})", self.0)
    }
}

impl FromStr for Source {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_to_upper_case() {
        let source = Source::new("ripe").unwrap();
        assert_eq!(source.as_str(), "RIPE");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let source = Source::new("  TEST  ").unwrap();
        assert_eq!(source.as_str(), "TEST");
    }

    #[test]
    fn rejects_empty_and_bad_characters() {
        assert!(Source::new("").is_err());
        assert!(Source::new("A B").is_err());
        assert!(Source::new("TEST:1").is_err());
    }

    #[test]
    fn dashes_are_allowed() {
        assert!(Source::new("ARIN-NONAUTH").is_ok());
    }

    #[test]
    fn equality_ignores_input_case() {
        assert_eq!(Source::new("test").unwrap(), Source::new("TEST").unwrap());
    }
}
