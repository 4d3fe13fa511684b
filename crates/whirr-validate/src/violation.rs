use thiserror::Error;

/// One validation failure: the offending attribute and why.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub attribute: String,
    pub reason: String,
}

impl Violation {
    pub fn new(attribute: &str, reason: impl Into<String>) -> Self {
        Self {
            attribute: attribute.to_string(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.attribute, self.reason)
    }
}

/// The full, ordered list of violations found in one candidate object.
///
/// Always non-empty when returned as an error: validation collects every
/// problem before failing so the submitter can fix them all in one round
/// trip.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub struct Violations {
    pub violations: Vec<Violation>,
}

impl Violations {
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl std::fmt::Display for Violations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} validation violation(s): {}",
            self.violations.len(),
            self.summary()
        )
    }
}

/// Accumulates violations during a validation pass.
#[derive(Default)]
pub(crate) struct Collector {
    violations: Vec<Violation>,
}

impl Collector {
    pub fn push(&mut self, attribute: &str, reason: impl Into<String>) {
        self.violations.push(Violation::new(attribute, reason));
    }

    pub fn finish(self) -> Result<(), Violations> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(Violations {
                violations: self.violations,
            })
        }
    }
}
