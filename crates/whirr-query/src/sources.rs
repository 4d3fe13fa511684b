use std::collections::HashSet;

use whirr_types::Source;

use crate::error::{QueryError, QueryResult};

/// Configured source order and per-source flags.
///
/// Position in `priority` IS the priority: queries iterate sources in this
/// order and multi-source precedence is "first match wins". There is no
/// separate rank number, so ties cannot occur.
#[derive(Clone, Debug, Default)]
pub struct SourceConfig {
    priority: Vec<Source>,
    filtered: HashSet<Source>,
}

impl SourceConfig {
    pub fn new(priority: Vec<Source>) -> Self {
        Self {
            priority,
            filtered: HashSet::new(),
        }
    }

    /// Mark a source as filtered: personal-contact attributes are
    /// suppressed from its query output.
    pub fn with_filtered(mut self, source: Source) -> Self {
        self.filtered.insert(source);
        self
    }

    pub fn priority(&self) -> &[Source] {
        &self.priority
    }

    pub fn is_filtered(&self, source: &Source) -> bool {
        self.filtered.contains(source)
    }

    /// The sources a query should iterate, in priority order.
    ///
    /// With a restriction, the result is the restriction reordered by the
    /// configured priority; requesting an unconfigured source is an error.
    pub fn selection(&self, restriction: Option<&[Source]>) -> QueryResult<Vec<Source>> {
        match restriction {
            None => Ok(self.priority.clone()),
            Some(requested) => {
                for source in requested {
                    if !self.priority.contains(source) {
                        return Err(QueryError::UnknownSource(source.to_string()));
                    }
                }
                Ok(self
                    .priority
                    .iter()
                    .filter(|s| requested.contains(s))
                    .cloned()
                    .collect())
            }
        }
    }
}
