use whirr_types::{ObjectClass, Source};

/// The resolution modes of the query engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryMode {
    /// Lookup by primary key (or exact prefix for route classes).
    Exact,
    /// Lookup by an indexed attribute's value.
    ReverseAttribute { attribute: String },
    /// Recursive expansion of an as-set/route-set into its member closure.
    SetExpand,
    /// Route objects whose prefix covers the query prefix (including the
    /// exact match).
    LessSpecific,
    /// Route objects whose prefix is strictly inside the query prefix.
    MoreSpecific,
    /// Route objects whose prefix equals the query prefix.
    ExactPrefix,
}

impl QueryMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::ReverseAttribute { .. } => "reverse-attribute",
            Self::SetExpand => "set-expand",
            Self::LessSpecific => "less-specific",
            Self::MoreSpecific => "more-specific",
            Self::ExactPrefix => "exact-prefix",
        }
    }
}

/// A request descriptor for the query engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub mode: QueryMode,
    /// Restrict results to these classes; `None` means all.
    pub class_filter: Option<Vec<ObjectClass>>,
    /// The search term: primary key, attribute value, set name, or prefix.
    pub key: String,
    /// Restrict to these sources; `None` means the configured priority
    /// list.
    pub sources: Option<Vec<Source>>,
    /// For exact lookups: do not stop at the first source with a match.
    pub all_sources: bool,
}

impl Query {
    pub fn new(mode: QueryMode, key: &str) -> Self {
        Self {
            mode,
            class_filter: None,
            key: key.to_string(),
            sources: None,
            all_sources: false,
        }
    }

    pub fn exact(key: &str) -> Self {
        Self::new(QueryMode::Exact, key)
    }

    pub fn with_classes(mut self, classes: Vec<ObjectClass>) -> Self {
        self.class_filter = Some(classes);
        self
    }

    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = Some(sources);
        self
    }

    pub fn all_sources(mut self) -> Self {
        self.all_sources = true;
        self
    }
}
