//! Query resolution for the whirr routing registry.
//!
//! Resolves whois-style queries against the storage gateway: exact lookup,
//! reverse lookup by indexed attribute, recursive set expansion with cycle
//! and depth guards, and prefix-aware less-specific/more-specific/exact
//! matching. Results follow storage insertion order within a source and the
//! configured source priority order across sources. The engine applies no
//! authentication; filtered sources only have personal-contact attributes
//! shaped out of their output.

pub mod engine;
pub mod error;
pub mod filter;
pub mod query;
pub mod sources;

pub use engine::{QueryEngine, QueryResponse, MAX_EXPANSION_DEPTH};
pub use error::{QueryError, QueryResult};
pub use filter::{shape_for_output, FILTERED_ATTRIBUTES};
pub use query::{Query, QueryMode};
pub use sources::SourceConfig;
