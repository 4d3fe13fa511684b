//! The write path of the whirr routing registry.
//!
//! [`UpdatePipeline`] is the only way objects enter or leave the store:
//! parse → validate → authorize → transactional compare-and-swap commit
//! with bounded retries. Validation and authorization failures abort before
//! anything is written; the pipeline never partially commits.
//!
//! [`NrtmOperation`] applies pre-authorized mirror stream operations
//! through the same pipeline's unauthenticated mirror path.

pub mod error;
pub mod lookup;
pub mod nrtm;
pub mod pipeline;
pub mod request;

pub use error::{UpdateError, UpdateResult};
pub use lookup::StoreLookup;
pub use nrtm::{MirrorOperation, NrtmOperation};
pub use pipeline::{UpdatePipeline, MAX_PUT_RETRIES};
pub use request::{Operation, UpdateAction, UpdateOutcome, UpdateRequest};
