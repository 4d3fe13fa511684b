use whirr_rpsl::{parse_object, ParseError};
use whirr_types::{ObjectClass, Source};
use whirr_validate::{validate, ValidationMode};

use crate::lookup::StoreLookup;
use crate::pipeline::UpdatePipeline;

/// Which way a mirror stream entry mutates the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MirrorOperation {
    AddOrUpdate,
    Delete,
}

/// One operation from a mirror stream: an ADD/DEL with a serial number and
/// source.
///
/// Mirror streams are pre-authorized by the remote registry, so no
/// authentication applies; objects are validated non-strictly. A bad
/// operation is skipped — logged, never fatal — because a later operation
/// for the same object will resolve the inconsistency.
#[derive(Clone, Debug)]
pub struct NrtmOperation {
    pub source: Source,
    pub operation: MirrorOperation,
    pub serial: u64,
    pub object_text: String,
    /// Only apply operations for these classes; `None` applies all.
    pub object_class_filter: Option<Vec<ObjectClass>>,
}

impl NrtmOperation {
    /// Apply this operation through the pipeline's mirror path.
    ///
    /// Returns `true` if the operation was applied, `false` if it was
    /// skipped (filtered class, unknown class, parse/validation failure,
    /// or source mismatch).
    pub fn apply(&self, pipeline: &UpdatePipeline) -> bool {
        let object = match parse_object(self.object_text.trim(), pipeline.schemas()) {
            Ok(object) => object,
            Err(ParseError::UnknownClass(class)) => {
                // Unknown classes are only worth a log line when no filter
                // would have dropped them anyway.
                if self.object_class_filter.is_none() {
                    tracing::info!(operation = %self, class, "ignoring mirror operation for unknown class");
                }
                return false;
            }
            Err(e) => {
                tracing::error!(
                    operation = %self,
                    error = %e,
                    "parse failure in mirror operation, skipping; a later operation will resolve the inconsistency"
                );
                return false;
            }
        };

        if let Some(filter) = &self.object_class_filter {
            if !filter.contains(&object.class) {
                return false;
            }
        }

        if let Some(declared) = object.source_value() {
            if !declared.trim().eq_ignore_ascii_case(self.source.as_str()) {
                tracing::error!(
                    operation = %self,
                    declared,
                    "source mismatch between stream and object, skipping"
                );
                return false;
            }
        } else if self.operation == MirrorOperation::AddOrUpdate {
            // Deletions may omit the source attribute; additions may not.
            tracing::error!(operation = %self, "mirror object missing source, skipping");
            return false;
        }

        let schema = pipeline.schemas().schema_for(object.class);
        {
            let lookup = StoreLookup::new(pipeline.store().as_ref(), pipeline.schemas());
            if let Err(violations) = validate(
                &object,
                &self.source,
                schema,
                &lookup,
                ValidationMode::NonStrict,
            ) {
                tracing::error!(operation = %self, %violations, "invalid mirror object, skipping");
                return false;
            }
        }

        let pk = match schema.primary_key_of(&object) {
            Ok(pk) => pk,
            Err(e) => {
                tracing::error!(operation = %self, error = %e, "mirror object has no usable key, skipping");
                return false;
            }
        };
        let key = whirr_types::ObjectKey::new(self.source.clone(), object.class, pk);

        let applied = match self.operation {
            MirrorOperation::AddOrUpdate => pipeline.mirror_upsert(object, key.clone()).is_ok(),
            MirrorOperation::Delete => pipeline.mirror_delete(&key).is_ok(),
        };
        if applied {
            tracing::info!(operation = %self, %key, "completed mirror operation");
        }
        applied
    }
}

impl std::fmt::Display for NrtmOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self.operation {
            MirrorOperation::AddOrUpdate => "ADD",
            MirrorOperation::Delete => "DEL",
        };
        write!(f, "{}/{}/{}", self.source, self.serial, op)
    }
}
