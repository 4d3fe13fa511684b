use whirr_auth::Proof;
use whirr_types::ObjectKey;

/// What a submission asks the registry to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    AddOrUpdate,
    Delete { reason: String },
}

/// One submitted mutation: raw object text plus authentication proof.
#[derive(Clone, Debug)]
pub struct UpdateRequest {
    pub object_text: String,
    pub operation: Operation,
    /// Absent proof never authorizes; it is still a denial, not a parse
    /// error.
    pub proof: Option<Proof>,
}

impl UpdateRequest {
    pub fn add_or_update(object_text: &str, proof: Option<Proof>) -> Self {
        Self {
            object_text: object_text.to_string(),
            operation: Operation::AddOrUpdate,
            proof,
        }
    }

    pub fn delete(object_text: &str, reason: &str, proof: Option<Proof>) -> Self {
        Self {
            object_text: object_text.to_string(),
            operation: Operation::Delete {
                reason: reason.to_string(),
            },
            proof,
        }
    }
}

/// What a successful submission did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateAction {
    Created,
    Updated,
    Deleted,
}

/// The result of a successful submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub key: ObjectKey,
    pub action: UpdateAction,
    /// New object version; `None` for deletions.
    pub version: Option<u64>,
}
