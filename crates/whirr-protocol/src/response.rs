use whirr_query::QueryResponse;
use whirr_rpsl::serialize;
use whirr_schema::SchemaRegistry;
use whirr_store::StoredRpslObject;
use whirr_update::{UpdateAction, UpdateOutcome};

/// One response to one request, ready to render.
///
/// Rendering rules: serialized objects separated by one blank line; status
/// lines start `% `; errors start `%% ERROR:`; every response ends with a
/// single blank line, the transport's terminating marker. "No entries
/// found" is a status, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Objects(Vec<StoredRpslObject>),
    Members(Vec<String>),
    NotFound,
    UpdateOk(UpdateOutcome),
    Error(String),
}

impl Response {
    /// Build a response from a query result, mapping emptiness to
    /// [`Response::NotFound`].
    pub fn from_query(response: QueryResponse) -> Self {
        if response.is_empty() {
            return Self::NotFound;
        }
        match response {
            QueryResponse::Objects(objects) => Self::Objects(objects),
            QueryResponse::Members(members) => Self::Members(members),
        }
    }

    pub fn render(&self, schemas: &SchemaRegistry) -> String {
        match self {
            Self::Objects(objects) => {
                let mut out = String::new();
                for stored in objects {
                    let schema = schemas.schema_for(stored.key.class);
                    out.push_str(&serialize(&stored.object, schema));
                    out.push('\n');
                }
                out
            }
            Self::Members(members) => {
                format!("{}\n\n", members.join(" "))
            }
            Self::NotFound => "%  No entries found\n\n".to_string(),
            Self::UpdateOk(outcome) => {
                let action = match outcome.action {
                    UpdateAction::Created => "created",
                    UpdateAction::Updated => "updated",
                    UpdateAction::Deleted => "deleted",
                };
                format!("% {action}: {}\n\n", outcome.key)
            }
            Self::Error(message) => format!("%% ERROR: {message}\n\n"),
        }
    }
}
