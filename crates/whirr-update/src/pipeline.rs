use std::sync::Arc;

use whirr_auth::{authorize, MaintainerAuth, Proof};
use whirr_rpsl::parse_object;
use whirr_schema::SchemaRegistry;
use whirr_store::{RegistryStore, StoreError};
use whirr_types::{normalize_pk, split_list_value, ObjectClass, ObjectKey, RpslObject, Source};
use whirr_validate::{validate, validate_delete, DeleteError, ValidationMode, Violation, Violations};

use crate::error::{UpdateError, UpdateResult};
use crate::lookup::StoreLookup;
use crate::request::{Operation, UpdateAction, UpdateOutcome, UpdateRequest};

/// How many times a compare-and-swap write is retried after losing a race
/// before the conflict is surfaced to the submitter.
pub const MAX_PUT_RETRIES: usize = 3;

/// The write path: parse, validate, authorize, commit.
///
/// The only path to the store for authenticated submissions. Nothing is
/// written before validation and authorization both pass, and the commit is
/// a transactional read-modify-write: authorization is re-checked against
/// freshly fetched maintainer objects on every retry.
pub struct UpdatePipeline {
    store: Arc<dyn RegistryStore>,
    schemas: Arc<SchemaRegistry>,
}

impl UpdatePipeline {
    pub fn new(store: Arc<dyn RegistryStore>, schemas: Arc<SchemaRegistry>) -> Self {
        Self { store, schemas }
    }

    pub fn schemas(&self) -> &Arc<SchemaRegistry> {
        &self.schemas
    }

    pub fn store(&self) -> &Arc<dyn RegistryStore> {
        &self.store
    }

    /// Run one submission through the full pipeline.
    pub fn submit(&self, request: &UpdateRequest) -> UpdateResult<UpdateOutcome> {
        let object = parse_object(&request.object_text, &self.schemas)?;
        let key = self.key_for(&object)?;

        // A signature proof must sign exactly the submitted object text;
        // anything else is a replay of some other payload.
        if let Some(Proof::Signature { payload, .. }) = request.proof.as_ref() {
            if payload != request.object_text.as_bytes() {
                return Err(UpdateError::AuthorizationDenied);
            }
        }

        match &request.operation {
            Operation::AddOrUpdate => self.add_or_update(object, key, request.proof.as_ref()),
            Operation::Delete { reason } => {
                self.delete_object(&object, key, request.proof.as_ref(), reason)
            }
        }
    }

    /// The storage key an object's content declares.
    pub fn key_for(&self, object: &RpslObject) -> UpdateResult<ObjectKey> {
        let source = self.object_source(object)?;
        let pk = self
            .schemas
            .schema_for(object.class)
            .primary_key_of(object)
            .map_err(|_| {
                single_violation(object.class.as_str(), "missing primary key attribute")
            })?;
        Ok(ObjectKey::new(source, object.class, pk))
    }

    /// Upsert without authentication, for mirror streams and seed dumps.
    /// The caller is responsible for having validated non-strictly.
    pub fn mirror_upsert(&self, object: RpslObject, key: ObjectKey) -> UpdateResult<u64> {
        for _ in 0..MAX_PUT_RETRIES {
            let expected = self.store.get(&key)?.map(|e| e.version);
            match self.store.put(object.clone(), key.clone(), expected) {
                Ok(version) => return Ok(version),
                Err(StoreError::VersionConflict { .. }) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(UpdateError::Conflict)
    }

    /// Unconditional delete, for mirror streams.
    pub fn mirror_delete(&self, key: &ObjectKey) -> UpdateResult<()> {
        match self.store.delete(key, None) {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound(k)) => Err(UpdateError::NotFound(k)),
            Err(e) => Err(e.into()),
        }
    }

    fn add_or_update(
        &self,
        object: RpslObject,
        key: ObjectKey,
        proof: Option<&Proof>,
    ) -> UpdateResult<UpdateOutcome> {
        let source = key.source.clone();
        {
            let lookup = StoreLookup::new(self.store.as_ref(), &self.schemas);
            validate(
                &object,
                &source,
                self.schemas.schema_for(object.class),
                &lookup,
                ValidationMode::Strict,
            )?;
        }

        for _ in 0..MAX_PUT_RETRIES {
            // Read-modify-write: maintainer objects are fetched fresh on
            // every attempt so a stale credential set is never honored.
            let existing = self.store.get(&key)?;
            let maintainers = self.responsible_maintainers(
                &object,
                existing.as_ref().map(|e| &e.object),
                &source,
            )?;
            self.check_authorized(&maintainers, proof)?;

            let created = existing.is_none();
            let expected = existing.map(|e| e.version);
            match self.store.put(object.clone(), key.clone(), expected) {
                Ok(version) => {
                    tracing::info!(%key, version, "object committed");
                    return Ok(UpdateOutcome {
                        key,
                        action: if created {
                            UpdateAction::Created
                        } else {
                            UpdateAction::Updated
                        },
                        version: Some(version),
                    });
                }
                Err(StoreError::VersionConflict { .. }) => {
                    tracing::debug!(%key, "lost write race, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(UpdateError::Conflict)
    }

    fn delete_object(
        &self,
        object: &RpslObject,
        key: ObjectKey,
        proof: Option<&Proof>,
        reason: &str,
    ) -> UpdateResult<UpdateOutcome> {
        {
            let lookup = StoreLookup::new(self.store.as_ref(), &self.schemas);
            validate_delete(&key, &lookup).map_err(|e| match e {
                DeleteError::NotFound(k) => UpdateError::NotFound(k),
                blocked @ DeleteError::ReferencedBy { .. } => {
                    UpdateError::ReferentialConflict(blocked.to_string())
                }
            })?;
        }

        for _ in 0..MAX_PUT_RETRIES {
            let Some(existing) = self.store.get(&key)? else {
                return Err(UpdateError::NotFound(key));
            };
            let maintainers =
                self.responsible_maintainers(object, Some(&existing.object), &key.source)?;
            self.check_authorized(&maintainers, proof)?;

            match self.store.delete(&key, Some(existing.version)) {
                Ok(()) => {
                    tracing::info!(%key, reason, "object deleted");
                    return Ok(UpdateOutcome {
                        key,
                        action: UpdateAction::Deleted,
                        version: None,
                    });
                }
                Err(StoreError::VersionConflict { .. }) => continue,
                Err(StoreError::NotFound(k)) => return Err(UpdateError::NotFound(k)),
                Err(e) => return Err(e.into()),
            }
        }
        Err(UpdateError::Conflict)
    }

    /// The maintainers whose credentials govern this mutation: the existing
    /// object's `mnt-by` when there is one, else the submitted object's.
    /// A mntner being created authenticates against its own submitted
    /// credentials; an existing mntner is always governed by its stored
    /// state, never by credentials in the update itself.
    fn responsible_maintainers(
        &self,
        submitted: &RpslObject,
        existing: Option<&RpslObject>,
        source: &Source,
    ) -> UpdateResult<Vec<MaintainerAuth>> {
        let governing = existing.unwrap_or(submitted);
        let mut names: Vec<String> = Vec::new();
        for value in governing.values("mnt-by") {
            for name in split_list_value(value) {
                let name = normalize_pk(name);
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }

        let mut auths = Vec::new();
        for name in &names {
            let key = ObjectKey::new(source.clone(), ObjectClass::Mntner, name.clone());
            if let Some(stored) = self.store.get(&key)? {
                auths.push(MaintainerAuth::from_object(&stored.object));
            }
        }
        if submitted.class == ObjectClass::Mntner && existing.is_none() {
            auths.push(MaintainerAuth::from_object(submitted));
        }
        Ok(auths)
    }

    fn check_authorized(
        &self,
        maintainers: &[MaintainerAuth],
        proof: Option<&Proof>,
    ) -> UpdateResult<()> {
        let Some(proof) = proof else {
            return Err(UpdateError::AuthorizationDenied);
        };
        if maintainers.is_empty() {
            return Err(UpdateError::AuthorizationDenied);
        }
        if authorize(maintainers, proof).is_authorized() {
            Ok(())
        } else {
            Err(UpdateError::AuthorizationDenied)
        }
    }

    fn object_source(&self, object: &RpslObject) -> UpdateResult<Source> {
        let value = object
            .source_value()
            .ok_or_else(|| single_violation("source", "missing mandatory attribute"))?;
        Source::new(value).map_err(|_| single_violation("source", "invalid source name"))
    }
}

fn single_violation(attribute: &str, reason: &str) -> UpdateError {
    UpdateError::Validation(Violations {
        violations: vec![Violation::new(attribute, reason)],
    })
}
