use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use whirr_schema::{SchemaRegistry, ValueSyntax};
use whirr_types::{
    normalize_pk, split_list_value, ObjectClass, ObjectKey, RpslObject, Source,
};

use crate::error::{StoreError, StoreResult};
use crate::object::StoredRpslObject;
use crate::traits::RegistryStore;

/// In-memory, BTreeMap-based registry store.
///
/// The reference backend: used by tests and the standalone daemon. All
/// state lives behind one `RwLock`, which also makes every call atomic.
/// Secondary indexes are maintained from the schema's lookup-key flags on
/// every write.
pub struct MemoryStore {
    schemas: Arc<SchemaRegistry>,
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    objects: BTreeMap<ObjectKey, StoredRpslObject>,
    /// (source, attribute, normalized value) -> keys in insertion order.
    attr_index: HashMap<(Source, String, String), Vec<ObjectKey>>,
    /// Per-source insertion counter.
    next_seq: HashMap<Source, u64>,
}

impl MemoryStore {
    pub fn new(schemas: Arc<SchemaRegistry>) -> Self {
        Self {
            schemas,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Number of stored objects across all sources.
    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").objects.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").objects.is_empty()
    }

    /// Index terms for one attribute value: the full normalized value, plus
    /// each list element for member-list attributes.
    fn index_terms(&self, class: ObjectClass, name: &str, value: &str) -> Vec<String> {
        let schema = self.schemas.schema_for(class);
        let Some(rule) = schema.rule(name) else {
            return Vec::new();
        };
        if !rule.lookup_key {
            return Vec::new();
        }
        let mut terms = vec![normalize_pk(value)];
        if rule.syntax == ValueSyntax::Members {
            for element in split_list_value(value) {
                terms.push(normalize_pk(element));
            }
        }
        terms.sort();
        terms.dedup();
        terms
    }

    fn index_object(inner: &mut Inner, terms: &[(String, String)], key: &ObjectKey) {
        for (name, term) in terms {
            let slot = inner
                .attr_index
                .entry((key.source.clone(), name.clone(), term.clone()))
                .or_default();
            if !slot.contains(key) {
                slot.push(key.clone());
            }
        }
    }

    fn unindex_object(inner: &mut Inner, terms: &[(String, String)], key: &ObjectKey) {
        for (name, term) in terms {
            let index_key = (key.source.clone(), name.clone(), term.clone());
            if let Some(slot) = inner.attr_index.get_mut(&index_key) {
                slot.retain(|k| k != key);
                if slot.is_empty() {
                    inner.attr_index.remove(&index_key);
                }
            }
        }
    }

    fn terms_for(&self, object: &RpslObject) -> Vec<(String, String)> {
        let mut terms = Vec::new();
        for attr in &object.attributes {
            for term in self.index_terms(object.class, &attr.name, &attr.value) {
                terms.push((attr.name.clone(), term));
            }
        }
        terms
    }
}

impl RegistryStore for MemoryStore {
    fn get(&self, key: &ObjectKey) -> StoreResult<Option<StoredRpslObject>> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.objects.get(key).cloned())
    }

    fn get_by_attribute(
        &self,
        source: &Source,
        class: Option<ObjectClass>,
        attribute: &str,
        value: &str,
    ) -> StoreResult<Vec<StoredRpslObject>> {
        let inner = self.inner.read().expect("lock poisoned");
        let index_key = (
            source.clone(),
            attribute.to_ascii_lowercase(),
            normalize_pk(value),
        );
        let mut hits: Vec<StoredRpslObject> = inner
            .attr_index
            .get(&index_key)
            .into_iter()
            .flatten()
            .filter_map(|key| inner.objects.get(key))
            .filter(|stored| class.map_or(true, |c| stored.key.class == c))
            .cloned()
            .collect();
        hits.sort_by_key(|stored| stored.seq);
        Ok(hits)
    }

    fn list_class(&self, source: &Source, class: ObjectClass) -> StoreResult<Vec<StoredRpslObject>> {
        let inner = self.inner.read().expect("lock poisoned");
        let mut hits: Vec<StoredRpslObject> = inner
            .objects
            .values()
            .filter(|stored| stored.key.source == *source && stored.key.class == class)
            .cloned()
            .collect();
        hits.sort_by_key(|stored| stored.seq);
        Ok(hits)
    }

    fn put(
        &self,
        object: RpslObject,
        key: ObjectKey,
        expected_version: Option<u64>,
    ) -> StoreResult<u64> {
        let new_terms = self.terms_for(&object);
        let mut inner = self.inner.write().expect("lock poisoned");

        let (version, seq) = match inner.objects.get(&key) {
            None => {
                if let Some(expected) = expected_version {
                    return Err(StoreError::VersionConflict {
                        key,
                        expected: Some(expected),
                        actual: None,
                    });
                }
                let seq_slot = inner.next_seq.entry(key.source.clone()).or_insert(0);
                *seq_slot += 1;
                (1, *seq_slot)
            }
            Some(existing) => {
                if expected_version != Some(existing.version) {
                    return Err(StoreError::VersionConflict {
                        key,
                        expected: expected_version,
                        actual: Some(existing.version),
                    });
                }
                let old_terms = self.terms_for(&existing.object);
                let existing_seq = existing.seq;
                let existing_version = existing.version;
                Self::unindex_object(&mut inner, &old_terms, &key);
                (existing_version + 1, existing_seq)
            }
        };

        Self::index_object(&mut inner, &new_terms, &key);
        inner.objects.insert(
            key.clone(),
            StoredRpslObject {
                object,
                key,
                version,
                seq,
            },
        );
        Ok(version)
    }

    fn delete(&self, key: &ObjectKey, expected_version: Option<u64>) -> StoreResult<()> {
        let mut inner = self.inner.write().expect("lock poisoned");
        let Some(existing) = inner.objects.get(key) else {
            return Err(StoreError::NotFound(key.clone()));
        };
        if let Some(expected) = expected_version {
            if expected != existing.version {
                return Err(StoreError::VersionConflict {
                    key: key.clone(),
                    expected: Some(expected),
                    actual: Some(existing.version),
                });
            }
        }
        let old_terms = self.terms_for(&existing.object);
        Self::unindex_object(&mut inner, &old_terms, key);
        inner.objects.remove(key);
        Ok(())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("object_count", &self.len())
            .finish()
    }
}
