use std::collections::BTreeSet;

use whirr_schema::SchemaRegistry;
use whirr_store::RegistryStore;
use whirr_types::{ObjectClass, ObjectKey, Source};
use whirr_validate::ObjectLookup;

/// Backs the validator's lookup seam with the storage gateway.
pub struct StoreLookup<'a> {
    store: &'a dyn RegistryStore,
    schemas: &'a SchemaRegistry,
}

impl<'a> StoreLookup<'a> {
    pub fn new(store: &'a dyn RegistryStore, schemas: &'a SchemaRegistry) -> Self {
        Self { store, schemas }
    }
}

impl ObjectLookup for StoreLookup<'_> {
    fn exists(&self, source: &Source, classes: &[ObjectClass], pk: &str) -> bool {
        classes.iter().any(|&class| {
            let key = ObjectKey::new(source.clone(), class, pk.to_string());
            matches!(self.store.get(&key), Ok(Some(_)))
        })
    }

    fn referenced_by(&self, key: &ObjectKey) -> Vec<ObjectKey> {
        // Every lookup-keyed attribute that hard-references this class, in
        // any schema, could hold a reference to the target.
        let mut attribute_names: BTreeSet<&'static str> = BTreeSet::new();
        for class in ObjectClass::ALL {
            for rule in &self.schemas.schema_for(class).attributes {
                if rule.is_hard_reference()
                    && rule.lookup_key
                    && rule.references.contains(&key.class)
                {
                    attribute_names.insert(rule.name);
                }
            }
        }

        let mut referrers = Vec::new();
        for name in attribute_names {
            let Ok(hits) = self.store.get_by_attribute(&key.source, None, name, &key.pk) else {
                continue;
            };
            for hit in hits {
                if hit.key != *key && !referrers.contains(&hit.key) {
                    referrers.push(hit.key);
                }
            }
        }
        referrers
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use whirr_store::MemoryStore;
    use whirr_types::{RpslAttribute, RpslObject};

    fn src() -> Source {
        Source::new("TEST").unwrap()
    }

    fn seed(store: &MemoryStore, class: ObjectClass, attrs: Vec<(&str, &str)>, pk: &str) {
        let object = RpslObject::new(
            class,
            attrs
                .into_iter()
                .map(|(n, v)| RpslAttribute::new(n, v))
                .collect(),
        );
        let key = ObjectKey::new(src(), class, pk.to_string());
        store.put(object, key, None).unwrap();
    }

    #[test]
    fn exists_checks_each_allowed_class() {
        let schemas = Arc::new(SchemaRegistry::builtin());
        let store = MemoryStore::new(Arc::clone(&schemas));
        seed(
            &store,
            ObjectClass::Role,
            vec![("role", "Ops"), ("nic-hdl", "OPS1-TEST"), ("source", "TEST")],
            "OPS1-TEST",
        );
        let lookup = StoreLookup::new(&store, &schemas);
        // admin-c references may resolve to a person OR a role.
        assert!(lookup.exists(
            &src(),
            &[ObjectClass::Person, ObjectClass::Role],
            "OPS1-TEST"
        ));
        assert!(!lookup.exists(&src(), &[ObjectClass::Person], "OPS1-TEST"));
    }

    #[test]
    fn referenced_by_finds_hard_referrers() {
        let schemas = Arc::new(SchemaRegistry::builtin());
        let store = MemoryStore::new(Arc::clone(&schemas));
        seed(
            &store,
            ObjectClass::Mntner,
            vec![
                ("mntner", "EXAMPLE-MNT"),
                ("admin-c", "JD1-TEST"),
                ("source", "TEST"),
            ],
            "EXAMPLE-MNT",
        );
        seed(
            &store,
            ObjectClass::Route,
            vec![
                ("route", "192.0.2.0/24"),
                ("origin", "AS65000"),
                ("mnt-by", "EXAMPLE-MNT"),
                ("source", "TEST"),
            ],
            "192.0.2.0/24AS65000",
        );
        let lookup = StoreLookup::new(&store, &schemas);
        let target = ObjectKey::new(src(), ObjectClass::Mntner, "EXAMPLE-MNT".to_string());
        let referrers = lookup.referenced_by(&target);
        assert_eq!(referrers.len(), 1);
        assert_eq!(referrers[0].class, ObjectClass::Route);
    }

    #[test]
    fn self_reference_does_not_count() {
        let schemas = Arc::new(SchemaRegistry::builtin());
        let store = MemoryStore::new(Arc::clone(&schemas));
        seed(
            &store,
            ObjectClass::Mntner,
            vec![
                ("mntner", "SELF-MNT"),
                ("admin-c", "JD1-TEST"),
                ("mnt-by", "SELF-MNT"),
                ("source", "TEST"),
            ],
            "SELF-MNT",
        );
        let lookup = StoreLookup::new(&store, &schemas);
        let target = ObjectKey::new(src(), ObjectClass::Mntner, "SELF-MNT".to_string());
        assert!(lookup.referenced_by(&target).is_empty());
    }
}
