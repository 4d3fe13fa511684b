use whirr_types::{ObjectClass, ObjectKey, Source};

/// Existence and reverse-reference queries the validator needs from
/// storage.
///
/// A seam rather than a direct store dependency: the write pipeline backs
/// it with the storage gateway; tests back it with a map.
pub trait ObjectLookup {
    /// Does an object of any of `classes` exist in `source` under the
    /// normalized primary key `pk`?
    fn exists(&self, source: &Source, classes: &[ObjectClass], pk: &str) -> bool;

    /// Keys of still-existing objects holding a schema-enforced hard
    /// reference to `key`, excluding `key` itself (self-references do not
    /// block deletion).
    fn referenced_by(&self, key: &ObjectKey) -> Vec<ObjectKey>;
}
