use whirr_types::{ObjectClass, ObjectKey, Source};

use crate::error::StoreResult;
use crate::object::StoredRpslObject;

/// Transactional CRUD over registry objects keyed by (source, class,
/// primary key), with secondary lookup by indexed attributes.
///
/// All implementations must satisfy these invariants:
/// - Every call is an atomic transaction; a failed call leaves no partial
///   state behind.
/// - `put`/`delete` are compare-and-swap on the object's version: a write
///   that observes a version other than `expected_version` fails with
///   `VersionConflict` and changes nothing. Writes to one key are thereby
///   serialized; the caller owns retries.
/// - Reads never block writes and are safe from any thread.
/// - Secondary indexes cover exactly the attributes the schema marks as
///   lookup keys. Callers must not pass non-indexed attributes to
///   `get_by_attribute`; the searchability check belongs to the query
///   engine, which has the schema.
pub trait RegistryStore: Send + Sync {
    /// Read one object by its full key. `Ok(None)` if absent.
    fn get(&self, key: &ObjectKey) -> StoreResult<Option<StoredRpslObject>>;

    /// All objects in `source` whose indexed attribute `attribute` has the
    /// given value, optionally restricted to one class, in insertion order.
    fn get_by_attribute(
        &self,
        source: &Source,
        class: Option<ObjectClass>,
        attribute: &str,
        value: &str,
    ) -> StoreResult<Vec<StoredRpslObject>>;

    /// All objects of one class in one source, in insertion order.
    fn list_class(&self, source: &Source, class: ObjectClass) -> StoreResult<Vec<StoredRpslObject>>;

    /// Create or replace the object at `key`.
    ///
    /// `expected_version: None` asserts the object does not exist (create);
    /// `Some(v)` asserts the stored version is exactly `v` (update).
    /// Returns the new version.
    fn put(
        &self,
        object: whirr_types::RpslObject,
        key: ObjectKey,
        expected_version: Option<u64>,
    ) -> StoreResult<u64>;

    /// Delete the object at `key`.
    ///
    /// `expected_version: Some(v)` is compare-and-swap; `None` deletes
    /// unconditionally (mirror path). Deleting an absent object is
    /// `NotFound`.
    fn delete(&self, key: &ObjectKey, expected_version: Option<u64>) -> StoreResult<()>;
}
