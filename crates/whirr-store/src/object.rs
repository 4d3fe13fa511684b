use whirr_types::{ObjectKey, RpslObject};

/// An object as held by the storage gateway: the parsed object plus its
/// storage identity and bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredRpslObject {
    pub object: RpslObject,
    pub key: ObjectKey,
    /// Incremented on every successful put; the compare-and-swap token.
    pub version: u64,
    /// Source-scoped insertion order; query results within one source
    /// follow this order.
    pub seq: u64,
}
