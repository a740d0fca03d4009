//! Query descriptors and scan result entries.

use bytes::Bytes;

use crate::key::Key;

/// A single result of a query scan.
///
/// Entries are independent copies; they never alias engine-owned memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// The entry's key.
    pub key: Key,
    /// The stored value, or `None` when the query requested keys only.
    pub value: Option<Bytes>,
    /// Byte length of the stored value, populated even for keys-only queries.
    pub size: usize,
}

impl Entry {
    /// Builds an entry from raw cursor output, copying both key and value.
    pub(crate) fn from_parts(key: &[u8], value: &[u8], keys_only: bool) -> Self {
        Self {
            key: Key::from_bytes(Bytes::copy_from_slice(key)),
            value: (!keys_only).then(|| Bytes::copy_from_slice(value)),
            size: value.len(),
        }
    }
}

/// Key bounds for a query: `start` inclusive, `end` exclusive.
#[derive(Clone, Debug, Default)]
pub struct KeyRange {
    pub start: Option<Key>,
    pub end: Option<Key>,
}

/// A declarative query over the store.
///
/// All constraints are optional and combine: the scan starts at the greater
/// of `prefix` and `range.start`, stops before `range.end`, and only visits
/// keys carrying `prefix`. A key byte-equal to the prefix itself is never
/// returned; only strict descendants qualify. A zero-length prefix is
/// equivalent to no prefix filter at all.
#[derive(Clone, Debug, Default)]
pub struct Query {
    /// Restricts results to keys of which this is a strict byte prefix.
    pub prefix: Option<Key>,
    /// Bounds on the scanned key interval.
    pub range: KeyRange,
    /// When true, entries carry no value. Sizes are still populated.
    pub keys_only: bool,
    /// Number of leading entries to drop after the raw scan.
    pub offset: usize,
    /// Maximum number of entries to return after `offset` is applied.
    pub limit: Option<usize>,
}

/// Applies the descriptor's offset/limit to a raw scan result.
///
/// This runs after the byte-scan itself and is independent of the engine:
/// the planner produces the filtered raw sequence in ascending key order,
/// and this pass trims it.
pub(crate) fn apply_offset_and_limit(query: &Query, entries: Vec<Entry>) -> Vec<Entry> {
    let iter = entries.into_iter().skip(query.offset);
    match query.limit {
        Some(limit) => iter.take(limit).collect(),
        None => iter.collect(),
    }
}
