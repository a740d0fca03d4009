//! The engine seam: traits describing the ordered key-value storage engine
//! the datastore layer runs on top of.
//!
//! The engine owns pages, durability, and disk files. This layer only
//! assumes the contract expressed here:
//!
//! - an ordered byte-string keyspace, partitioned into buckets,
//! - forward cursors supporting seek / first / next in ascending
//!   lexicographic byte order,
//! - read-only and read-write scopes with single-writer /
//!   concurrent-reader semantics,
//! - atomic commit or rollback of a scope's mutations.

pub mod in_memory;

use async_trait::async_trait;
use bytes::Bytes;

/// A key-value record as returned by engine cursors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub key: Bytes,
    pub value: Bytes,
}

impl Record {
    pub fn new(key: Bytes, value: Bytes) -> Self {
        Self { key, value }
    }
}

/// Error type for engine operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// I/O or structural failure from the underlying store.
    Engine(String),
    /// A write was attempted through a read-only scope.
    ReadOnly,
    /// Internal errors indicating bugs or invariant violations.
    Internal(String),
}

impl std::error::Error for EngineError {}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            EngineError::Engine(msg) => write!(f, "engine error: {}", msg),
            EngineError::ReadOnly => write!(f, "scope is read-only"),
            EngineError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// A forward-iterating positional handle over a bucket's ordered keyspace.
///
/// Cursors are bound to the scope that created them and observe that scope's
/// view of the bucket, including the scope's own uncommitted writes.
#[async_trait]
pub trait Cursor {
    /// Positions the cursor at the first key greater than or equal to `key`
    /// and returns that record, or `None` if no such key exists.
    async fn seek(&mut self, key: &[u8]) -> EngineResult<Option<Record>>;

    /// Positions the cursor at the first key in the bucket.
    async fn first(&mut self) -> EngineResult<Option<Record>>;

    /// Advances to the next key in ascending order, or `None` at the end.
    async fn next(&mut self) -> EngineResult<Option<Record>>;
}

/// A bounded read or read-write view into the engine.
///
/// A read-only scope observes a consistent snapshot as of when it was
/// opened. A read-write scope additionally buffers mutations that become
/// visible to other scopes only after [`commit`](Scope::commit). Exactly one
/// of `commit` / `rollback` terminates a scope; both consume it.
#[async_trait]
pub trait Scope: Send + Sync {
    /// Gets the value stored under `key` in `bucket`, if any.
    async fn get(&self, bucket: &[u8], key: &[u8]) -> EngineResult<Option<Bytes>>;

    /// Stores `value` under `key` in `bucket`, overwriting any existing value.
    ///
    /// Fails with [`EngineError::ReadOnly`] on a read-only scope.
    async fn put(&mut self, bucket: &[u8], key: Bytes, value: Bytes) -> EngineResult<()>;

    /// Removes `key` from `bucket`. Removing an absent key is not an error.
    ///
    /// Fails with [`EngineError::ReadOnly`] on a read-only scope.
    async fn delete(&mut self, bucket: &[u8], key: &[u8]) -> EngineResult<()>;

    /// Returns a cursor over `bucket` reflecting this scope's current view.
    async fn cursor(&self, bucket: &[u8]) -> EngineResult<Box<dyn Cursor + Send>>;

    /// Atomically applies this scope's mutations.
    async fn commit(self: Box<Self>) -> EngineResult<()>;

    /// Abandons this scope's mutations and releases its resources.
    async fn rollback(self: Box<Self>) -> EngineResult<()>;
}

/// Handle to an ordered key-value storage engine.
///
/// The handle is shared read-only by all callers; every interaction with
/// stored data happens through a [`Scope`].
#[async_trait]
pub trait Engine: Send + Sync {
    /// Begins a new scope.
    ///
    /// A writable scope blocks until it is the single active writer.
    /// Read-only scopes are concurrent with each other and with a writer.
    async fn begin_scope(&self, writable: bool) -> EngineResult<Box<dyn Scope>>;

    /// Closes the engine, releasing any resources.
    async fn close(&self) -> EngineResult<()>;
}
