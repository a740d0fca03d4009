//! The store façade: single-shot CRUD and query operations, one engine
//! scope per call.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use common::Engine;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::key::{Key, KeyType};
use crate::query::{apply_offset_and_limit, Entry, Query};
use crate::read::DatastoreRead;
use crate::scan::scan_with_cursor;
use crate::txn::Transaction;

/// A datastore backed by an ordered key-value engine.
///
/// Every non-transactional operation opens its own engine scope, so two
/// sequential calls have no atomicity relationship to each other; use
/// [`new_transaction`](Datastore::new_transaction) to group operations
/// atomically.
///
/// # Thread Safety
///
/// `Datastore` is designed to be shared across tasks. All methods take
/// `&self`; the engine handle is shared read-only.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
///
/// use bytes::Bytes;
/// use common::InMemoryEngine;
/// use datastore::{Config, Datastore, DatastoreRead, Key};
///
/// let store = Datastore::new(Arc::new(InMemoryEngine::new()), Config::default());
///
/// store.put(&Key::from_bytes("user:123"), Bytes::from("alice")).await?;
/// let value = store.get(&Key::from_bytes("user:123")).await?;
/// assert_eq!(value, Bytes::from("alice"));
/// ```
pub struct Datastore {
    engine: Arc<dyn Engine>,
    bucket: Bytes,
    key_type: KeyType,
}

impl Datastore {
    /// Creates a datastore over the given engine.
    pub fn new(engine: Arc<dyn Engine>, config: Config) -> Self {
        Self {
            engine,
            bucket: config.bucket,
            key_type: config.key_type,
        }
    }

    fn check_key(&self, key: &Key) -> Result<()> {
        if key.key_type() != self.key_type {
            return Err(Error::KeyTypeMismatch);
        }
        Ok(())
    }

    /// Stores `value` under `key`, overwriting any existing value.
    ///
    /// The value is stored verbatim; an empty value is allowed. The write
    /// scope's commit provides atomicity, so a failed write leaves nothing
    /// partially visible.
    pub async fn put(&self, key: &Key, value: Bytes) -> Result<()> {
        self.check_key(key)?;
        let mut scope = self.engine.begin_scope(true).await?;
        if let Err(err) = scope.put(&self.bucket, key.bytes(), value).await {
            let _ = scope.rollback().await;
            return Err(err.into());
        }
        scope.commit().await?;
        Ok(())
    }

    /// Removes `key` if present. Deleting an absent key is not an error.
    pub async fn delete(&self, key: &Key) -> Result<()> {
        self.check_key(key)?;
        let mut scope = self.engine.begin_scope(true).await?;
        if let Err(err) = scope.delete(&self.bucket, key.as_slice()).await {
            let _ = scope.rollback().await;
            return Err(err.into());
        }
        scope.commit().await?;
        Ok(())
    }

    /// Sync is a no-op in this layer: durability is delegated entirely to
    /// the engine's write-scope commit.
    pub async fn sync(&self, _prefix: &Key) -> Result<()> {
        Ok(())
    }

    /// Begins an explicit transaction over one engine scope.
    ///
    /// A writable transaction blocks until it is the single active writer.
    pub async fn new_transaction(&self, read_only: bool) -> Result<Transaction> {
        let scope = self.engine.begin_scope(!read_only).await?;
        Ok(Transaction::new(scope, self.bucket.clone(), self.key_type))
    }

    /// Closes the underlying engine.
    pub async fn close(&self) -> Result<()> {
        self.engine.close().await.map_err(Into::into)
    }
}

#[async_trait]
impl DatastoreRead for Datastore {
    async fn get(&self, key: &Key) -> Result<Bytes> {
        self.check_key(key)?;
        let scope = self.engine.begin_scope(false).await?;
        let value = scope.get(&self.bucket, key.as_slice()).await;
        scope.rollback().await?;
        value?.ok_or(Error::NotFound)
    }

    async fn has(&self, key: &Key) -> Result<bool> {
        match self.get(key).await {
            Ok(_) => Ok(true),
            Err(Error::NotFound) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn get_size(&self, key: &Key) -> Result<usize> {
        Ok(self.get(key).await?.len())
    }

    async fn query(&self, query: &Query) -> Result<Vec<Entry>> {
        let scope = self.engine.begin_scope(false).await?;
        let entries = match scope.cursor(&self.bucket).await {
            Ok(mut cursor) => scan_with_cursor(cursor.as_mut(), query, self.key_type).await,
            Err(err) => Err(err.into()),
        };
        scope.rollback().await?;
        Ok(apply_offset_and_limit(query, entries?))
    }
}
