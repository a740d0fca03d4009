//! The transaction façade: the store's CRUD/query contract bound to one
//! engine scope, with explicit commit or discard.

use async_trait::async_trait;
use bytes::Bytes;
use common::Scope;

use crate::error::{Error, Result};
use crate::key::{Key, KeyType};
use crate::query::{apply_offset_and_limit, Entry, Query};
use crate::read::DatastoreRead;
use crate::scan::scan_with_cursor;

/// An explicit transaction over one engine scope.
///
/// All operations apply within that scope, so multiple operations are
/// atomic together: a `put` is visible to subsequent reads through the same
/// transaction, but to nothing else until [`commit`](Transaction::commit)
/// succeeds.
///
/// Exactly one of `commit` / `discard` terminates a transaction. Both
/// consume it, so operations after termination do not compile.
///
/// A transaction exclusively owns its scope and must not be shared across
/// concurrent callers. Writes through a read-only transaction fail with the
/// engine's read-only scope error; this layer does not duplicate that
/// check.
pub struct Transaction {
    scope: Box<dyn Scope>,
    bucket: Bytes,
    key_type: KeyType,
}

impl Transaction {
    pub(crate) fn new(scope: Box<dyn Scope>, bucket: Bytes, key_type: KeyType) -> Self {
        Self {
            scope,
            bucket,
            key_type,
        }
    }

    fn check_key(&self, key: &Key) -> Result<()> {
        if key.key_type() != self.key_type {
            return Err(Error::KeyTypeMismatch);
        }
        Ok(())
    }

    /// Stores `value` under `key` within this transaction.
    pub async fn put(&mut self, key: &Key, value: Bytes) -> Result<()> {
        self.check_key(key)?;
        self.scope
            .put(&self.bucket, key.bytes(), value)
            .await
            .map_err(Into::into)
    }

    /// Removes `key` within this transaction. Deleting an absent key is not
    /// an error.
    pub async fn delete(&mut self, key: &Key) -> Result<()> {
        self.check_key(key)?;
        self.scope
            .delete(&self.bucket, key.as_slice())
            .await
            .map_err(Into::into)
    }

    /// Durably applies all mutations made through this transaction.
    ///
    /// On failure none of the transaction's mutations are visible.
    pub async fn commit(self) -> Result<()> {
        self.scope.commit().await.map_err(Into::into)
    }

    /// Abandons all mutations made through this transaction.
    ///
    /// Always succeeds from the caller's perspective: a failing rollback is
    /// logged and swallowed, since the discarding caller already intends to
    /// drop the work.
    pub async fn discard(self) {
        if let Err(err) = self.scope.rollback().await {
            tracing::warn!("transaction rollback failed: {}", err);
        }
    }
}

#[async_trait]
impl DatastoreRead for Transaction {
    /// Reads, unlike the store's, go directly against the transaction's
    /// scope, so they observe its uncommitted writes.
    async fn get(&self, key: &Key) -> Result<Bytes> {
        self.check_key(key)?;
        let value = self.scope.get(&self.bucket, key.as_slice()).await?;
        value.ok_or(Error::NotFound)
    }

    async fn has(&self, key: &Key) -> Result<bool> {
        self.check_key(key)?;
        let value = self.scope.get(&self.bucket, key.as_slice()).await?;
        Ok(value.is_some())
    }

    async fn get_size(&self, key: &Key) -> Result<usize> {
        self.check_key(key)?;
        let value = self.scope.get(&self.bucket, key.as_slice()).await?;
        value.map(|v| v.len()).ok_or(Error::NotFound)
    }

    async fn query(&self, query: &Query) -> Result<Vec<Entry>> {
        let mut cursor = self.scope.cursor(&self.bucket).await?;
        let entries = scan_with_cursor(cursor.as_mut(), query, self.key_type).await?;
        Ok(apply_offset_and_limit(query, entries))
    }
}
