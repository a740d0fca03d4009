use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{Cursor, Engine, EngineError, EngineResult, Record, Scope};

type Bucket = BTreeMap<Bytes, Bytes>;
type Buckets = HashMap<Bytes, Bucket>;

/// In-memory implementation of the [`Engine`] trait using a BTreeMap per
/// bucket.
///
/// This implementation stores all data in memory and is useful for testing
/// or scenarios where durability is not required. It honors the engine
/// contract exactly: read scopes observe a snapshot taken when the scope was
/// opened, at most one writable scope is active at a time, and a writable
/// scope's mutations are published atomically on commit.
pub struct InMemoryEngine {
    buckets: Arc<RwLock<Buckets>>,
    writer: Arc<Mutex<()>>,
}

impl InMemoryEngine {
    /// Creates a new InMemoryEngine instance with an empty store.
    pub fn new() -> Self {
        Self {
            buckets: Arc::new(RwLock::new(HashMap::new())),
            writer: Arc::new(Mutex::new(())),
        }
    }
}

impl Default for InMemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for InMemoryEngine {
    #[tracing::instrument(level = "trace", skip_all)]
    async fn begin_scope(&self, writable: bool) -> EngineResult<Box<dyn Scope>> {
        // The writer lock is taken before the snapshot so that a writable
        // scope always starts from the latest committed state.
        let write_guard = if writable {
            Some(Arc::clone(&self.writer).lock_owned().await)
        } else {
            None
        };

        let view = self
            .buckets
            .read()
            .map_err(|e| EngineError::Internal(format!("failed to acquire read lock: {}", e)))?
            .clone();

        Ok(Box::new(InMemoryScope {
            view,
            shared: Arc::clone(&self.buckets),
            write_guard,
        }))
    }

    async fn close(&self) -> EngineResult<()> {
        Ok(())
    }
}

/// A scope over the in-memory engine.
///
/// Holds a full working copy of the store. Read scopes never touch the
/// shared state again; a writable scope mutates its working copy and swaps
/// it into the shared state on commit, while holding the writer guard.
struct InMemoryScope {
    view: Buckets,
    shared: Arc<RwLock<Buckets>>,
    write_guard: Option<OwnedMutexGuard<()>>,
}

impl InMemoryScope {
    fn check_writable(&self) -> EngineResult<()> {
        if self.write_guard.is_none() {
            return Err(EngineError::ReadOnly);
        }
        Ok(())
    }
}

#[async_trait]
impl Scope for InMemoryScope {
    #[tracing::instrument(level = "trace", skip_all)]
    async fn get(&self, bucket: &[u8], key: &[u8]) -> EngineResult<Option<Bytes>> {
        Ok(self.view.get(bucket).and_then(|b| b.get(key).cloned()))
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn put(&mut self, bucket: &[u8], key: Bytes, value: Bytes) -> EngineResult<()> {
        self.check_writable()?;
        self.view
            .entry(Bytes::copy_from_slice(bucket))
            .or_default()
            .insert(key, value);
        Ok(())
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn delete(&mut self, bucket: &[u8], key: &[u8]) -> EngineResult<()> {
        self.check_writable()?;
        if let Some(b) = self.view.get_mut(bucket) {
            b.remove(key);
        }
        Ok(())
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn cursor(&self, bucket: &[u8]) -> EngineResult<Box<dyn Cursor + Send>> {
        let records: Vec<Record> = self
            .view
            .get(bucket)
            .map(|b| {
                b.iter()
                    .map(|(k, v)| Record::new(k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Ok(Box::new(InMemoryCursor { records, pos: 0 }))
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn commit(self: Box<Self>) -> EngineResult<()> {
        self.check_writable()?;
        let InMemoryScope { view, shared, write_guard } = *self;
        {
            let mut shared = shared.write().map_err(|e| {
                EngineError::Internal(format!("failed to acquire write lock: {}", e))
            })?;
            *shared = view;
        }
        // The writer guard is held until the new state is published.
        drop(write_guard);
        Ok(())
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn rollback(self: Box<Self>) -> EngineResult<()> {
        Ok(())
    }
}

/// Cursor over a materialized, sorted view of one bucket.
struct InMemoryCursor {
    records: Vec<Record>,
    /// Index of the record the next `next()` call returns.
    pos: usize,
}

#[async_trait]
impl Cursor for InMemoryCursor {
    #[tracing::instrument(level = "trace", skip_all)]
    async fn seek(&mut self, key: &[u8]) -> EngineResult<Option<Record>> {
        let idx = self.records.partition_point(|r| &r.key[..] < key);
        match self.records.get(idx) {
            Some(record) => {
                self.pos = idx + 1;
                Ok(Some(record.clone()))
            }
            None => {
                self.pos = self.records.len();
                Ok(None)
            }
        }
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn first(&mut self) -> EngineResult<Option<Record>> {
        self.seek(&[]).await
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn next(&mut self) -> EngineResult<Option<Record>> {
        match self.records.get(self.pos) {
            Some(record) => {
                self.pos += 1;
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }
}
