//! The [`DatastoreRead`] trait: read operations shared by the store and
//! transaction façades.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::key::Key;
use crate::query::{Entry, Query};

/// Trait for read operations on the datastore.
///
/// This trait defines the common read interface shared by
/// [`Datastore`](crate::Datastore) and [`Transaction`](crate::Transaction):
/// the store serves each call from its own read scope, while a transaction
/// serves them all from its single scope.
#[async_trait]
pub trait DatastoreRead {
    /// Gets the value stored under `key`.
    ///
    /// The returned bytes are an independent copy and never alias
    /// engine-owned mutable memory.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`](crate::Error::NotFound) if the key is absent.
    async fn get(&self, key: &Key) -> Result<Bytes>;

    /// Returns whether `key` is present: true iff [`get`](DatastoreRead::get)
    /// would succeed.
    async fn has(&self, key: &Key) -> Result<bool>;

    /// Returns the byte length of the value stored under `key`.
    ///
    /// An empty stored value is present with size 0, distinct from an
    /// absent key.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`](crate::Error::NotFound) if the key is absent.
    async fn get_size(&self, key: &Key) -> Result<usize>;

    /// Runs `query` and returns the matching entries in ascending key
    /// order.
    async fn query(&self, query: &Query) -> Result<Vec<Entry>>;
}
