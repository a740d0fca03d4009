//! Configuration for opening a datastore.

use bytes::Bytes;

use crate::key::KeyType;

/// Bucket used when the caller does not name one.
pub const DEFAULT_BUCKET: &[u8] = b"datastore";

/// Configuration for opening a [`Datastore`](crate::Datastore).
#[derive(Clone, Debug)]
pub struct Config {
    /// The engine bucket all of the store's operations run against.
    pub bucket: Bytes,
    /// The single key type the store accepts for its lifetime.
    pub key_type: KeyType,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket: Bytes::from_static(DEFAULT_BUCKET),
            key_type: KeyType::Bytes,
        }
    }
}
