//! Datastore - a query and transaction layer over an ordered key-value engine.
//!
//! Datastore exposes CRUD operations, prefix/range queries, and
//! transactional isolation over an embedded, ordered key-value storage
//! engine (the `common::Engine` seam). Its core job is translating a
//! declarative [`Query`] into a correct, single forward-cursor scan over a
//! byte-ordered keyspace.
//!
//! # Architecture
//!
//! The store façade ([`Datastore`]) validates key types, opens an implicit
//! engine scope per operation, and delegates queries to the range-scan
//! planner. The transaction façade ([`Transaction`]) exposes the identical
//! contract against one explicit scope, so multiple operations are atomic
//! together.
//!
//! # Key Concepts
//!
//! - **[`Datastore`]**: the main entry point; one scope per operation.
//! - **[`Transaction`]**: the same contract bound to a single read-only or
//!   read-write scope, terminated by exactly one of commit / discard.
//! - **[`DatastoreRead`]**: the read interface shared by both, allowing
//!   generic code to read through either.
//! - **[`Query`]**: prefix filter, inclusive-start/exclusive-end range
//!   bounds, keys-only mode, and offset/limit post-processing. A prefix
//!   query returns only strict descendants of the prefix — never the key
//!   equal to the prefix itself.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use bytes::Bytes;
//! use common::InMemoryEngine;
//! use datastore::{Config, Datastore, DatastoreRead, Key, Query};
//!
//! let store = Datastore::new(Arc::new(InMemoryEngine::new()), Config::default());
//!
//! store.put(&Key::from_bytes("keks"), Bytes::from("v1")).await?;
//! store.put(&Key::from_bytes("keks2"), Bytes::from("v2")).await?;
//!
//! // Prefix queries exclude the key equal to the prefix itself.
//! let entries = store
//!     .query(&Query {
//!         prefix: Some(Key::from_bytes("keks")),
//!         ..Query::default()
//!     })
//!     .await?;
//! assert_eq!(entries.len(), 1);
//!
//! // Transactions group operations atomically.
//! let mut txn = store.new_transaction(false).await?;
//! txn.put(&Key::from_bytes("a"), Bytes::from("1")).await?;
//! txn.put(&Key::from_bytes("b"), Bytes::from("2")).await?;
//! txn.commit().await?;
//! ```

mod config;
mod error;
mod key;
mod query;
mod read;
mod scan;
mod store;
mod txn;

pub use config::{Config, DEFAULT_BUCKET};
pub use error::{Error, Result};
pub use key::{Key, KeyType};
pub use query::{Entry, KeyRange, Query};
pub use read::DatastoreRead;
pub use store::Datastore;
pub use txn::Transaction;
