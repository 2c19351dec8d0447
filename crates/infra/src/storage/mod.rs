//! Key/value storage abstractions.
//!
//! The tracker treats storage as an opaque string store: values are written and
//! read back whole, with no transactions across keys.

mod memory;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::InMemoryStorage;
pub use sqlite::SqliteStorage;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend rejected or failed the operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// The backend could not be reached at all.
    #[error("storage unavailable")]
    Unavailable,
}

/// Asynchronous string store addressed by key.
///
/// `durable` selects the scope: the same key in the durable scope and in the
/// session scope holds two independent values.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`, not an error.
    async fn get(&self, key: &str, durable: bool) -> Result<Option<String>, StorageError>;

    /// Write (insert or overwrite) a value.
    async fn set(&self, key: &str, value: &str, durable: bool) -> Result<(), StorageError>;
}

#[async_trait]
impl<S> KeyValueStorage for Arc<S>
where
    S: KeyValueStorage + ?Sized,
{
    async fn get(&self, key: &str, durable: bool) -> Result<Option<String>, StorageError> {
        (**self).get(key, durable).await
    }

    async fn set(&self, key: &str, value: &str, durable: bool) -> Result<(), StorageError> {
        (**self).set(key, value, durable).await
    }
}
