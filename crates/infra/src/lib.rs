//! Infrastructure layer: storage adapters and write-behind persistence.

pub mod persistence;
pub mod storage;

pub use persistence::{
    LoadOutcome, PersistenceConfig, PersistenceScheduler, SaveOutcome, StorageKeys, load,
};
pub use storage::{InMemoryStorage, KeyValueStorage, SqliteStorage, StorageError};
