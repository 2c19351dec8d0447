//! Loading and saving the inventory collections.
//!
//! Storage failures never reach the user: a failed load starts from empty
//! collections and a failed save leaves the in-memory state authoritative.
//! Both are logged.

mod scheduler;

use std::time::Duration;

use stockroom_inventory::{InventorySnapshot, decode_items, decode_transactions};

use crate::storage::KeyValueStorage;

pub use scheduler::{PersistenceScheduler, SaveOutcome};

/// Storage keys for the two collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub items: String,
    pub transactions: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            items: "inv_items".to_string(),
            transactions: "inv_tx".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceConfig {
    pub keys: StorageKeys,
    /// Quiet period before a scheduled write fires.
    pub debounce: Duration,
    /// Storage scope passed to every read and write.
    pub durable: bool,
}

impl PersistenceConfig {
    pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            keys: StorageKeys::default(),
            debounce: Self::DEFAULT_DEBOUNCE,
            durable: true,
        }
    }
}

/// Result of the one-shot initial load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOutcome {
    pub snapshot: InventorySnapshot,
    /// True when a read or decode failed; both collections are then empty.
    pub degraded: bool,
}

/// Read both collections. Absent keys load as empty collections.
pub async fn load(storage: &dyn KeyValueStorage, config: &PersistenceConfig) -> LoadOutcome {
    let (items_raw, tx_raw) = tokio::join!(
        storage.get(&config.keys.items, config.durable),
        storage.get(&config.keys.transactions, config.durable),
    );

    let items = match items_raw {
        Ok(Some(raw)) => decode_items(&raw).map_err(|err| {
            tracing::warn!(key = %config.keys.items, error = %err, "discarding undecodable items");
        }),
        Ok(None) => Ok(Vec::new()),
        Err(err) => {
            tracing::warn!(key = %config.keys.items, error = %err, "failed to load items");
            Err(())
        }
    };

    let transactions = match tx_raw {
        Ok(Some(raw)) => decode_transactions(&raw).map_err(|err| {
            tracing::warn!(key = %config.keys.transactions, error = %err, "discarding undecodable transactions");
        }),
        Ok(None) => Ok(Vec::new()),
        Err(err) => {
            tracing::warn!(key = %config.keys.transactions, error = %err, "failed to load transactions");
            Err(())
        }
    };

    // Item quantities are only meaningful next to their history: both load or neither does.
    let outcome = match (items, transactions) {
        (Ok(items), Ok(transactions)) => LoadOutcome {
            snapshot: InventorySnapshot {
                items,
                transactions,
            },
            degraded: false,
        },
        _ => LoadOutcome {
            snapshot: InventorySnapshot::default(),
            degraded: true,
        },
    };

    tracing::info!(
        items = outcome.snapshot.items.len(),
        transactions = outcome.snapshot.transactions.len(),
        degraded = outcome.degraded,
        "inventory loaded"
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryStorage, StorageError};
    use async_trait::async_trait;
    use chrono::Utc;
    use stockroom_core::{ItemId, TransactionId};
    use stockroom_inventory::{
        Category, Item, Transaction, TransactionKind, Unit, encode_items, encode_transactions,
    };

    struct BrokenStorage;

    #[async_trait]
    impl KeyValueStorage for BrokenStorage {
        async fn get(&self, _key: &str, _durable: bool) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        async fn set(&self, _key: &str, _value: &str, _durable: bool) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[tokio::test]
    async fn empty_storage_loads_empty_collections() {
        let outcome = load(&InMemoryStorage::new(), &PersistenceConfig::default()).await;
        assert!(outcome.snapshot.items.is_empty());
        assert!(outcome.snapshot.transactions.is_empty());
        assert!(!outcome.degraded);
    }

    #[tokio::test]
    async fn stored_items_are_decoded() {
        let storage = InMemoryStorage::new();
        let item = Item {
            id: ItemId::new(),
            name: "Stapler".to_string(),
            category: Category::OfficeSupplies,
            unit: Unit::Each,
            qty: 3,
            min_stock: 1,
            created_at: Utc::now(),
        };
        storage
            .set("inv_items", &encode_items(&[item.clone()]).unwrap(), true)
            .await
            .unwrap();

        let outcome = load(&storage, &PersistenceConfig::default()).await;
        assert_eq!(outcome.snapshot.items, vec![item]);
        assert!(outcome.snapshot.transactions.is_empty());
    }

    #[tokio::test]
    async fn unreadable_or_corrupt_storage_degrades_to_empty() {
        let outcome = load(&BrokenStorage, &PersistenceConfig::default()).await;
        assert!(outcome.degraded);
        assert!(outcome.snapshot.items.is_empty());

        let storage = InMemoryStorage::new();
        storage.set("inv_tx", "{{{", true).await.unwrap();
        let outcome = load(&storage, &PersistenceConfig::default()).await;
        assert!(outcome.degraded);
        assert!(outcome.snapshot.transactions.is_empty());
    }

    fn stapler() -> Item {
        Item {
            id: ItemId::new(),
            name: "Stapler".to_string(),
            category: Category::OfficeSupplies,
            unit: Unit::Each,
            qty: 10,
            min_stock: 1,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn corrupt_history_discards_the_items_too() {
        let storage = InMemoryStorage::new();
        storage
            .set("inv_items", &encode_items(&[stapler()]).unwrap(), true)
            .await
            .unwrap();
        storage.set("inv_tx", "{corrupt", true).await.unwrap();

        let outcome = load(&storage, &PersistenceConfig::default()).await;
        assert!(outcome.degraded);
        assert!(outcome.snapshot.items.is_empty());
        assert!(outcome.snapshot.transactions.is_empty());
    }

    #[tokio::test]
    async fn corrupt_items_discard_the_history_too() {
        let storage = InMemoryStorage::new();
        let item = stapler();
        let tx = Transaction {
            id: TransactionId::new(),
            item_id: item.id,
            kind: TransactionKind::In,
            qty: 10,
            note: "initial stock".to_string(),
            by: "system".to_string(),
            date: Utc::now(),
        };
        storage
            .set("inv_tx", &encode_transactions(&[tx]).unwrap(), true)
            .await
            .unwrap();
        storage.set("inv_items", "not json", true).await.unwrap();

        let outcome = load(&storage, &PersistenceConfig::default()).await;
        assert!(outcome.degraded);
        assert!(outcome.snapshot.items.is_empty());
        assert!(outcome.snapshot.transactions.is_empty());
    }
}
