//! Domain State: the item and transaction collections.

use serde::{Deserialize, Serialize};

use stockroom_core::ItemId;

use crate::item::Item;
use crate::transaction::Transaction;

/// A consistent pair of collections.
///
/// Command handlers produce one of these as the *next* state; the persistence
/// layer receives one as the state to write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Insertion order.
    pub items: Vec<Item>,
    /// Most-recent-first.
    pub transactions: Vec<Transaction>,
}

/// Single source of truth for items and transactions.
///
/// Both collections are only ever swapped together through [`InventoryState::replace`],
/// so readers never observe an item whose `qty` disagrees with its history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryState {
    items: Vec<Item>,
    transactions: Vec<Transaction>,
}

impl InventoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from previously persisted collections.
    pub fn from_snapshot(snapshot: InventorySnapshot) -> Self {
        Self {
            items: snapshot.items,
            transactions: snapshot.transactions,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == *id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.transactions.is_empty()
    }

    /// Replace both collections at once.
    pub fn replace(&mut self, next: InventorySnapshot) {
        self.items = next.items;
        self.transactions = next.transactions;
    }

    /// Owned copy of the current pair.
    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            items: self.items.clone(),
            transactions: self.transactions.clone(),
        }
    }
}
