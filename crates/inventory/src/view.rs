//! Derived view model.
//!
//! Everything here is a pure function of the current collections and is
//! recomputed on every read; nothing is cached between state changes.

use serde::{Deserialize, Serialize};

use stockroom_core::ItemId;

use crate::item::{Category, Item, Unit};
use crate::state::InventoryState;
use crate::transaction::{Transaction, TransactionKind};

/// Stock status of a single item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Normal,
    Low,
    Out,
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Normal => "normal",
            StockStatus::Low => "low",
            StockStatus::Out => "out",
        }
    }
}

/// `Out` at zero, `Low` up to and including `min_stock`, `Normal` above it.
pub fn stock_status(item: &Item) -> StockStatus {
    if item.qty == 0 {
        StockStatus::Out
    } else if item.qty <= item.min_stock {
        StockStatus::Low
    } else {
        StockStatus::Normal
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

/// Search text AND category; an empty search matches every name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFilter {
    pub search: String,
    pub category: CategoryFilter,
}

impl ItemFilter {
    pub fn matches(&self, item: &Item) -> bool {
        let needle = self.search.to_lowercase();
        item.name.to_lowercase().contains(&needle) && self.category.matches(item.category)
    }
}

/// Items passing `filter`, in collection (insertion) order.
pub fn filter_items<'a>(items: &'a [Item], filter: &ItemFilter) -> Vec<&'a Item> {
    items.iter().filter(|i| filter.matches(i)).collect()
}

/// Aggregate counters shown above the stock table.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_items: usize,
    /// Items whose status is not `Normal`.
    pub low_or_out: usize,
    /// All-time units received. Wider than a single quantity so the sum cannot overflow.
    pub total_in: u128,
    /// All-time units issued.
    pub total_out: u128,
}

pub fn summarize(state: &InventoryState) -> Summary {
    let units = |kind: TransactionKind| -> u128 {
        state
            .transactions()
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| u128::from(t.qty))
            .fold(0u128, u128::saturating_add)
    };

    Summary {
        total_items: state.items().len(),
        low_or_out: state
            .items()
            .iter()
            .filter(|i| stock_status(i) != StockStatus::Normal)
            .count(),
        total_in: units(TransactionKind::In),
        total_out: units(TransactionKind::Out),
    }
}

/// Most recent transaction of `item_id`. Relies on the log being most-recent-first.
pub fn last_activity<'a>(transactions: &'a [Transaction], item_id: &ItemId) -> Option<&'a Transaction> {
    transactions.iter().find(|t| t.item_id == *item_id)
}

/// All transactions of one item, most-recent-first.
pub fn item_history<'a>(transactions: &'a [Transaction], item_id: &ItemId) -> Vec<&'a Transaction> {
    transactions.iter().filter(|t| t.item_id == *item_id).collect()
}

/// One line of the stock table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRow<'a> {
    pub item: &'a Item,
    pub status: StockStatus,
    pub last_activity: Option<&'a Transaction>,
}

/// Filtered stock table rows.
pub fn stock_rows<'a>(state: &'a InventoryState, filter: &ItemFilter) -> Vec<StockRow<'a>> {
    filter_items(state.items(), filter)
        .into_iter()
        .map(|item| StockRow {
            item,
            status: stock_status(item),
            last_activity: last_activity(state.transactions(), &item.id),
        })
        .collect()
}

/// One line of the transaction log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionLogEntry<'a> {
    pub transaction: &'a Transaction,
    /// `None` only if the log references an item that no longer exists.
    pub item_name: Option<&'a str>,
    pub unit: Option<Unit>,
}

/// Entries shown by the log view.
pub const TRANSACTION_LOG_LIMIT: usize = 200;

/// The newest `limit` log entries, most-recent-first, joined with item names.
pub fn transaction_log(state: &InventoryState, limit: usize) -> Vec<TransactionLogEntry<'_>> {
    state
        .transactions()
        .iter()
        .take(limit)
        .map(|transaction| {
            let item = state.item(&transaction.item_id);
            TransactionLogEntry {
                transaction,
                item_name: item.map(|i| i.name.as_str()),
                unit: item.map(|i| i.unit),
            }
        })
        .collect()
}
