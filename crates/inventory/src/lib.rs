//! Inventory domain module.
//!
//! Business rules for the stock tracker, implemented purely as deterministic
//! domain logic (no IO, no timers, no storage):
//!
//! - [`item`] / [`transaction`]: the two record types
//! - [`state`]: the in-memory pair of collections (single source of truth)
//! - [`command`]: the only mutation entry points
//! - [`view`]: derived, recomputed-on-read view model
//! - [`codec`]: JSON encoding of the persisted collections

pub mod codec;
pub mod command;
pub mod item;
pub mod state;
pub mod transaction;
pub mod view;

pub use codec::{CodecError, decode_items, decode_transactions, encode_items, encode_transactions};
pub use command::{
    CreateItem, DeleteItem, EditItem, INITIAL_STOCK_NOTE, InventoryCommand, RecordTransaction,
    SYSTEM_ACTOR, UNSPECIFIED_ACTOR,
};
pub use item::{Category, DEFAULT_MIN_STOCK, Item, Unit};
pub use state::{InventorySnapshot, InventoryState};
pub use transaction::{Transaction, TransactionKind};
pub use view::{
    CategoryFilter, ItemFilter, StockRow, StockStatus, Summary, TRANSACTION_LOG_LIMIT, TransactionLogEntry,
    filter_items,
    item_history, last_activity, stock_rows, stock_status, summarize, transaction_log,
};
