//! Command handlers: the only way items and transactions change.
//!
//! Handling is split the same way everywhere:
//! - **Decision**: [`InventoryState::handle`] validates a command against the
//!   current state and returns the next pair of collections. It never mutates.
//! - **Commit**: [`InventoryState::replace`] (or [`InventoryState::execute`],
//!   which does both) swaps the pair in.
//!
//! A rejected command therefore leaves the state exactly as it was.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ItemId, TransactionId};

use crate::item::{Category, DEFAULT_MIN_STOCK, Item, Unit};
use crate::state::{InventorySnapshot, InventoryState};
use crate::transaction::{Transaction, TransactionKind};

/// Actor recorded on transactions the tracker synthesizes itself.
pub const SYSTEM_ACTOR: &str = "system";

/// Note recorded on the opening "in" transaction of a new item.
pub const INITIAL_STOCK_NOTE: &str = "initial stock";

/// Actor recorded when the user leaves the field blank.
pub const UNSPECIFIED_ACTOR: &str = "unspecified";

/// Command: CreateItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateItem {
    pub item_id: ItemId,
    pub name: String,
    pub category: Category,
    pub unit: Unit,
    /// `None` falls back to [`DEFAULT_MIN_STOCK`].
    pub min_stock: Option<u64>,
    pub initial_qty: i64,
    /// Id used for the opening transaction when `initial_qty > 0`.
    pub initial_transaction_id: TransactionId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordTransaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTransaction {
    pub transaction_id: TransactionId,
    pub item_id: ItemId,
    pub kind: TransactionKind,
    pub qty: i64,
    pub note: String,
    pub by: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: EditItem.
///
/// Carries the full modified record; only name, category, unit and
/// `min_stock` are taken from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditItem {
    pub item: Item,
}

/// Command: DeleteItem (cascades to the item's transactions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteItem {
    pub item_id: ItemId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryCommand {
    CreateItem(CreateItem),
    RecordTransaction(RecordTransaction),
    EditItem(EditItem),
    DeleteItem(DeleteItem),
}

impl InventoryCommand {
    pub fn command_type(&self) -> &'static str {
        match self {
            InventoryCommand::CreateItem(_) => "inventory.item.create",
            InventoryCommand::RecordTransaction(_) => "inventory.transaction.record",
            InventoryCommand::EditItem(_) => "inventory.item.edit",
            InventoryCommand::DeleteItem(_) => "inventory.item.delete",
        }
    }
}

impl InventoryState {
    /// Decide the next pair of collections for `command`.
    pub fn handle(&self, command: &InventoryCommand) -> DomainResult<InventorySnapshot> {
        match command {
            InventoryCommand::CreateItem(cmd) => self.handle_create(cmd),
            InventoryCommand::RecordTransaction(cmd) => self.handle_record(cmd),
            InventoryCommand::EditItem(cmd) => self.handle_edit(cmd),
            InventoryCommand::DeleteItem(cmd) => self.handle_delete(cmd),
        }
    }

    /// Handle `command` and commit the result.
    pub fn execute(&mut self, command: &InventoryCommand) -> DomainResult<()> {
        let next = self.handle(command)?;
        self.replace(next);
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateItem) -> DomainResult<InventorySnapshot> {
        let name = validated_name(&cmd.name)?;
        if cmd.initial_qty < 0 {
            return Err(DomainError::validation("initial quantity cannot be negative"));
        }
        if self.item(&cmd.item_id).is_some() {
            return Err(DomainError::conflict("item already exists"));
        }

        let qty = cmd.initial_qty as u64;
        let item = Item {
            id: cmd.item_id,
            name,
            category: cmd.category,
            unit: cmd.unit,
            qty,
            min_stock: cmd.min_stock.unwrap_or(DEFAULT_MIN_STOCK),
            created_at: cmd.occurred_at,
        };

        let mut items = self.items().to_vec();
        items.push(item);

        let transactions = if qty > 0 {
            let opening = Transaction {
                id: cmd.initial_transaction_id,
                item_id: cmd.item_id,
                kind: TransactionKind::In,
                qty,
                note: INITIAL_STOCK_NOTE.to_string(),
                by: SYSTEM_ACTOR.to_string(),
                date: cmd.occurred_at,
            };
            prepend(opening, self.transactions())
        } else {
            self.transactions().to_vec()
        };

        Ok(InventorySnapshot {
            items,
            transactions,
        })
    }

    fn handle_record(&self, cmd: &RecordTransaction) -> DomainResult<InventorySnapshot> {
        if cmd.qty <= 0 {
            return Err(DomainError::validation("quantity must be a positive integer"));
        }
        let amount = cmd.qty as u64;

        let item = self.item(&cmd.item_id).ok_or_else(DomainError::not_found)?;

        let new_qty = match cmd.kind {
            TransactionKind::In => item
                .qty
                .checked_add(amount)
                .ok_or_else(|| DomainError::invariant("stock level overflow"))?,
            TransactionKind::Out => item
                .qty
                .checked_sub(amount)
                .ok_or_else(|| DomainError::invariant("insufficient stock"))?,
        };

        let by = match cmd.by.trim() {
            "" => UNSPECIFIED_ACTOR.to_string(),
            by => by.to_string(),
        };

        let transaction = Transaction {
            id: cmd.transaction_id,
            item_id: cmd.item_id,
            kind: cmd.kind,
            qty: amount,
            note: cmd.note.trim().to_string(),
            by,
            date: cmd.occurred_at,
        };

        let items = self
            .items()
            .iter()
            .map(|i| if i.id == cmd.item_id { i.with_qty(new_qty) } else { i.clone() })
            .collect();

        Ok(InventorySnapshot {
            items,
            transactions: prepend(transaction, self.transactions()),
        })
    }

    fn handle_edit(&self, cmd: &EditItem) -> DomainResult<InventorySnapshot> {
        let edited = &cmd.item;
        let current = self.item(&edited.id).ok_or_else(DomainError::not_found)?;
        let name = validated_name(&edited.name)?;

        let replacement = Item {
            name,
            category: edited.category,
            unit: edited.unit,
            min_stock: edited.min_stock,
            ..current.clone()
        };

        let items = self
            .items()
            .iter()
            .map(|i| if i.id == replacement.id { replacement.clone() } else { i.clone() })
            .collect();

        Ok(InventorySnapshot {
            items,
            transactions: self.transactions().to_vec(),
        })
    }

    fn handle_delete(&self, cmd: &DeleteItem) -> DomainResult<InventorySnapshot> {
        if self.item(&cmd.item_id).is_none() {
            return Err(DomainError::not_found());
        }

        Ok(InventorySnapshot {
            items: self
                .items()
                .iter()
                .filter(|i| i.id != cmd.item_id)
                .cloned()
                .collect(),
            transactions: self
                .transactions()
                .iter()
                .filter(|t| t.item_id != cmd.item_id)
                .cloned()
                .collect(),
        })
    }
}

fn validated_name(raw: &str) -> DomainResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(name.to_string())
}

/// New log with `head` as the most recent entry.
fn prepend(head: Transaction, rest: &[Transaction]) -> Vec<Transaction> {
    let mut log = Vec::with_capacity(rest.len() + 1);
    log.push(head);
    log.extend_from_slice(rest);
    log
}
