//! The tracker session: state container behind the stock screens.
//!
//! Presentation code never touches collections directly. It reads through the
//! accessors here and sends every intent through one of the command methods,
//! which validate, commit a new pair of collections, schedule a save and post
//! a notification. A rejected intent posts an error notification and changes
//! nothing.

use std::sync::Arc;

use chrono::Utc;

use stockroom_core::{DomainError, DomainResult, ItemId, TransactionId};
use stockroom_infra::{KeyValueStorage, PersistenceConfig, PersistenceScheduler, SaveOutcome, load};
use stockroom_inventory::{
    Category, CategoryFilter, CreateItem, DeleteItem, EditItem, InventoryCommand, InventoryState,
    Item, ItemFilter, RecordTransaction, StockRow, Summary, TRANSACTION_LOG_LIMIT, Transaction,
    TransactionKind, TransactionLogEntry, Unit, item_history, stock_rows, summarize, transaction_log,
};

use crate::notification::{Notification, Notifications};

/// Screen currently shown.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Stock,
    Log,
    Add,
}

/// "Add item" form contents, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub category: Category,
    pub unit: Unit,
    /// Blank uses the default threshold.
    pub min_stock: String,
    /// Blank means zero.
    pub initial_qty: String,
}

impl Default for NewItem {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: Category::ALL[0],
            unit: Unit::ALL[0],
            min_stock: String::new(),
            initial_qty: String::new(),
        }
    }
}

/// "Receive / issue" form contents, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub item_id: ItemId,
    pub kind: TransactionKind,
    pub qty: String,
    pub note: String,
    pub by: String,
}

pub struct Tracker {
    state: InventoryState,
    scheduler: PersistenceScheduler,
    storage: Arc<dyn KeyValueStorage>,
    notifications: Notifications,
    filter: ItemFilter,
    tab: Tab,
    loading: bool,
}

impl Tracker {
    /// Empty tracker in the loading state. Call [`load`](Self::load) next.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(storage: Arc<dyn KeyValueStorage>, config: PersistenceConfig) -> Self {
        Self {
            state: InventoryState::new(),
            scheduler: PersistenceScheduler::new(storage.clone(), config),
            storage,
            notifications: Notifications::new(),
            filter: ItemFilter::default(),
            tab: Tab::default(),
            loading: true,
        }
    }

    /// Create and load in one step.
    pub async fn mount(storage: Arc<dyn KeyValueStorage>, config: PersistenceConfig) -> Self {
        let mut tracker = Self::new(storage, config);
        tracker.load().await;
        tracker
    }

    /// One-shot read of both collections; failures start from empty.
    pub async fn load(&mut self) {
        self.loading = true;
        let outcome = load(self.storage.as_ref(), self.scheduler.config()).await;
        self.state = InventoryState::from_snapshot(outcome.snapshot);
        self.loading = false;
    }

    pub fn create_item(&mut self, form: NewItem) -> DomainResult<ItemId> {
        let command = match parse_new_item(&form) {
            Ok((min_stock, initial_qty)) => CreateItem {
                item_id: ItemId::new(),
                name: form.name,
                category: form.category,
                unit: form.unit,
                min_stock,
                initial_qty,
                initial_transaction_id: TransactionId::new(),
                occurred_at: Utc::now(),
            },
            Err(err) => return Err(self.reject(err)),
        };
        let item_id = command.item_id;

        self.dispatch(InventoryCommand::CreateItem(command))?;

        let name = self.state.item(&item_id).map(|i| i.name.clone()).unwrap_or_default();
        self.notifications.success(format!("Added \"{name}\""));
        self.tab = Tab::Stock;
        Ok(item_id)
    }

    pub fn record_transaction(&mut self, form: NewTransaction) -> DomainResult<TransactionId> {
        let qty = match parse_quantity(&form.qty) {
            Ok(qty) => qty,
            Err(err) => return Err(self.reject(err)),
        };

        let command = RecordTransaction {
            transaction_id: TransactionId::new(),
            item_id: form.item_id,
            kind: form.kind,
            qty,
            note: form.note,
            by: form.by,
            occurred_at: Utc::now(),
        };
        let transaction_id = command.transaction_id;

        self.dispatch(InventoryCommand::RecordTransaction(command))?;

        if let Some(item) = self.state.item(&form.item_id) {
            let verb = match form.kind {
                TransactionKind::In => "Received",
                TransactionKind::Out => "Issued",
            };
            let message = format!("{verb} {qty} {} of \"{}\"", item.unit.label(), item.name);
            self.notifications.success(message);
        }
        Ok(transaction_id)
    }

    /// Replace an item's descriptive fields. Stock level is never changed here.
    pub fn edit_item(&mut self, item: Item) -> DomainResult<()> {
        self.dispatch(InventoryCommand::EditItem(EditItem { item }))?;
        self.notifications.success("Item updated");
        Ok(())
    }

    /// Delete an item together with its transaction history.
    pub fn delete_item(&mut self, item_id: ItemId) -> DomainResult<()> {
        self.dispatch(InventoryCommand::DeleteItem(DeleteItem { item_id }))?;
        self.notifications.success("Item deleted");
        Ok(())
    }

    fn dispatch(&mut self, command: InventoryCommand) -> DomainResult<()> {
        match self.state.execute(&command) {
            Ok(()) => {
                tracing::debug!(command = command.command_type(), "command applied");
                self.scheduler.schedule(self.state.snapshot());
                Ok(())
            }
            Err(err) => {
                tracing::debug!(command = command.command_type(), error = %err, "command rejected");
                Err(self.reject(err))
            }
        }
    }

    fn reject(&mut self, err: DomainError) -> DomainError {
        self.notifications.error(err.user_message());
        err
    }

    /// Write any pending changes now.
    pub async fn shutdown(&self) -> SaveOutcome {
        self.scheduler.flush().await
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    pub fn set_category_filter(&mut self, category: CategoryFilter) {
        self.filter.category = category;
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn filter(&self) -> &ItemFilter {
        &self.filter
    }

    pub fn state(&self) -> &InventoryState {
        &self.state
    }

    pub fn filtered_items(&self) -> Vec<&Item> {
        stockroom_inventory::filter_items(self.state.items(), &self.filter)
    }

    pub fn stock_rows(&self) -> Vec<StockRow<'_>> {
        stock_rows(&self.state, &self.filter)
    }

    pub fn summary(&self) -> Summary {
        summarize(&self.state)
    }

    /// The newest entries of the log view.
    pub fn transaction_log(&self) -> Vec<TransactionLogEntry<'_>> {
        transaction_log(&self.state, TRANSACTION_LOG_LIMIT)
    }

    pub fn history(&self, item_id: &ItemId) -> Vec<&Transaction> {
        item_history(self.state.transactions(), item_id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.scheduler.is_saving()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.scheduler.has_pending()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notifications.current()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }
}

/// Parse a typed quantity; surrounding whitespace is ignored.
fn parse_quantity(raw: &str) -> DomainResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| DomainError::validation("quantity must be a positive integer"))
}

fn parse_new_item(form: &NewItem) -> DomainResult<(Option<u64>, i64)> {
    let min_stock = match form.min_stock.trim() {
        "" => None,
        raw => Some(
            raw.parse::<u64>()
                .map_err(|_| DomainError::validation("minimum stock must be a whole number"))?,
        ),
    };

    let initial_qty = match form.initial_qty.trim() {
        "" => 0,
        raw => raw
            .parse::<i64>()
            .map_err(|_| DomainError::validation("initial quantity must be a whole number"))?,
    };

    Ok((min_stock, initial_qty))
}
