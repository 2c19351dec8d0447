//! Debounced write-behind of the inventory collections.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use stockroom_inventory::{InventorySnapshot, encode_items, encode_transactions};

use super::PersistenceConfig;
use crate::storage::KeyValueStorage;

/// What happened to a scheduled (or flushed) write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Both collections were written.
    Saved,
    /// At least one collection failed to encode or write.
    Failed,
    /// Superseded by a newer schedule before the delay elapsed.
    Cancelled,
    /// Nothing was pending.
    Idle,
}

struct PendingWrite {
    cancel: oneshot::Sender<()>,
    snapshot: Arc<InventorySnapshot>,
    handle: JoinHandle<SaveOutcome>,
}

/// Everything a write task needs, shared between the scheduler and its tasks.
#[derive(Clone)]
struct Writer {
    storage: Arc<dyn KeyValueStorage>,
    config: PersistenceConfig,
    /// Held for the duration of a write pair: at most one write is in flight,
    /// and writes land in the order they were started.
    in_flight: Arc<tokio::sync::Mutex<()>>,
    saving: Arc<watch::Sender<bool>>,
    saved: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
}

impl Writer {
    async fn write(&self, snapshot: &InventorySnapshot) -> SaveOutcome {
        let _guard = self.in_flight.lock().await;

        let encoded = encode_items(&snapshot.items)
            .and_then(|items| encode_transactions(&snapshot.transactions).map(|txs| (items, txs)));
        let (items, transactions) = match encoded {
            Ok(pair) => pair,
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode inventory for saving");
                self.failed.fetch_add(1, Ordering::Relaxed);
                return SaveOutcome::Failed;
            }
        };

        let keys = &self.config.keys;
        let durable = self.config.durable;

        self.saving.send_replace(true);
        let (items_res, tx_res) = tokio::join!(
            self.storage.set(&keys.items, &items, durable),
            self.storage.set(&keys.transactions, &transactions, durable),
        );
        self.saving.send_replace(false);

        let mut outcome = SaveOutcome::Saved;
        if let Err(err) = items_res {
            tracing::warn!(key = %keys.items, error = %err, "failed to save items");
            outcome = SaveOutcome::Failed;
        }
        if let Err(err) = tx_res {
            tracing::warn!(key = %keys.transactions, error = %err, "failed to save transactions");
            outcome = SaveOutcome::Failed;
        }

        match outcome {
            SaveOutcome::Saved => {
                self.saved.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    items = snapshot.items.len(),
                    transactions = snapshot.transactions.len(),
                    "inventory saved"
                );
            }
            _ => {
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
        }

        outcome
    }
}

/// Coalesces bursts of changes into one storage write per collection.
///
/// Each [`schedule`](Self::schedule) cancels the pending (not yet started)
/// write and starts a new quiet period holding the latest snapshot. A write
/// that has already started is never cancelled; later writes queue behind it,
/// so the last scheduled snapshot is always the last one stored.
pub struct PersistenceScheduler {
    writer: Writer,
    runtime: Handle,
    pending: Mutex<Option<PendingWrite>>,
}

impl PersistenceScheduler {
    /// Create a scheduler bound to the current Tokio runtime.
    ///
    /// Must be called from within a runtime; `schedule` may then be called from
    /// synchronous code.
    pub fn new(storage: Arc<dyn KeyValueStorage>, config: PersistenceConfig) -> Self {
        let (saving, _) = watch::channel(false);
        Self {
            writer: Writer {
                storage,
                config,
                in_flight: Arc::new(tokio::sync::Mutex::new(())),
                saving: Arc::new(saving),
                saved: Arc::new(AtomicU64::new(0)),
                failed: Arc::new(AtomicU64::new(0)),
            },
            runtime: Handle::current(),
            pending: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &PersistenceConfig {
        &self.writer.config
    }

    /// Cancel any pending write and schedule `snapshot` after the debounce delay.
    pub fn schedule(&self, snapshot: InventorySnapshot) {
        let snapshot = Arc::new(snapshot);
        let (cancel, cancelled) = oneshot::channel();

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            // Fails harmlessly if the previous write already started.
            let _ = previous.cancel.send(());
            tracing::debug!("rescheduling pending inventory save");
        }

        let handle = self.runtime.spawn(delayed_write(
            self.writer.clone(),
            snapshot.clone(),
            self.writer.config.debounce,
            cancelled,
        ));

        *pending = Some(PendingWrite {
            cancel,
            snapshot,
            handle,
        });
    }

    /// Write the most recently scheduled snapshot now instead of waiting.
    ///
    /// Returns `Idle` when nothing was ever scheduled since the last flush.
    pub async fn flush(&self) -> SaveOutcome {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(pending) = pending else {
            return SaveOutcome::Idle;
        };

        let _ = pending.cancel.send(());
        match pending.handle.await {
            Ok(SaveOutcome::Cancelled) | Err(_) => self.writer.write(&pending.snapshot).await,
            Ok(outcome) => outcome,
        }
    }

    /// True while a scheduled write has not completed yet.
    pub fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|p| !p.handle.is_finished())
    }

    /// True while a write pair is in flight.
    pub fn is_saving(&self) -> bool {
        *self.writer.saving.borrow()
    }

    pub fn subscribe_saving(&self) -> watch::Receiver<bool> {
        self.writer.saving.subscribe()
    }

    pub fn completed_writes(&self) -> u64 {
        self.writer.saved.load(Ordering::Relaxed)
    }

    pub fn failed_writes(&self) -> u64 {
        self.writer.failed.load(Ordering::Relaxed)
    }
}

async fn delayed_write(
    writer: Writer,
    snapshot: Arc<InventorySnapshot>,
    delay: Duration,
    cancelled: oneshot::Receiver<()>,
) -> SaveOutcome {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    tokio::select! {
        _ = &mut sleep => {}
        signal = cancelled => {
            if signal.is_ok() {
                return SaveOutcome::Cancelled;
            }
            // Scheduler dropped without flushing: the write still goes out.
            (&mut sleep).await;
        }
    }

    writer.write(&snapshot).await
}
