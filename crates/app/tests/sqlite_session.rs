use std::sync::Arc;

use stockroom_app::{NewItem, NewTransaction, Tracker};
use stockroom_infra::{KeyValueStorage, PersistenceConfig, SaveOutcome, SqliteStorage};
use stockroom_inventory::{Category, StockStatus, TransactionKind, Unit};

fn form(name: &str, min_stock: &str, initial_qty: &str) -> NewItem {
    NewItem {
        name: name.to_string(),
        category: Category::Stationery,
        unit: Unit::Box,
        min_stock: min_stock.to_string(),
        initial_qty: initial_qty.to_string(),
    }
}

#[tokio::test]
async fn session_survives_a_remount() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(
        SqliteStorage::in_memory()
            .await
            .expect("failed to open in-memory storage"),
    );

    let mut tracker = Tracker::mount(storage.clone(), PersistenceConfig::default()).await;
    let staples = tracker.create_item(form("Staples", "2", "6")).unwrap();
    let clips = tracker.create_item(form("Paper clips", "", "")).unwrap();

    tracker
        .record_transaction(NewTransaction {
            item_id: staples,
            kind: TransactionKind::Out,
            qty: "4".to_string(),
            note: "front desk".to_string(),
            by: "Pim".to_string(),
        })
        .unwrap();
    tracker
        .record_transaction(NewTransaction {
            item_id: clips,
            kind: TransactionKind::In,
            qty: "20".to_string(),
            note: String::new(),
            by: String::new(),
        })
        .unwrap();

    assert_eq!(tracker.shutdown().await, SaveOutcome::Saved);

    let remounted = Tracker::mount(storage, PersistenceConfig::default()).await;
    assert_eq!(remounted.state(), tracker.state());

    let summary = remounted.summary();
    assert_eq!(summary.total_items, 2);
    assert_eq!(summary.total_in, 26);
    assert_eq!(summary.total_out, 4);
    assert_eq!(summary.low_or_out, 1);

    let rows = remounted.stock_rows();
    assert_eq!(rows[0].item.id, staples);
    assert_eq!(rows[0].status, StockStatus::Low);
    assert_eq!(rows[1].status, StockStatus::Normal);

    let log = remounted.transaction_log();
    assert_eq!(log[0].item_name, Some("Paper clips"));
    assert_eq!(log[0].transaction.by, "unspecified");
}

#[tokio::test]
async fn durable_and_session_scopes_do_not_mix() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(
        SqliteStorage::in_memory()
            .await
            .expect("failed to open in-memory storage"),
    );

    let session = PersistenceConfig {
        durable: false,
        ..PersistenceConfig::default()
    };

    let mut tracker = Tracker::mount(storage.clone(), session.clone()).await;
    tracker.create_item(form("Toner", "1", "3")).unwrap();
    tracker.shutdown().await;

    let durable_view = Tracker::mount(storage.clone(), PersistenceConfig::default()).await;
    assert!(durable_view.state().is_empty());

    let session_view = Tracker::mount(storage, session).await;
    assert_eq!(session_view.state().items().len(), 1);
}
