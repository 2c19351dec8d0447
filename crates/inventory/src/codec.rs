//! JSON encoding of the persisted collections.
//!
//! Each collection is stored as one flat JSON array under its own storage key.

use thiserror::Error;

use crate::item::Item;
use crate::transaction::Transaction;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode {collection}: {source}")]
    Encode {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode {collection}: {source}")]
    Decode {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub fn encode_items(items: &[Item]) -> Result<String, CodecError> {
    serde_json::to_string(items).map_err(|source| CodecError::Encode {
        collection: "items",
        source,
    })
}

pub fn decode_items(raw: &str) -> Result<Vec<Item>, CodecError> {
    serde_json::from_str(raw).map_err(|source| CodecError::Decode {
        collection: "items",
        source,
    })
}

pub fn encode_transactions(transactions: &[Transaction]) -> Result<String, CodecError> {
    serde_json::to_string(transactions).map_err(|source| CodecError::Encode {
        collection: "transactions",
        source,
    })
}

pub fn decode_transactions(raw: &str) -> Result<Vec<Transaction>, CodecError> {
    serde_json::from_str(raw).map_err(|source| CodecError::Decode {
        collection: "transactions",
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Category, Unit};
    use crate::transaction::TransactionKind;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use serde_json::Value;
    use stockroom_core::{ItemId, TransactionId};

    fn sample_item() -> Item {
        Item {
            id: ItemId::new(),
            name: "Pen".to_string(),
            category: Category::Stationery,
            unit: Unit::Piece,
            qty: 10,
            min_stock: 5,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap(),
        }
    }

    #[test]
    fn records_use_flat_camel_case_fields() {
        let item = sample_item();
        let tx = Transaction {
            id: TransactionId::new(),
            item_id: item.id,
            kind: TransactionKind::Out,
            qty: 2,
            note: "meeting room".to_string(),
            by: "Somchai".to_string(),
            date: item.created_at,
        };

        let items: Value = serde_json::from_str(&encode_items(&[item.clone()]).unwrap()).unwrap();
        assert_eq!(items[0]["minStock"], 5);
        assert_eq!(items[0]["qty"], 10);
        assert_eq!(items[0]["category"], "stationery");
        assert_eq!(items[0]["id"], item.id.to_string());
        assert!(items[0]["createdAt"].is_string());

        let txs: Value = serde_json::from_str(&encode_transactions(&[tx]).unwrap()).unwrap();
        assert_eq!(txs[0]["type"], "out");
        assert_eq!(txs[0]["itemId"], item.id.to_string());
        assert_eq!(txs[0]["qty"], 2);
    }

    #[test]
    fn empty_collections_encode_as_empty_arrays() {
        assert_eq!(encode_items(&[]).unwrap(), "[]");
        assert!(decode_transactions("[]").unwrap().is_empty());
    }

    #[test]
    fn malformed_input_is_a_decode_error() {
        let err = decode_items("{not json").unwrap_err();
        assert!(matches!(err, CodecError::Decode { collection: "items", .. }));
    }

    fn arb_transaction() -> impl Strategy<Value = Transaction> {
        (
            1u64..10_000,
            any::<bool>(),
            "[a-zA-Z0-9 ]{0,24}",
            "[a-zA-Z ]{0,12}",
            0i64..4_000_000_000,
        )
            .prop_map(|(qty, inbound, note, by, secs)| Transaction {
                id: TransactionId::new(),
                item_id: ItemId::new(),
                kind: if inbound { TransactionKind::In } else { TransactionKind::Out },
                qty,
                note,
                by,
                date: Utc.timestamp_opt(secs, 0).unwrap(),
            })
    }

    fn arb_item() -> impl Strategy<Value = Item> {
        (
            "[a-zA-Z][a-zA-Z0-9 /]{0,30}",
            0usize..Category::ALL.len(),
            0usize..Unit::ALL.len(),
            0u64..1_000_000,
            0u64..1_000,
            0i64..4_000_000_000,
        )
            .prop_map(|(name, c, u, qty, min_stock, secs)| Item {
                id: ItemId::new(),
                name,
                category: Category::ALL[c],
                unit: Unit::ALL[u],
                qty,
                min_stock,
                created_at: Utc.timestamp_opt(secs, 0).unwrap(),
            })
    }

    proptest! {
        #[test]
        fn collections_survive_encoding(
            items in prop::collection::vec(arb_item(), 0..12),
            transactions in prop::collection::vec(arb_transaction(), 0..12),
        ) {
            let decoded_items = decode_items(&encode_items(&items).unwrap()).unwrap();
            prop_assert_eq!(decoded_items, items);

            let decoded_txs = decode_transactions(&encode_transactions(&transactions).unwrap()).unwrap();
            prop_assert_eq!(decoded_txs, transactions);
        }
    }
}
