use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{Entity, ItemId, TransactionId};

/// Direction of a stock movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Stock received.
    In,
    /// Stock issued.
    Out,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::In => "in",
            TransactionKind::Out => "out",
        }
    }

    /// Signed effect of `qty` units of this kind on the stock level.
    pub fn signed(&self, qty: u64) -> i128 {
        match self {
            TransactionKind::In => i128::from(qty),
            TransactionKind::Out => -i128::from(qty),
        }
    }
}

/// A timestamped stock movement against one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub item_id: ItemId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub qty: u64,
    pub note: String,
    pub by: String,
    pub date: DateTime<Utc>,
}

impl Transaction {
    pub fn signed_qty(&self) -> i128 {
        self.kind.signed(self.qty)
    }
}

impl Entity for Transaction {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
