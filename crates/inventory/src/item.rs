use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{Entity, ItemId};

/// Reorder threshold used when an item is created without one.
pub const DEFAULT_MIN_STOCK: u64 = 5;

/// Item category (fixed set).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Stationery,
    PaperAndFiles,
    ComputerEquipment,
    OfficeSupplies,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Stationery,
        Category::PaperAndFiles,
        Category::ComputerEquipment,
        Category::OfficeSupplies,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Stationery => "Stationery",
            Category::PaperAndFiles => "Paper/Files",
            Category::ComputerEquipment => "Computer equipment",
            Category::OfficeSupplies => "Office supplies",
            Category::Other => "Other",
        }
    }
}

/// Unit of count (fixed set).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Piece,
    Each,
    Box,
    Pack,
    Roll,
    Ream,
    Dozen,
    Set,
}

impl Unit {
    pub const ALL: [Unit; 8] = [
        Unit::Piece,
        Unit::Each,
        Unit::Box,
        Unit::Pack,
        Unit::Roll,
        Unit::Ream,
        Unit::Dozen,
        Unit::Set,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Unit::Piece => "pcs",
            Unit::Each => "ea",
            Unit::Box => "box",
            Unit::Pack => "pack",
            Unit::Roll => "roll",
            Unit::Ream => "ream",
            Unit::Dozen => "dozen",
            Unit::Set => "set",
        }
    }
}

/// A tracked stock-keeping unit.
///
/// `qty` is only ever changed by recording a transaction; edits keep it as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    pub unit: Unit,
    pub qty: u64,
    pub min_stock: u64,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Same record with the stock level replaced.
    pub(crate) fn with_qty(&self, qty: u64) -> Self {
        Self {
            qty,
            ..self.clone()
        }
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_in_snake_case() {
        let json = serde_json::to_string(&Category::PaperAndFiles).unwrap();
        assert_eq!(json, "\"paper_and_files\"");
    }

    #[test]
    fn with_qty_keeps_identity() {
        let item = Item {
            id: ItemId::new(),
            name: "Stapler".to_string(),
            category: Category::OfficeSupplies,
            unit: Unit::Each,
            qty: 2,
            min_stock: 1,
            created_at: Utc::now(),
        };
        let restocked = item.with_qty(7);
        assert!(restocked.same_identity(&item));
        assert_eq!(restocked.qty, 7);
        assert_eq!(restocked.name, item.name);
    }
}
