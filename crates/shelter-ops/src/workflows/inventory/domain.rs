use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One stocked supply line (food, medication, bedding, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub sku: String,
    pub name: String,
    pub on_hand: u32,
    pub reorder_level: u32,
    pub expires_on: Option<NaiveDate>,
}

impl InventoryItem {
    /// Units short of the reorder level; zero when adequately stocked.
    pub fn shortage(&self) -> u32 {
        self.reorder_level.saturating_sub(self.on_hand)
    }

    pub fn is_low_stock(&self) -> bool {
        self.on_hand <= self.reorder_level
    }
}

/// Low-stock classification of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockAlert {
    pub sku: String,
    pub name: String,
    pub on_hand: u32,
    pub reorder_level: u32,
    pub shortage: u32,
}

impl LowStockAlert {
    pub(crate) fn from_item(item: &InventoryItem) -> Self {
        Self {
            sku: item.sku.clone(),
            name: item.name.clone(),
            on_hand: item.on_hand,
            reorder_level: item.reorder_level,
            shortage: item.shortage(),
        }
    }
}

/// Expiry classification of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiryAlert {
    pub sku: String,
    pub name: String,
    pub expires_on: NaiveDate,
}

impl ExpiryAlert {
    pub(crate) fn from_item(item: &InventoryItem, expires_on: NaiveDate) -> Self {
        Self {
            sku: item.sku.clone(),
            name: item.name.clone(),
            expires_on,
        }
    }
}
