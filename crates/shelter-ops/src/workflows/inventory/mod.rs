//! Read-side inventory classification: low-stock and expiry alert buckets,
//! plus CSV import of inventory exports.

pub mod alerts;
pub mod domain;
pub mod import;

pub use alerts::{expiry_buckets, low_stock, InventoryAlerts};
pub use domain::{ExpiryAlert, InventoryItem, LowStockAlert};
pub use import::{from_reader, InventoryImportError};
