use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::domain::InventoryItem;

/// Parse an inventory export with columns
/// `SKU,Name,On Hand,Reorder Level,Expires On`. An empty expiration cell
/// means the item does not expire.
pub fn from_reader<R: Read>(reader: R) -> Result<Vec<InventoryItem>, InventoryImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut items = Vec::new();

    for (index, record) in csv_reader.deserialize::<InventoryRow>().enumerate() {
        let row = record?;
        let expires_on = match row.expires_on.as_deref() {
            Some(raw) => Some(parse_expiration(raw).ok_or_else(|| {
                InventoryImportError::InvalidDate {
                    // +2 accounts for the header row and zero-based index
                    row: index + 2,
                    value: raw.to_string(),
                }
            })?),
            None => None,
        };

        items.push(InventoryItem {
            sku: row.sku,
            name: row.name,
            on_hand: row.on_hand,
            reorder_level: row.reorder_level,
            expires_on,
        });
    }

    Ok(items)
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryImportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("row {row}: invalid expiration date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { row: usize, value: String },
}

#[derive(Debug, Deserialize)]
struct InventoryRow {
    #[serde(rename = "SKU")]
    sku: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "On Hand")]
    on_hand: u32,
    #[serde(rename = "Reorder Level")]
    reorder_level: u32,
    #[serde(rename = "Expires On", default, deserialize_with = "empty_string_as_none")]
    expires_on: Option<String>,
}

fn parse_expiration(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
