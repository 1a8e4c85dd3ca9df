use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::domain::{ExpiryAlert, InventoryItem, LowStockAlert};

/// Combined alert buckets returned by the API and CLI.
///
/// Pure read-side classification; nothing here writes back to inventory.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryAlerts {
    pub low_stock: Vec<LowStockAlert>,
    pub expiring_soon: Vec<ExpiryAlert>,
    pub expired: Vec<ExpiryAlert>,
}

impl InventoryAlerts {
    pub fn build(items: &[InventoryItem], today: NaiveDate, within_days: u32) -> Self {
        let (expiring_soon, expired) = expiry_buckets(items, today, within_days);
        Self {
            low_stock: low_stock(items),
            expiring_soon,
            expired,
        }
    }
}

/// Items at or below their reorder level, most urgent shortage first.
pub fn low_stock(items: &[InventoryItem]) -> Vec<LowStockAlert> {
    let mut alerts: Vec<LowStockAlert> = items
        .iter()
        .filter(|item| item.is_low_stock())
        .map(LowStockAlert::from_item)
        .collect();
    alerts.sort_by(|a, b| b.shortage.cmp(&a.shortage).then_with(|| a.sku.cmp(&b.sku)));
    alerts
}

/// Split dated items into (expiring within `[today, today + within_days]`,
/// already expired), each sorted by expiration date ascending.
pub fn expiry_buckets(
    items: &[InventoryItem],
    today: NaiveDate,
    within_days: u32,
) -> (Vec<ExpiryAlert>, Vec<ExpiryAlert>) {
    // `within_days` arrives unbounded from the query string and CLI; saturate
    // rather than overflow the calendar.
    let horizon = today
        .checked_add_days(Days::new(u64::from(within_days)))
        .unwrap_or(NaiveDate::MAX);
    let mut expiring_soon = Vec::new();
    let mut expired = Vec::new();

    for item in items {
        let Some(expires_on) = item.expires_on else {
            continue;
        };
        if expires_on < today {
            expired.push(ExpiryAlert::from_item(item, expires_on));
        } else if expires_on <= horizon {
            expiring_soon.push(ExpiryAlert::from_item(item, expires_on));
        }
    }

    expiring_soon.sort_by(|a, b| a.expires_on.cmp(&b.expires_on).then_with(|| a.sku.cmp(&b.sku)));
    expired.sort_by(|a, b| a.expires_on.cmp(&b.expires_on).then_with(|| a.sku.cmp(&b.sku)));
    (expiring_soon, expired)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(sku: &str, on_hand: u32, reorder_level: u32, expires_on: Option<&str>) -> InventoryItem {
        InventoryItem {
            sku: sku.to_string(),
            name: format!("item {sku}"),
            on_hand,
            reorder_level,
            expires_on: expires_on
                .map(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    #[test]
    fn low_stock_sorts_by_shortage_descending() {
        let items = vec![
            item("KIB-01", 7, 10, None),
            item("MED-02", 2, 10, None),
            item("LIT-03", 25, 10, None),
        ];

        let alerts = low_stock(&items);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].sku, "MED-02");
        assert_eq!(alerts[0].shortage, 8);
        assert_eq!(alerts[1].sku, "KIB-01");
        assert_eq!(alerts[1].shortage, 3);
    }

    #[test]
    fn out_of_stock_shortage_never_underflows() {
        let items = vec![item("TOW-04", 0, 6, None)];
        let alerts = low_stock(&items);
        assert_eq!(alerts[0].shortage, 6);
        assert_eq!(alerts[0].on_hand, 0);
    }

    #[test]
    fn boundary_quantity_counts_as_low_stock() {
        let items = vec![item("KIB-01", 10, 10, None)];
        let alerts = low_stock(&items);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].shortage, 0);
    }

    #[test]
    fn expiry_buckets_split_expired_from_upcoming() {
        let items = vec![
            item("MED-10", 50, 5, Some("2025-05-20")),
            item("MED-11", 50, 5, Some("2025-06-10")),
            item("MED-12", 50, 5, Some("2025-09-01")),
            item("KIB-01", 50, 5, None),
        ];

        let (expiring_soon, expired) = expiry_buckets(&items, today(), 30);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].sku, "MED-10");
        assert_eq!(expiring_soon.len(), 1);
        assert_eq!(expiring_soon[0].sku, "MED-11");
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let items = vec![
            item("MED-20", 50, 5, Some("2025-06-01")),
            item("MED-21", 50, 5, Some("2025-07-01")),
        ];

        let (expiring_soon, expired) = expiry_buckets(&items, today(), 30);
        assert!(expired.is_empty());
        assert_eq!(expiring_soon.len(), 2);
        assert_eq!(expiring_soon[0].sku, "MED-20");
        assert_eq!(expiring_soon[1].sku, "MED-21");
    }

    #[test]
    fn enormous_windows_saturate_instead_of_overflowing() {
        let items = vec![
            item("MED-30", 50, 5, Some("2999-12-31")),
            item("MED-31", 50, 5, Some("2025-05-01")),
        ];

        let (expiring_soon, expired) = expiry_buckets(&items, today(), u32::MAX);
        assert_eq!(expiring_soon.len(), 1);
        assert_eq!(expiring_soon[0].sku, "MED-30");
        assert_eq!(expired.len(), 1);

        let (none_soon, none_expired) = expiry_buckets(&[], today(), u32::MAX);
        assert!(none_soon.is_empty());
        assert!(none_expired.is_empty());
    }

    #[test]
    fn build_combines_all_buckets() {
        let items = vec![
            item("KIB-01", 2, 10, None),
            item("MED-10", 50, 5, Some("2025-05-20")),
            item("MED-11", 50, 5, Some("2025-06-10")),
        ];

        let alerts = InventoryAlerts::build(&items, today(), 14);
        assert_eq!(alerts.low_stock.len(), 1);
        assert_eq!(alerts.expiring_soon.len(), 1);
        assert_eq!(alerts.expired.len(), 1);
    }
}
