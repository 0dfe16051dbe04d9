use chrono::NaiveDate;
use serde::Serialize;

use super::domain::InventoryItem;

/// Days ahead (inclusive) that count as expiring soon on the household view.
pub const EXPIRING_SOON_DAYS: i64 = 3;
/// Tighter urgency window used by restaurant dashboards.
pub const EXPIRING_SOON_BULK_DAYS: i64 = 2;
/// Window in which large stock is flagged for donation.
pub const BULK_WINDOW_DAYS: i64 = 7;
/// Quantities strictly above this amount count as bulk.
pub const BULK_QUANTITY_THRESHOLD: f64 = 10.0;
pub const PRIORITY_ITEM_LIMIT: usize = 3;

/// Derived expiry buckets for an item collection, evaluated against one reference date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpiryClassification {
    pub reference_date: NaiveDate,
    pub expired: Vec<InventoryItem>,
    pub expiring_soon: Vec<InventoryItem>,
    pub expiring_soon_bulk: Vec<InventoryItem>,
    pub bulk_expiring: Vec<InventoryItem>,
    pub priority_items: Vec<InventoryItem>,
}

impl ExpiryClassification {
    pub fn summary(&self, total: usize) -> ExpirySummary {
        ExpirySummary {
            total,
            expired_count: self.expired.len(),
            expiring_soon_count: self.expiring_soon.len(),
            bulk_expiring_count: self.bulk_expiring.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpirySummary {
    pub total: usize,
    pub expired_count: usize,
    pub expiring_soon_count: usize,
    pub bulk_expiring_count: usize,
}

/// Bucket `items` by calendar days until expiry relative to `reference_date`.
///
/// Output vectors keep the relative order of `items`; callers holding an
/// expiry-sorted collection get expiry-sorted buckets, which is what makes
/// `priority_items` the soonest three.
pub fn classify(items: &[InventoryItem], reference_date: NaiveDate) -> ExpiryClassification {
    let mut classification = ExpiryClassification {
        reference_date,
        expired: Vec::new(),
        expiring_soon: Vec::new(),
        expiring_soon_bulk: Vec::new(),
        bulk_expiring: Vec::new(),
        priority_items: Vec::new(),
    };

    for item in items {
        let diff_days = item.days_until_expiry(reference_date);

        if diff_days < 0 {
            classification.expired.push(item.clone());
            continue;
        }

        if diff_days <= EXPIRING_SOON_DAYS {
            classification.expiring_soon.push(item.clone());
        }
        if diff_days <= EXPIRING_SOON_BULK_DAYS {
            classification.expiring_soon_bulk.push(item.clone());
        }
        if diff_days <= BULK_WINDOW_DAYS && is_bulk_quantity(item) {
            classification.bulk_expiring.push(item.clone());
        }
    }

    classification.priority_items = classification
        .expiring_soon
        .iter()
        .take(PRIORITY_ITEM_LIMIT)
        .cloned()
        .collect();

    classification
}

fn is_bulk_quantity(item: &InventoryItem) -> bool {
    item.quantity_amount()
        .map(|amount| amount > BULK_QUANTITY_THRESHOLD)
        .unwrap_or(false)
}
