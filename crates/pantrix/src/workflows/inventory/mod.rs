//! Perishable stock tracking and expiry bucketing.

mod classification;
pub mod domain;
mod engine;
mod import;

pub use classification::{
    classify, ExpiryClassification, ExpirySummary, BULK_QUANTITY_THRESHOLD, BULK_WINDOW_DAYS,
    EXPIRING_SOON_BULK_DAYS, EXPIRING_SOON_DAYS, PRIORITY_ITEM_LIMIT,
};
pub use domain::{leading_amount, FoodCategory, InventoryItem, InventoryItemId, NewInventoryItem};
pub use engine::InventoryEngine;
pub use import::{InventoryCsvImporter, InventoryImportError};
