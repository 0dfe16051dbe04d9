use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dates::deserialize_date;

/// Identifier wrapper for tracked inventory items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryItemId(pub String);

impl fmt::Display for InventoryItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FoodCategory {
    Produce,
    Dairy,
    Meat,
    Bakery,
    Pantry,
    Frozen,
    Drinks,
    Other,
}

impl FoodCategory {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Produce,
            Self::Dairy,
            Self::Meat,
            Self::Bakery,
            Self::Pantry,
            Self::Frozen,
            Self::Drinks,
            Self::Other,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Produce => "Produce",
            Self::Dairy => "Dairy",
            Self::Meat => "Meat",
            Self::Bakery => "Bakery",
            Self::Pantry => "Pantry",
            Self::Frozen => "Frozen",
            Self::Drinks => "Drinks",
            Self::Other => "Other",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(trimmed))
    }
}

/// A perishable item owned by the inventory engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub name: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub expiry_date: NaiveDate,
    /// Free text mixing an amount and a unit, e.g. `"12 lbs"` or `"1 bag"`.
    pub quantity: String,
    pub category: FoodCategory,
}

impl InventoryItem {
    /// Whole calendar days from `reference` until expiry; negative once expired.
    pub fn days_until_expiry(&self, reference: NaiveDate) -> i64 {
        (self.expiry_date - reference).num_days()
    }

    /// Leading numeric portion of the quantity text, if any.
    pub fn quantity_amount(&self) -> Option<f64> {
        leading_amount(&self.quantity)
    }
}

/// Item payload before the engine assigns an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    pub name: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub expiry_date: NaiveDate,
    pub quantity: String,
    pub category: FoodCategory,
}

impl NewInventoryItem {
    pub fn new(
        name: impl Into<String>,
        expiry_date: NaiveDate,
        quantity: impl Into<String>,
        category: FoodCategory,
    ) -> Self {
        Self {
            name: name.into(),
            expiry_date,
            quantity: quantity.into(),
            category,
        }
    }

    pub(crate) fn with_id(self, id: InventoryItemId) -> InventoryItem {
        InventoryItem {
            id,
            name: self.name,
            expiry_date: self.expiry_date,
            quantity: self.quantity,
            category: self.category,
        }
    }
}

/// Parse the numeric prefix of `raw` the way a lenient float reader would:
/// optional whitespace and sign, digits with an optional fraction, optional exponent.
pub fn leading_amount(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok()
}
