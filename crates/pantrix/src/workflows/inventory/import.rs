use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::domain::{FoodCategory, NewInventoryItem};
use crate::dates::parse_date;

#[derive(Debug)]
pub enum InventoryImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for InventoryImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InventoryImportError::Io(err) => write!(f, "failed to read inventory export: {}", err),
            InventoryImportError::Csv(err) => write!(f, "invalid inventory CSV data: {}", err),
        }
    }
}

impl std::error::Error for InventoryImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InventoryImportError::Io(err) => Some(err),
            InventoryImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for InventoryImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for InventoryImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads `name,expiry_date,quantity,category` rows into unsaved inventory items.
pub struct InventoryCsvImporter;

impl InventoryCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<NewInventoryItem>, InventoryImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<NewInventoryItem>, InventoryImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut items = Vec::new();

        for record in csv_reader.deserialize::<InventoryRow>() {
            let row = record?;
            items.push(NewInventoryItem {
                name: row.name,
                expiry_date: row.expiry_date,
                quantity: row.quantity,
                category: row.category,
            });
        }

        Ok(items)
    }
}

#[derive(Debug, Deserialize)]
struct InventoryRow {
    name: String,
    #[serde(deserialize_with = "calendar_date")]
    expiry_date: NaiveDate,
    #[serde(default)]
    quantity: String,
    #[serde(default = "default_category", deserialize_with = "category_label")]
    category: FoodCategory,
}

fn default_category() -> FoodCategory {
    FoodCategory::Other
}

fn calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

fn category_label<'de, D>(deserializer: D) -> Result<FoodCategory, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if raw.trim().is_empty() {
        return Ok(FoodCategory::Other);
    }
    FoodCategory::from_label(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unknown food category '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_rows_and_defaults_blank_category() {
        let csv = "name,expiry_date,quantity,category\nMilk,2024-07-15,12 Gallons,dairy\nMystery tin,2025-01-01,1 can,\n";
        let items = InventoryCsvImporter::from_reader(Cursor::new(csv)).expect("parses");

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category, FoodCategory::Dairy);
        assert_eq!(items[0].quantity, "12 Gallons");
        assert_eq!(items[1].category, FoodCategory::Other);
    }

    #[test]
    fn rejects_unknown_categories() {
        let csv = "name,expiry_date,quantity,category\nChips,2024-07-15,1 bag,Snacks\n";
        let err = InventoryCsvImporter::from_reader(Cursor::new(csv)).expect_err("rejected");
        assert!(matches!(err, InventoryImportError::Csv(_)));
    }

    #[test]
    fn rejects_malformed_dates() {
        let csv = "name,expiry_date,quantity,category\nChips,07/15/2024,1 bag,Pantry\n";
        assert!(InventoryCsvImporter::from_reader(Cursor::new(csv)).is_err());
    }
}
