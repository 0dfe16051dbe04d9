use chrono::NaiveDate;
use tracing::debug;

use super::classification::{classify, ExpiryClassification, ExpirySummary};
use super::domain::{FoodCategory, InventoryItem, InventoryItemId, NewInventoryItem};

/// Authoritative, expiry-ordered collection of perishable items.
#[derive(Debug, Default)]
pub struct InventoryEngine {
    items: Vec<InventoryItem>,
    next_sequence: u64,
}

impl InventoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<NewInventoryItem>) -> Self {
        let mut engine = Self::new();
        engine.add_batch(items);
        engine
    }

    fn next_id(&mut self) -> InventoryItemId {
        self.next_sequence += 1;
        InventoryItemId(format!("item-{:06}", self.next_sequence))
    }

    fn resort(&mut self) {
        // Stable, so equal expiry dates keep insertion order.
        self.items.sort_by(|a, b| a.expiry_date.cmp(&b.expiry_date));
    }

    pub fn add(&mut self, item: NewInventoryItem) -> InventoryItem {
        let id = self.next_id();
        let stored = item.with_id(id);
        debug!(item_id = %stored.id, name = %stored.name, expiry = %stored.expiry_date, "inventory item added");
        self.items.push(stored.clone());
        self.resort();
        stored
    }

    /// Insert several items in one pass, e.g. the lines read off a scanned receipt.
    pub fn add_batch(&mut self, items: Vec<NewInventoryItem>) -> Vec<InventoryItem> {
        let added: Vec<InventoryItem> = items
            .into_iter()
            .map(|item| {
                let id = self.next_id();
                item.with_id(id)
            })
            .collect();

        debug!(count = added.len(), "inventory batch added");
        self.items.extend(added.iter().cloned());
        self.resort();
        added
    }

    /// Remove the item with `id`. Absent ids are not an error.
    pub fn remove(&mut self, id: &InventoryItemId) -> Option<InventoryItem> {
        let position = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(position))
    }

    /// Remove every listed id, returning the items that were present.
    pub fn remove_many(&mut self, ids: &[InventoryItemId]) -> Vec<InventoryItem> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| ids.contains(&item.id));
        self.items = kept;
        removed
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &InventoryItemId) -> Option<&InventoryItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Items in `category`, or everything when `None` ("All").
    pub fn by_category(&self, category: Option<FoodCategory>) -> Vec<InventoryItem> {
        self.items
            .iter()
            .filter(|item| category.map_or(true, |wanted| item.category == wanted))
            .cloned()
            .collect()
    }

    /// Distinct categories currently held, in label order.
    pub fn categories(&self) -> Vec<FoodCategory> {
        let mut categories: Vec<FoodCategory> =
            self.items.iter().map(|item| item.category).collect();
        categories.sort_by_key(|category| category.label());
        categories.dedup();
        categories
    }

    /// Case-insensitive substring match on item names.
    pub fn search(&self, query: &str) -> Vec<InventoryItem> {
        let needle = query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn classify(&self, reference_date: NaiveDate) -> ExpiryClassification {
        classify(&self.items, reference_date)
    }

    pub fn summary(&self, reference_date: NaiveDate) -> ExpirySummary {
        self.classify(reference_date).summary(self.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).expect("valid date")
    }

    fn item(name: &str, days: i64, category: FoodCategory) -> NewInventoryItem {
        NewInventoryItem::new(name, today() + Duration::days(days), "1 unit", category)
    }

    #[test]
    fn equal_expiry_dates_keep_insertion_order() {
        let mut engine = InventoryEngine::new();
        engine.add(item("Apples", 2, FoodCategory::Produce));
        engine.add(item("Butter", 2, FoodCategory::Dairy));
        engine.add(item("Bagels", 1, FoodCategory::Bakery));

        let names: Vec<&str> = engine.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Bagels", "Apples", "Butter"]);
    }

    #[test]
    fn remove_many_returns_only_present_items() {
        let mut engine = InventoryEngine::new();
        let kept = engine.add(item("Rice", 30, FoodCategory::Pantry));
        let gone = engine.add(item("Yogurt", 3, FoodCategory::Dairy));

        let removed = engine.remove_many(&[gone.id.clone(), InventoryItemId("nope".into())]);
        assert_eq!(removed, vec![gone]);
        assert_eq!(engine.items(), &[kept]);
    }

    #[test]
    fn category_and_search_views_filter_without_mutating() {
        let mut engine = InventoryEngine::new();
        engine.add(item("Whole Milk", 4, FoodCategory::Dairy));
        engine.add(item("Oat milk", 9, FoodCategory::Drinks));
        engine.add(item("Spinach", 1, FoodCategory::Produce));

        assert_eq!(engine.by_category(Some(FoodCategory::Dairy)).len(), 1);
        assert_eq!(engine.by_category(None).len(), 3);
        assert_eq!(engine.search("MILK").len(), 2);
        assert_eq!(
            engine.categories(),
            vec![FoodCategory::Dairy, FoodCategory::Drinks, FoodCategory::Produce]
        );
        assert_eq!(engine.len(), 3);
    }
}
