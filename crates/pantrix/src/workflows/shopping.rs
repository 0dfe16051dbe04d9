//! Household shopping list mixing manual entries with advisor suggestions.

use serde::{Deserialize, Serialize};

use crate::collaborators::ShoppingSuggestion;
use crate::validation::{require, ValidationError};

pub const MANUAL_REASON: &str = "Manually added";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    pub id: String,
    pub name: String,
    pub quantity: String,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub checked: bool,
    pub is_ai_generated: bool,
}

/// Partial edit; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListUpdate {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub notes: Option<String>,
    pub checked: Option<bool>,
}

#[derive(Debug, Default)]
pub struct ShoppingList {
    items: Vec<ShoppingListItem>,
    next_sequence: u64,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_sequence += 1;
        format!("{prefix}-{:06}", self.next_sequence)
    }

    pub fn items(&self) -> &[ShoppingListItem] {
        &self.items
    }

    /// Replace every generated entry with `suggestions`, keeping manual ones.
    pub fn apply_suggestions(&mut self, suggestions: Vec<ShoppingSuggestion>) -> usize {
        self.items.retain(|item| !item.is_ai_generated);
        let count = suggestions.len();
        for suggestion in suggestions {
            let id = self.next_id("ai");
            self.items.push(ShoppingListItem {
                id,
                name: suggestion.name,
                quantity: suggestion.quantity,
                reason: suggestion.reason,
                notes: None,
                checked: false,
                is_ai_generated: true,
            });
        }
        count
    }

    pub fn add_manual(
        &mut self,
        name: &str,
        quantity: &str,
        notes: Option<String>,
    ) -> Result<ShoppingListItem, ValidationError> {
        require(name, "name")?;
        let id = self.next_id("manual");
        let item = ShoppingListItem {
            id,
            name: name.trim().to_string(),
            quantity: quantity.trim().to_string(),
            reason: MANUAL_REASON.to_string(),
            notes,
            checked: false,
            is_ai_generated: false,
        };
        self.items.push(item.clone());
        Ok(item)
    }

    pub fn update(&mut self, id: &str, update: ShoppingListUpdate) -> Option<&ShoppingListItem> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        if let Some(name) = update.name {
            item.name = name;
        }
        if let Some(quantity) = update.quantity {
            item.quantity = quantity;
        }
        if let Some(notes) = update.notes {
            item.notes = Some(notes);
        }
        if let Some(checked) = update.checked {
            item.checked = checked;
        }
        Some(item)
    }

    pub fn remove(&mut self, id: &str) -> Option<ShoppingListItem> {
        let position = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(position))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
