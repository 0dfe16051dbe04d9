//! End-to-end pantry scenarios combining the inventory, collaborators and donations.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use pantrix::collaborators::{DemoCollaborators, Language, RecipeSuggester, ShoppingAdvisor};
use pantrix::pantry::Pantry;
use pantrix::workflows::donation::{InMemoryDonationRepository, TransitionPolicy};
use pantrix::workflows::inventory::{FoodCategory, InventoryItem, NewInventoryItem};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 15).expect("valid date")
}

fn names(items: &[InventoryItem]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_str()).collect()
}

fn pantry() -> Pantry<InMemoryDonationRepository> {
    Pantry::new(
        Arc::new(InMemoryDonationRepository::default()),
        TransitionPolicy::Lenient,
    )
}

#[test]
fn milk_and_bread_household_triage() {
    let mut pantry = pantry();
    pantry.add_item(NewInventoryItem::new(
        "Milk",
        today() + Duration::days(2),
        "0.5 Gallon",
        FoodCategory::Dairy,
    ));
    pantry.add_item(NewInventoryItem::new(
        "Bread",
        today() - Duration::days(1),
        "1 Loaf",
        FoodCategory::Bakery,
    ));

    let classification = pantry.classify(today());
    let expired: Vec<&str> = classification.expired.iter().map(|i| i.name.as_str()).collect();
    let soon: Vec<&str> = classification
        .expiring_soon
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(expired, vec!["Bread"]);
    assert_eq!(soon, vec!["Milk"]);
    assert!(classification.bulk_expiring.is_empty());

    let names: Vec<&str> = pantry.inventory().items().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Bread", "Milk"]);
}

#[test]
fn milk_today_and_bread_tomorrow_are_used_first() {
    let mut pantry = pantry();
    pantry.add_item(NewInventoryItem::new(
        "Bread",
        today() + Duration::days(1),
        "1 Loaf",
        FoodCategory::Bakery,
    ));
    pantry.add_item(NewInventoryItem::new(
        "Milk",
        today(),
        "0.5 Gallon",
        FoodCategory::Dairy,
    ));

    let classification = pantry.classify(today());
    assert!(classification.expired.is_empty());
    assert_eq!(names(&classification.expiring_soon), vec!["Milk", "Bread"]);
    assert_eq!(names(&classification.priority_items), vec!["Milk", "Bread"]);
    assert!(classification.bulk_expiring.is_empty());
}

#[tokio::test]
async fn recipes_for_the_most_urgent_item() {
    let mut pantry = pantry();
    pantry.add_items(vec![
        NewInventoryItem::new("Spinach", today() + Duration::days(1), "1 bag", FoodCategory::Produce),
        NewInventoryItem::new("Pasta", today() + Duration::days(30), "1 box", FoodCategory::Pantry),
    ]);
    let first = pantry
        .classify(today())
        .priority_items
        .into_iter()
        .next()
        .expect("one urgent item");

    let collaborators = DemoCollaborators::instant();
    let recipes = collaborators
        .suggest_recipes(&first.name, None, Language::from_code(Some("de")))
        .await
        .expect("demo recipes");
    assert!(recipes.iter().all(|r| r.name.contains("Spinach")));
}

#[tokio::test]
async fn shopping_suggestions_apply_after_the_call() {
    let mut pantry = pantry();
    pantry
        .shopping_mut()
        .add_manual("Coffee", "1 bag", Some("dark roast".to_string()))
        .expect("valid entry");

    let snapshot = pantry.inventory().items().to_vec();
    let suggestions = DemoCollaborators::instant()
        .shopping_suggestions(&snapshot)
        .await
        .expect("suggestions");
    let added = pantry.shopping_mut().apply_suggestions(suggestions);

    assert_eq!(added, 5);
    assert_eq!(pantry.shopping().items().len(), 6);
    assert!(pantry.shopping().items().iter().filter(|i| i.is_ai_generated).count() == 5);
}
