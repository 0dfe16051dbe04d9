use chrono::{Duration, NaiveDate};
use metrics_exporter_prometheus::PrometheusHandle;
use pantrix::workflows::donation::{
    DeliveryType, DonationRequest, DonationRequestId, DonationStatus,
};
use pantrix::workflows::inventory::{
    FoodCategory, InventoryItem, InventoryItemId, NewInventoryItem,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Whether seeded stock is sized for a home kitchen or a restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KitchenScale {
    Household,
    Restaurant,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    pantrix::dates::parse_date(raw)
}

/// Starter stock relative to `today`, mirroring a freshly set up account.
pub(crate) fn starter_inventory(today: NaiveDate, scale: KitchenScale) -> Vec<NewInventoryItem> {
    let pick = |household: &'static str, restaurant: &'static str| match scale {
        KitchenScale::Household => household,
        KitchenScale::Restaurant => restaurant,
    };
    let day = |offset: i64| today + Duration::days(offset);

    vec![
        NewInventoryItem::new("Bread", day(1), pick("1 Loaf", "20 Loaves"), FoodCategory::Bakery),
        NewInventoryItem::new("Avocadoes", day(2), pick("2 units", "40 units"), FoodCategory::Produce),
        NewInventoryItem::new("Chicken Breast", day(2), pick("1 lb", "50 lbs"), FoodCategory::Meat),
        NewInventoryItem::new("Old Berries", day(-2), "1 pint", FoodCategory::Produce),
        NewInventoryItem::new("Milk", day(3), pick("0.5 Gallon", "12 Gallons"), FoodCategory::Dairy),
        NewInventoryItem::new("Potatoes", day(4), pick("2 lbs", "50 lbs bag"), FoodCategory::Produce),
        NewInventoryItem::new("Onions", day(5), pick("1 lb", "25 lbs bag"), FoodCategory::Produce),
        NewInventoryItem::new("Eggs", day(10), pick("1 Dozen", "10 Dozen"), FoodCategory::Dairy),
        NewInventoryItem::new("Cheese", day(20), pick("8 oz", "15 lbs"), FoodCategory::Dairy),
        NewInventoryItem::new("Spinach", day(5), pick("1 bag", "5 lbs"), FoodCategory::Produce),
        NewInventoryItem::new("Tomatoes", day(6), pick("1 lb", "30 lbs"), FoodCategory::Produce),
        NewInventoryItem::new("Pasta", day(30), pick("1 box", "20 boxes"), FoodCategory::Pantry),
    ]
}

fn historical_item(
    id: &str,
    name: &str,
    expiry: Option<NaiveDate>,
    quantity: &str,
    category: FoodCategory,
) -> Option<InventoryItem> {
    Some(InventoryItem {
        id: InventoryItemId(id.to_string()),
        name: name.to_string(),
        expiry_date: expiry?,
        quantity: quantity.to_string(),
        category,
    })
}

fn historical_request(
    id: &str,
    restaurant: &str,
    location: &str,
    items: Option<Vec<InventoryItem>>,
    status: DonationStatus,
    donation_date: Option<NaiveDate>,
) -> Option<DonationRequest> {
    Some(DonationRequest {
        id: DonationRequestId(id.to_string()),
        restaurant_name: restaurant.to_string(),
        location: location.to_string(),
        items: items?,
        status,
        donation_date,
        ngo_name: "City Harvest".to_string(),
        delivery_type: DeliveryType::Pickup,
        pickup_date_time: None,
        notes: None,
    })
}

/// Donation history shown on the food-bank dashboard of the demo deployment,
/// oldest first so the repository lists the newest on top.
pub(crate) fn seeded_donation_history() -> Vec<DonationRequest> {
    let d = NaiveDate::from_ymd_opt;
    let grand = ("The Grand Eatery", "New York, USA");
    let sunset = ("Sunset Bistro", "Los Angeles, USA");

    let history = [
        historical_request(
            "don-16888",
            "Mountain View Grill",
            "Denver, USA",
            historical_item("d7-1", "Steak", d(2024, 7, 17), "40 lbs", FoodCategory::Meat).map(|item| vec![item]),
            DonationStatus::Pending,
            None,
        ),
        historical_request(
            "don-16777",
            sunset.0,
            sunset.1,
            historical_item("d6-1", "Tomatoes", d(2024, 5, 5), "25 lbs", FoodCategory::Produce).map(|item| vec![item]),
            DonationStatus::Completed,
            d(2024, 5, 1),
        ),
        historical_request(
            "don-16666",
            grand.0,
            grand.1,
            historical_item("d5-1", "Bread", d(2024, 4, 25), "15 Loaves", FoodCategory::Bakery)
                .zip(historical_item("d5-2", "Cheese", d(2024, 5, 10), "5 lbs", FoodCategory::Dairy))
                .map(|(bread, cheese)| vec![bread, cheese]),
            DonationStatus::Completed,
            d(2024, 4, 22),
        ),
        historical_request(
            "don-16555",
            "Ocean's Catch",
            "Miami, USA",
            historical_item("d4-1", "Fish Fillets", d(2024, 7, 19), "15 lbs", FoodCategory::Meat).map(|item| vec![item]),
            DonationStatus::Accepted,
            None,
        ),
        historical_request(
            "don-16444",
            grand.0,
            grand.1,
            historical_item("d3-1", "Milk", d(2024, 5, 15), "10 Gallons", FoodCategory::Dairy).map(|item| vec![item]),
            DonationStatus::Completed,
            d(2024, 5, 10),
        ),
        historical_request(
            "don-16333",
            sunset.0,
            sunset.1,
            historical_item("d2-1", "Chicken Breast", d(2024, 7, 18), "30 lbs", FoodCategory::Meat).map(|item| vec![item]),
            DonationStatus::Pending,
            None,
        ),
        historical_request(
            "don-16222",
            grand.0,
            grand.1,
            historical_item("d1-1", "Potatoes", d(2024, 7, 20), "20 lbs", FoodCategory::Produce)
                .zip(historical_item("d1-2", "Onions", d(2024, 7, 25), "10 lbs", FoodCategory::Produce))
                .map(|(potatoes, onions)| vec![potatoes, onions]),
            DonationStatus::Pending,
            None,
        ),
    ];

    history.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantrix::workflows::donation::DonationAggregates;
    use pantrix::workflows::inventory::classify;

    #[test]
    fn seeded_history_is_complete() {
        let history = seeded_donation_history();
        assert_eq!(history.len(), 7);
        assert_eq!(history[6].id.0, "don-16222");

        let aggregates = DonationAggregates::new(history.into_iter().rev().collect());
        assert_eq!(aggregates.partners().len(), 4);
        assert_eq!(aggregates.completed_count("The Grand Eatery"), 2);
        assert_eq!(aggregates.completed_count("Mountain View Grill"), 0);
    }

    #[test]
    fn restaurant_stock_is_flagged_for_bulk_donation() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 15).expect("valid date");
        let stock: Vec<InventoryItem> = starter_inventory(today, KitchenScale::Restaurant)
            .into_iter()
            .enumerate()
            .map(|(index, item)| InventoryItem {
                id: InventoryItemId(format!("seed-{index}")),
                name: item.name,
                expiry_date: item.expiry_date,
                quantity: item.quantity,
                category: item.category,
            })
            .collect();

        let classification = classify(&stock, today);
        let bulk: Vec<&str> = classification
            .bulk_expiring
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        assert!(bulk.contains(&"Chicken Breast"));
        assert!(bulk.contains(&"Tomatoes"));
        assert!(!bulk.contains(&"Spinach"));
        assert_eq!(classification.expired.len(), 1);
    }
}
