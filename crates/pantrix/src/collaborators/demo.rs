use std::time::Duration;

use chrono::NaiveDate;
use tracing::debug;

use super::{
    AspectRatio, BusinessDirectory, BusinessKind, CollaboratorError, FoodBankListing,
    GeoLocation, Geocoder, HotspotFinder, Language, LearningCard, LearningGuide, LearningModule,
    LearningTopic, MealPlanner, NutritionBreakdown, QuizQuestion, ReceiptScanner, Recipe,
    RecipeSuggester, ShoppingAdvisor, ShoppingSuggestion, SmartPlate, SpeechSynthesizer,
    VideoGenerator,
};
use crate::profile::UserProfile;
use crate::workflows::hotspots::WasteHotspot;
use crate::workflows::inventory::{FoodCategory, InventoryItem, NewInventoryItem};

const RECIPE_DELAY: Duration = Duration::from_millis(1000);
const SMART_RECIPE_DELAY: Duration = Duration::from_millis(1500);
const SHOPPING_DELAY: Duration = Duration::from_millis(800);
const RECEIPT_DELAY: Duration = Duration::from_millis(2500);
const SMART_PLATE_DELAY: Duration = Duration::from_millis(1200);
const VIDEO_DELAY: Duration = Duration::from_millis(3000);

/// Canned provider used by the demo deployment and local development.
///
/// Latencies mimic the hosted model; `base_delay` scales them (500ms is the
/// nominal value, zero disables waiting entirely).
#[derive(Debug, Clone)]
pub struct DemoCollaborators {
    base_delay: Duration,
}

impl Default for DemoCollaborators {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

impl DemoCollaborators {
    pub fn new(base_delay: Duration) -> Self {
        Self { base_delay }
    }

    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    async fn pause(&self, nominal: Duration) {
        if self.base_delay.is_zero() {
            return;
        }
        let scaled = nominal.mul_f64(self.base_delay.as_secs_f64() / 0.5);
        tokio::time::sleep(scaled).await;
    }
}

impl RecipeSuggester for DemoCollaborators {
    async fn suggest_recipes(
        &self,
        food_item: &str,
        _profile: Option<&UserProfile>,
        language: Language,
    ) -> Result<Vec<Recipe>, CollaboratorError> {
        debug!(food_item, language = language.name(), "demo recipe suggestions");
        self.pause(RECIPE_DELAY).await;

        Ok(vec![
            Recipe {
                name: format!("Tasty {food_item} Stir-fry"),
                description: "A quick and delicious stir-fry that's perfect for a weeknight dinner, using up your ingredients efficiently.".to_string(),
                ingredients: vec![
                    format!("1 lb {food_item}"),
                    "1 cup broccoli florets".to_string(),
                    "1 red bell pepper, sliced".to_string(),
                    "2 tbsp soy sauce".to_string(),
                    "1 tbsp sesame oil".to_string(),
                    "1 clove garlic, minced".to_string(),
                ],
                instructions: vec![
                    "Prepare all your vegetables and chop the main ingredient.".to_string(),
                    "Heat sesame oil in a large skillet or wok over medium-high heat.".to_string(),
                    "Add garlic and stir-fry for 30 seconds until fragrant.".to_string(),
                    "Add the main ingredient and vegetables, and cook for 5-7 minutes until tender-crisp.".to_string(),
                    "Stir in soy sauce and serve immediately.".to_string(),
                ],
            },
            Recipe {
                name: format!("Roasted {food_item} with Herbs"),
                description: format!("A simple yet elegant way to prepare your {food_item}, highlighting its natural flavors with aromatic herbs."),
                ingredients: vec![
                    format!("1.5 lbs {food_item}"),
                    "2 tbsp olive oil".to_string(),
                    "1 tsp dried rosemary".to_string(),
                    "1 tsp dried thyme".to_string(),
                    "Salt and pepper to taste".to_string(),
                ],
                instructions: vec![
                    "Preheat your oven to 400°F (200°C).".to_string(),
                    format!("Toss the {food_item} with olive oil, rosemary, thyme, salt, and pepper."),
                    "Arrange in a single layer on a baking sheet.".to_string(),
                    "Roast for 20-25 minutes, or until cooked through and lightly browned.".to_string(),
                    "Let it rest for a few minutes before serving.".to_string(),
                ],
            },
        ])
    }

    async fn smart_recipes(
        &self,
        food_items: &[String],
        _profile: Option<&UserProfile>,
        _language: Language,
    ) -> Result<Vec<Recipe>, CollaboratorError> {
        if food_items.is_empty() {
            return Err(CollaboratorError::InvalidInput(
                "at least one food item is required".to_string(),
            ));
        }
        self.pause(SMART_RECIPE_DELAY).await;

        let mut ingredients = food_items.to_vec();
        ingredients.extend([
            "1 cup shredded cheese".to_string(),
            "1 can cream of mushroom soup".to_string(),
            "1/2 cup breadcrumbs".to_string(),
        ]);

        Ok(vec![Recipe {
            name: "Expiring Soon Casserole".to_string(),
            description: format!(
                "A hearty and delicious casserole that combines {} into one cohesive meal.",
                food_items.join(", ")
            ),
            ingredients,
            instructions: vec![
                "Preheat oven to 375°F (190°C).".to_string(),
                "Combine all ingredients except breadcrumbs in a large bowl and mix well.".to_string(),
                "Transfer to a greased 9x13 inch baking dish.".to_string(),
                "Top with breadcrumbs.".to_string(),
                "Bake for 25-30 minutes, or until bubbly and golden brown.".to_string(),
            ],
        }])
    }
}

impl ShoppingAdvisor for DemoCollaborators {
    async fn shopping_suggestions(
        &self,
        inventory: &[InventoryItem],
    ) -> Result<Vec<ShoppingSuggestion>, CollaboratorError> {
        debug!(items = inventory.len(), "demo shopping suggestions");
        self.pause(SHOPPING_DELAY).await;

        let suggestion = |name: &str, quantity: &str, reason: &str| ShoppingSuggestion {
            name: name.to_string(),
            quantity: quantity.to_string(),
            reason: reason.to_string(),
        };
        Ok(vec![
            suggestion("Pasta Sauce", "1 jar", "Pairs well with your Pasta."),
            suggestion("Salad Greens", "1 bag", "A healthy staple to have on hand."),
            suggestion("Garlic", "1 head", "Essential for many recipes."),
            suggestion("Olive Oil", "1 bottle", "You might be running low."),
            suggestion("Snack Bars", "1 box", "For quick and easy snacks."),
        ])
    }
}

impl ReceiptScanner for DemoCollaborators {
    async fn extract_items(
        &self,
        image_base64: &str,
    ) -> Result<Vec<NewInventoryItem>, CollaboratorError> {
        if image_base64.trim().is_empty() {
            return Err(CollaboratorError::InvalidInput(
                "receipt image is empty".to_string(),
            ));
        }
        self.pause(RECEIPT_DELAY).await;

        let line = |name: &str, quantity: &str, category, (y, m, d): (i32, u32, u32)| {
            NaiveDate::from_ymd_opt(y, m, d)
                .map(|expiry| NewInventoryItem::new(name, expiry, quantity, category))
                .ok_or_else(|| CollaboratorError::Unavailable("receipt date out of range".into()))
        };
        Ok(vec![
            line("Organic Milk", "1 Gallon", FoodCategory::Dairy, (2024, 8, 10))?,
            line("Dozen Eggs", "1 carton", FoodCategory::Dairy, (2024, 8, 25))?,
            line("Sourdough Bread", "1 Loaf", FoodCategory::Bakery, (2024, 8, 5))?,
            line("Bananas", "1 lb", FoodCategory::Produce, (2024, 8, 6))?,
        ])
    }
}

impl Geocoder for DemoCollaborators {
    async fn geocode(&self, location: &str) -> Result<GeoLocation, CollaboratorError> {
        self.pause(Duration::from_millis(500)).await;

        let (latitude, longitude) = if location.contains("New York") {
            (40.7128, -74.0060)
        } else if location.contains("Los Angeles") {
            (34.0522, -118.2437)
        } else if location.contains("Miami") {
            (25.7617, -80.1918)
        } else if location.contains("Denver") {
            (39.7392, -104.9903)
        } else {
            // San Francisco
            (37.7749, -122.4194)
        };
        Ok(GeoLocation {
            latitude,
            longitude,
        })
    }
}

impl HotspotFinder for DemoCollaborators {
    async fn waste_hotspots(&self, location: &str) -> Result<Vec<WasteHotspot>, CollaboratorError> {
        debug!(location, "demo waste hotspots");
        self.pause(Duration::from_millis(500)).await;

        Ok(vec![
            WasteHotspot {
                id: "hotspot-0".to_string(),
                name: "The Lavish Buffet".to_string(),
                address: "101 City Center, New York, NY".to_string(),
                latitude: 40.7580,
                longitude: -73.9855,
                waste_score: 9,
                contact_email: "mgr@lavishbuffet.demo".to_string(),
                contact_phone: "555-0101".to_string(),
            },
            WasteHotspot {
                id: "hotspot-1".to_string(),
                name: "Gourmet Catering Co.".to_string(),
                address: "202 Commerce St, New York, NY".to_string(),
                latitude: 40.7128,
                longitude: -74.0060,
                waste_score: 8,
                contact_email: "contact@gourmetcatering.demo".to_string(),
                contact_phone: "555-0102".to_string(),
            },
        ])
    }
}

impl MealPlanner for DemoCollaborators {
    async fn smart_plate(
        &self,
        food_items: &[String],
        _profile: Option<&UserProfile>,
        language: Language,
    ) -> Result<SmartPlate, CollaboratorError> {
        if food_items.is_empty() {
            return Err(CollaboratorError::InvalidInput(
                "at least one food item is required".to_string(),
            ));
        }
        debug!(items = food_items.len(), language = language.name(), "demo smart plate");
        self.pause(SMART_PLATE_DELAY).await;

        let mut ingredients = food_items.to_vec();
        ingredients.extend(["1 tbsp Olive Oil".to_string(), "Herbs and Spices".to_string()]);
        Ok(SmartPlate {
            name: "Balanced Chicken and Veggie Plate".to_string(),
            description: "A well-rounded meal featuring lean protein and fresh vegetables to provide sustained energy and essential nutrients.".to_string(),
            calories: 550,
            ingredients,
            instructions: vec![
                "Season chicken with herbs.".to_string(),
                "Sauté vegetables in olive oil.".to_string(),
                "Grill or pan-sear chicken until cooked through.".to_string(),
                "Serve together.".to_string(),
            ],
            nutrition: NutritionBreakdown {
                carbohydrates: 40,
                proteins: 35,
                fats: 20,
                vitamins_and_minerals: 5,
            },
        })
    }
}

impl BusinessDirectory for DemoCollaborators {
    async fn nearby_food_banks(
        &self,
        location: &str,
    ) -> Result<Vec<FoodBankListing>, CollaboratorError> {
        debug!(location, "demo food bank directory");
        self.pause(Duration::from_millis(500)).await;

        let listing = |name: &str, address: &str, latitude, longitude| FoodBankListing {
            name: name.to_string(),
            address: address.to_string(),
            latitude,
            longitude,
        };
        Ok(vec![
            listing("City Harvest", "123 Main St, New York, NY", 40.715, -74.002),
            listing("Food Bank for NYC", "456 Second Ave, New York, NY", 40.729, -73.985),
            listing("St. John's Bread & Life", "789 Broadway, Brooklyn, NY", 40.693, -73.931),
        ])
    }

    async fn business_names(
        &self,
        location: &str,
        kind: BusinessKind,
    ) -> Result<Vec<String>, CollaboratorError> {
        debug!(location, ?kind, "demo business names");
        self.pause(Duration::from_millis(500)).await;

        let names: &[&str] = match kind {
            BusinessKind::Restaurant => &[
                "The Corner Bistro",
                "Sunset Grill",
                "Harborview Fine Dining",
                "Mountain Top Cafe",
                "Plaza Restaurant",
            ],
            BusinessKind::FoodBank => &[
                "Community Food Pantry",
                "City Harvest Center",
                "Hope Food Bank",
                "Regional Distribution Hub",
                "The Giving Table",
            ],
        };
        Ok(names.iter().map(|name| name.to_string()).collect())
    }
}

impl LearningGuide for DemoCollaborators {
    /// Every topic gets the same storage module in the demo build.
    async fn learning_module(
        &self,
        topic: LearningTopic,
        language: Language,
    ) -> Result<LearningModule, CollaboratorError> {
        debug!(?topic, language = language.name(), "demo learning module");
        self.pause(Duration::from_millis(500)).await;

        let card = |title: &str, content: &str, icon: &str| LearningCard {
            title: title.to_string(),
            content: content.to_string(),
            icon: icon.to_string(),
        };
        Ok(LearningModule {
            title: "Food Storage Tips".to_string(),
            cards: vec![
                card(
                    "Keep it Cool",
                    "Store perishable items like dairy and meat in the refrigerator at or below 40°F (4°C).",
                    "FridgeIcon",
                ),
                card(
                    "Berry Care",
                    "Don't wash berries until you're ready to eat them. Store them in a breathable container.",
                    "AppleIcon",
                ),
                card(
                    "Separate Fruits & Veggies",
                    "Some fruits produce ethylene gas, which can make other produce spoil faster. Keep them separate!",
                    "SparklesIcon",
                ),
            ],
            quiz: vec![QuizQuestion {
                question: "Where should you store potatoes?".to_string(),
                options: vec![
                    "In the fridge".to_string(),
                    "In a cool, dark place".to_string(),
                    "On the counter".to_string(),
                    "In a plastic bag".to_string(),
                ],
                correct_answer: "In a cool, dark place".to_string(),
                explanation: "Refrigeration can turn the starch in potatoes to sugar, affecting their taste and texture.".to_string(),
            }],
        })
    }
}

impl SpeechSynthesizer for DemoCollaborators {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, CollaboratorError> {
        self.pause(Duration::from_millis(1000)).await;
        Err(CollaboratorError::Disabled(
            "Speech generation is disabled in this demo version.".to_string(),
        ))
    }
}

impl VideoGenerator for DemoCollaborators {
    async fn generate_video(
        &self,
        _prompt: &str,
        _aspect_ratio: AspectRatio,
    ) -> Result<String, CollaboratorError> {
        self.pause(VIDEO_DELAY).await;
        Err(CollaboratorError::Disabled(
            "Video generation is temporarily disabled in this demo version.".to_string(),
        ))
    }
}
