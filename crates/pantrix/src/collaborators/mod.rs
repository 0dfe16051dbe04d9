//! Capability interfaces for the AI, geocoding and media services the pantry
//! leans on. Calls are asynchronous, may fail, and are never retried; callers
//! surface failures as scoped errors.

mod demo;

pub use demo::DemoCollaborators;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;
use crate::workflows::hotspots::WasteHotspot;
use crate::workflows::inventory::{InventoryItem, NewInventoryItem};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingSuggestion {
    pub name: String,
    pub quantity: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// A single balanced meal with its macro split, in percent of calories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartPlate {
    pub name: String,
    pub description: String,
    pub calories: u32,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub nutrition: NutritionBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionBreakdown {
    pub carbohydrates: u32,
    pub proteins: u32,
    pub fats: u32,
    pub vitamins_and_minerals: u32,
}

/// A food bank a hotel can hand a donation to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodBankListing {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusinessKind {
    Restaurant,
    FoodBank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LearningTopic {
    FoodStorage,
    CarbonImpact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningCard {
    pub title: String,
    pub content: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningModule {
    pub title: String,
    pub cards: Vec<LearningCard>,
    pub quiz: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
}

/// Response language requested from generative services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Hi,
    Fr,
    De,
    Ta,
}

impl Language {
    /// Unknown or missing codes fall back to English.
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(|raw| raw.trim().to_ascii_lowercase()).as_deref() {
            Some("es") => Self::Es,
            Some("hi") => Self::Hi,
            Some("fr") => Self::Fr,
            Some("de") => Self::De,
            Some("ta") => Self::Ta,
            _ => Self::En,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Spanish",
            Self::Hi => "Hindi",
            Self::Fr => "French",
            Self::De => "German",
            Self::Ta => "Tamil",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("{0}")]
    Disabled(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub trait RecipeSuggester: Send + Sync {
    /// A few (typically 1-3) recipes for using up one ingredient.
    fn suggest_recipes(
        &self,
        food_item: &str,
        profile: Option<&UserProfile>,
        language: Language,
    ) -> impl Future<Output = Result<Vec<Recipe>, CollaboratorError>> + Send;

    /// Recipes combining several items that are about to expire.
    fn smart_recipes(
        &self,
        food_items: &[String],
        profile: Option<&UserProfile>,
        language: Language,
    ) -> impl Future<Output = Result<Vec<Recipe>, CollaboratorError>> + Send;
}

pub trait ShoppingAdvisor: Send + Sync {
    fn shopping_suggestions(
        &self,
        inventory: &[InventoryItem],
    ) -> impl Future<Output = Result<Vec<ShoppingSuggestion>, CollaboratorError>> + Send;
}

pub trait ReceiptScanner: Send + Sync {
    /// Guess inventory lines from a base64-encoded receipt photo.
    fn extract_items(
        &self,
        image_base64: &str,
    ) -> impl Future<Output = Result<Vec<NewInventoryItem>, CollaboratorError>> + Send;
}

pub trait Geocoder: Send + Sync {
    fn geocode(
        &self,
        location: &str,
    ) -> impl Future<Output = Result<GeoLocation, CollaboratorError>> + Send;
}

pub trait HotspotFinder: Send + Sync {
    fn waste_hotspots(
        &self,
        location: &str,
    ) -> impl Future<Output = Result<Vec<WasteHotspot>, CollaboratorError>> + Send;
}

pub trait MealPlanner: Send + Sync {
    /// One balanced plate built from `food_items`.
    fn smart_plate(
        &self,
        food_items: &[String],
        profile: Option<&UserProfile>,
        language: Language,
    ) -> impl Future<Output = Result<SmartPlate, CollaboratorError>> + Send;
}

pub trait BusinessDirectory: Send + Sync {
    /// Food banks near `location` that accept donations.
    fn nearby_food_banks(
        &self,
        location: &str,
    ) -> impl Future<Output = Result<Vec<FoodBankListing>, CollaboratorError>> + Send;

    /// Business names offered as sign-in suggestions.
    fn business_names(
        &self,
        location: &str,
        kind: BusinessKind,
    ) -> impl Future<Output = Result<Vec<String>, CollaboratorError>> + Send;
}

pub trait LearningGuide: Send + Sync {
    fn learning_module(
        &self,
        topic: LearningTopic,
        language: Language,
    ) -> impl Future<Output = Result<LearningModule, CollaboratorError>> + Send;
}

pub trait SpeechSynthesizer: Send + Sync {
    /// Playable audio bytes for `text`.
    fn synthesize(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<u8>, CollaboratorError>> + Send;
}

pub trait VideoGenerator: Send + Sync {
    /// URL of a generated clip.
    fn generate_video(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> impl Future<Output = Result<String, CollaboratorError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_codes_fall_back_to_english() {
        assert_eq!(Language::from_code(Some("TA")), Language::Ta);
        assert_eq!(Language::from_code(Some("pt")), Language::En);
        assert_eq!(Language::from_code(None).name(), "English");
    }

    #[test]
    fn topics_and_business_kinds_use_kebab_case() {
        let topic: LearningTopic = serde_json::from_str("\"carbon-impact\"").expect("parses");
        assert_eq!(topic, LearningTopic::CarbonImpact);
        let kind = serde_json::to_string(&BusinessKind::FoodBank).expect("serializes");
        assert_eq!(kind, "\"food-bank\"");
    }

    #[test]
    fn aspect_ratios_use_ratio_strings() {
        let json = serde_json::to_string(&AspectRatio::Portrait).expect("serializes");
        assert_eq!(json, "\"9:16\"");
    }
}
