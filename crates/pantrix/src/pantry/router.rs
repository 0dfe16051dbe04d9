use std::sync::{Arc, MutexGuard};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::{DonationSelection, DonationView, Pantry, PantryError, SharedPantry};
use crate::collaborators::{
    AspectRatio, BusinessDirectory, BusinessKind, CollaboratorError, GeoLocation, Geocoder,
    HotspotFinder, Language, LearningGuide, LearningTopic, MealPlanner, ReceiptScanner, Recipe,
    RecipeSuggester, ShoppingAdvisor, SpeechSynthesizer, VideoGenerator,
};
use crate::dates::deserialize_optional_date;
use crate::profile::Profile;
use crate::workflows::donation::{
    DonationAction, DonationError, DonationRepository, DonationRequestId, DonationStatus,
    RepositoryError,
};
use crate::validation::ValidationError;
use crate::workflows::hotspots::{project_points, ProjectedPoint, Viewport, WasteHotspot};
use crate::workflows::inventory::{FoodCategory, InventoryItemId, NewInventoryItem};
use crate::workflows::requirements::RequirementDraft;
use crate::workflows::shopping::{ShoppingListItem, ShoppingListUpdate};

/// Every collaborator capability the pantry endpoints call out to.
pub trait PantryCollaborators:
    RecipeSuggester
    + ShoppingAdvisor
    + ReceiptScanner
    + Geocoder
    + HotspotFinder
    + MealPlanner
    + BusinessDirectory
    + LearningGuide
    + SpeechSynthesizer
    + VideoGenerator
{
}

impl<T> PantryCollaborators for T where
    T: RecipeSuggester
        + ShoppingAdvisor
        + ReceiptScanner
        + Geocoder
        + HotspotFinder
        + MealPlanner
        + BusinessDirectory
        + LearningGuide
        + SpeechSynthesizer
        + VideoGenerator
{
}

pub struct PantryState<R, C> {
    pub pantry: SharedPantry<R>,
    pub collaborators: Arc<C>,
}

impl<R, C> Clone for PantryState<R, C> {
    fn clone(&self) -> Self {
        Self {
            pantry: Arc::clone(&self.pantry),
            collaborators: Arc::clone(&self.collaborators),
        }
    }
}

/// Router builder exposing the inventory, donation and household endpoints.
pub fn pantry_router<R, C>(pantry: SharedPantry<R>, collaborators: Arc<C>) -> Router
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    Router::new()
        .route(
            "/api/v1/session",
            post(sign_in_handler::<R, C>).delete(sign_out_handler::<R, C>),
        )
        .route(
            "/api/v1/inventory",
            get(list_inventory_handler::<R, C>).post(add_item_handler::<R, C>),
        )
        .route("/api/v1/inventory/batch", post(add_batch_handler::<R, C>))
        .route("/api/v1/inventory/scan", post(scan_receipt_handler::<R, C>))
        .route(
            "/api/v1/inventory/classification",
            get(classification_handler::<R, C>),
        )
        .route(
            "/api/v1/inventory/:item_id",
            delete(remove_item_handler::<R, C>),
        )
        .route(
            "/api/v1/donations",
            get(list_donations_handler::<R, C>).post(donate_handler::<R, C>),
        )
        .route(
            "/api/v1/donations/:donation_id/:action",
            post(transition_handler::<R, C>),
        )
        .route("/api/v1/membership", get(membership_handler::<R, C>))
        .route("/api/v1/partners", get(partners_handler::<R, C>))
        .route(
            "/api/v1/partners/:partner/history",
            get(partner_history_handler::<R, C>),
        )
        .route("/api/v1/food-banks", get(food_banks_handler::<R, C>))
        .route("/api/v1/business-names", get(business_names_handler::<R, C>))
        .route(
            "/api/v1/requirements",
            get(list_requirements_handler::<R, C>).post(broadcast_requirement_handler::<R, C>),
        )
        .route(
            "/api/v1/shopping-list",
            get(shopping_list_handler::<R, C>).post(add_shopping_item_handler::<R, C>),
        )
        .route(
            "/api/v1/shopping-list/suggestions",
            post(shopping_suggestions_handler::<R, C>),
        )
        .route(
            "/api/v1/shopping-list/:entry_id",
            axum::routing::patch(update_shopping_item_handler::<R, C>)
                .delete(remove_shopping_item_handler::<R, C>),
        )
        .route("/api/v1/recipes/smart", post(smart_recipes_handler::<R, C>))
        .route("/api/v1/smart-plate", post(smart_plate_handler::<R, C>))
        .route("/api/v1/learning/:topic", get(learning_handler::<R, C>))
        .route("/api/v1/media/speech", post(speech_handler::<R, C>))
        .route("/api/v1/media/video", post(video_handler::<R, C>))
        .route("/api/v1/hotspots", get(hotspots_handler::<R, C>))
        .with_state(PantryState {
            pantry,
            collaborators,
        })
}

fn lock<R>(pantry: &SharedPantry<R>) -> Result<MutexGuard<'_, Pantry<R>>, PantryError> {
    pantry.lock().map_err(|_| PantryError::Poisoned)
}

/// The explicit location when given, else the signed-in profile's.
fn resolve_location<R>(
    pantry: &SharedPantry<R>,
    requested: Option<String>,
) -> Result<String, PantryError>
where
    R: DonationRepository + 'static,
{
    match requested.filter(|value| !value.trim().is_empty()) {
        Some(location) => Ok(location),
        None => {
            let pantry = lock(pantry)?;
            let location = pantry
                .profile()
                .and_then(|profile| profile.location().map(str::to_string));
            location.ok_or(PantryError::Validation(ValidationError::MissingField(
                "location",
            )))
        }
    }
}

pub(crate) fn error_status(error: &PantryError) -> StatusCode {
    match error {
        PantryError::Validation(_)
        | PantryError::Donation(DonationError::Validation(_))
        | PantryError::Collaborator(CollaboratorError::InvalidInput(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PantryError::Donation(DonationError::InvalidTransition { .. })
        | PantryError::Donation(DonationError::Repository(RepositoryError::Conflict)) => {
            StatusCode::CONFLICT
        }
        PantryError::Donation(DonationError::NotFound(_)) => StatusCode::NOT_FOUND,
        PantryError::NotSignedIn => StatusCode::UNAUTHORIZED,
        PantryError::WrongRole { .. } => StatusCode::FORBIDDEN,
        PantryError::Collaborator(_) => StatusCode::BAD_GATEWAY,
        PantryError::Donation(DonationError::Repository(_)) | PantryError::Poisoned => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for PantryError {
    fn into_response(self) -> Response {
        let status = error_status(&self);
        if status.is_server_error() {
            warn!(error = %self, "pantry request failed");
        }
        let payload = json!({ "error": self.to_string() });
        (status, axum::Json(payload)).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignInRequest {
    #[serde(flatten)]
    pub(crate) profile: Profile,
    #[serde(default)]
    pub(crate) prior_donations: u32,
}

pub(crate) async fn sign_in_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    axum::Json(request): axum::Json<SignInRequest>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let mut profile = request.profile;
    let needs_coordinates = profile.coordinates().is_none()
        && matches!(profile, Profile::Hotel(_) | Profile::FoodBank(_));
    if needs_coordinates {
        if let Some(location) = profile.location().map(str::to_string) {
            // Best effort; the session still opens without coordinates.
            match state.collaborators.geocode(&location).await {
                Ok(point) => profile.set_coordinates(point.latitude, point.longitude),
                Err(err) => warn!(%location, error = %err, "geocoding failed during sign in"),
            }
        }
    }

    let mut pantry = lock(&state.pantry)?;
    let profile = pantry.sign_in(profile, request.prior_donations)?.clone();
    let membership = pantry.membership();
    let payload = json!({ "profile": profile, "membership": membership });
    Ok((StatusCode::OK, axum::Json(payload)).into_response())
}

pub(crate) async fn sign_out_handler<R, C>(
    State(state): State<PantryState<R, C>>,
) -> Result<StatusCode, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    lock(&state.pantry)?.sign_out();
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct InventoryQuery {
    pub(crate) category: Option<FoodCategory>,
    pub(crate) search: Option<String>,
}

pub(crate) async fn list_inventory_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    Query(query): Query<InventoryQuery>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let pantry = lock(&state.pantry)?;
    let inventory = pantry.inventory();
    let mut items = match query.search.as_deref() {
        Some(search) if !search.trim().is_empty() => inventory.search(search),
        _ => inventory.by_category(None),
    };
    if let Some(category) = query.category {
        items.retain(|item| item.category == category);
    }
    let payload = json!({ "items": items, "categories": inventory.categories() });
    Ok((StatusCode::OK, axum::Json(payload)).into_response())
}

pub(crate) async fn add_item_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    axum::Json(item): axum::Json<NewInventoryItem>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    crate::validation::require(&item.name, "name")?;
    let stored = lock(&state.pantry)?.add_item(item);
    Ok((StatusCode::CREATED, axum::Json(stored)).into_response())
}

pub(crate) async fn add_batch_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    axum::Json(items): axum::Json<Vec<NewInventoryItem>>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    for item in &items {
        crate::validation::require(&item.name, "name")?;
    }
    let stored = lock(&state.pantry)?.add_items(items);
    Ok((StatusCode::CREATED, axum::Json(json!({ "items": stored }))).into_response())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScanRequest {
    pub(crate) image_base64: String,
}

pub(crate) async fn scan_receipt_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    axum::Json(request): axum::Json<ScanRequest>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let scanned = state
        .collaborators
        .extract_items(&request.image_base64)
        .await?;
    let stored = lock(&state.pantry)?.add_items(scanned);
    Ok((StatusCode::CREATED, axum::Json(json!({ "items": stored }))).into_response())
}

pub(crate) async fn remove_item_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    Path(item_id): Path<String>,
) -> Result<StatusCode, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    lock(&state.pantry)?.remove_item(&InventoryItemId(item_id));
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TodayQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

impl TodayQuery {
    fn resolve(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

pub(crate) async fn classification_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    Query(query): Query<TodayQuery>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let today = query.resolve();
    let pantry = lock(&state.pantry)?;
    let classification = pantry.classify(today);
    let summary = classification.summary(pantry.inventory().len());
    let payload = json!({ "classification": classification, "summary": summary });
    Ok((StatusCode::OK, axum::Json(payload)).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DonationQuery {
    #[serde(default)]
    pub(crate) view: DonationView,
    pub(crate) status: Option<DonationStatus>,
}

pub(crate) async fn list_donations_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    Query(query): Query<DonationQuery>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let mut requests = lock(&state.pantry)?.donations_in_view(query.view)?;
    if let Some(status) = query.status {
        requests.retain(|request| request.status == status);
    }
    Ok((StatusCode::OK, axum::Json(json!({ "requests": requests }))).into_response())
}

pub(crate) async fn donate_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    axum::Json(selection): axum::Json<DonationSelection>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let mut pantry = lock(&state.pantry)?;
    let request = pantry.donate(selection)?;
    let payload = json!({ "request": request, "membership": pantry.membership() });
    Ok((StatusCode::CREATED, axum::Json(payload)).into_response())
}

pub(crate) async fn transition_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    Path((donation_id, action)): Path<(String, DonationAction)>,
    Query(query): Query<TodayQuery>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let id = DonationRequestId(donation_id);
    let today = query.resolve();
    let outcome = lock(&state.pantry)?.transition(&id, action, today)?;
    Ok((StatusCode::OK, axum::Json(outcome)).into_response())
}

pub(crate) async fn membership_handler<R, C>(
    State(state): State<PantryState<R, C>>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let pantry = lock(&state.pantry)?;
    match pantry.membership() {
        Some(status) => Ok((StatusCode::OK, axum::Json(status)).into_response()),
        None => Err(match pantry.profile() {
            Some(profile) => PantryError::WrongRole {
                expected: "hotel",
                actual: profile.role_label(),
            },
            None => PantryError::NotSignedIn,
        }),
    }
}

pub(crate) async fn partners_handler<R, C>(
    State(state): State<PantryState<R, C>>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let partners = lock(&state.pantry)?.partner_summaries()?;
    Ok((StatusCode::OK, axum::Json(json!({ "partners": partners }))).into_response())
}

pub(crate) async fn partner_history_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    Path(partner): Path<String>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let history = lock(&state.pantry)?.partner_history(&partner)?;
    let payload = json!({ "partner": partner, "donations": history });
    Ok((StatusCode::OK, axum::Json(payload)).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LocationQuery {
    pub(crate) location: Option<String>,
}

/// Food banks a hotel can pick as the recipient of a donation.
pub(crate) async fn food_banks_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    Query(query): Query<LocationQuery>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let location = resolve_location(&state.pantry, query.location)?;
    let food_banks = state.collaborators.nearby_food_banks(&location).await?;
    let payload = json!({ "location": location, "foodBanks": food_banks });
    Ok((StatusCode::OK, axum::Json(payload)).into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct BusinessNameQuery {
    pub(crate) location: String,
    pub(crate) kind: BusinessKind,
}

pub(crate) async fn business_names_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    Query(query): Query<BusinessNameQuery>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    crate::validation::require(&query.location, "location")?;
    let names = state
        .collaborators
        .business_names(&query.location, query.kind)
        .await?;
    Ok((StatusCode::OK, axum::Json(json!({ "names": names }))).into_response())
}

pub(crate) async fn list_requirements_handler<R, C>(
    State(state): State<PantryState<R, C>>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let pantry = lock(&state.pantry)?;
    let payload = json!({ "requests": pantry.requirements() });
    Ok((StatusCode::OK, axum::Json(payload)).into_response())
}

pub(crate) async fn broadcast_requirement_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    axum::Json(draft): axum::Json<RequirementDraft>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let request = lock(&state.pantry)?.broadcast_requirement(draft, Utc::now())?;
    Ok((StatusCode::CREATED, axum::Json(request)).into_response())
}

pub(crate) async fn shopping_list_handler<R, C>(
    State(state): State<PantryState<R, C>>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let pantry = lock(&state.pantry)?;
    let payload = json!({ "items": pantry.shopping().items() });
    Ok((StatusCode::OK, axum::Json(payload)).into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct ManualShoppingEntry {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) quantity: String,
    #[serde(default)]
    pub(crate) notes: Option<String>,
}

pub(crate) async fn add_shopping_item_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    axum::Json(entry): axum::Json<ManualShoppingEntry>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let item = lock(&state.pantry)?
        .shopping_mut()
        .add_manual(&entry.name, &entry.quantity, entry.notes)?;
    Ok((StatusCode::CREATED, axum::Json(item)).into_response())
}

pub(crate) async fn update_shopping_item_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    Path(entry_id): Path<String>,
    axum::Json(update): axum::Json<ShoppingListUpdate>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let mut pantry = lock(&state.pantry)?;
    let updated: Option<ShoppingListItem> =
        pantry.shopping_mut().update(&entry_id, update).cloned();
    Ok(match updated {
        Some(item) => (StatusCode::OK, axum::Json(item)).into_response(),
        None => {
            let payload = json!({ "error": format!("shopping list entry {entry_id} not found") });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    })
}

pub(crate) async fn remove_shopping_item_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    Path(entry_id): Path<String>,
) -> Result<StatusCode, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    lock(&state.pantry)?.shopping_mut().remove(&entry_id);
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn shopping_suggestions_handler<R, C>(
    State(state): State<PantryState<R, C>>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let snapshot = lock(&state.pantry)?.inventory().items().to_vec();
    let suggestions = state.collaborators.shopping_suggestions(&snapshot).await?;

    let mut pantry = lock(&state.pantry)?;
    let added = pantry.shopping_mut().apply_suggestions(suggestions);
    let payload = json!({ "added": added, "items": pantry.shopping().items() });
    Ok((StatusCode::OK, axum::Json(payload)).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SmartRecipeRequest {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) language: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SmartRecipeResponse {
    pub(crate) food_items: Vec<String>,
    pub(crate) recipes: Vec<Recipe>,
}

/// Recipes built around whatever is about to expire.
pub(crate) async fn smart_recipes_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    axum::Json(request): axum::Json<SmartRecipeRequest>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let today = request.today.unwrap_or_else(|| Local::now().date_naive());
    let (food_items, profile) = {
        let pantry = lock(&state.pantry)?;
        let names: Vec<String> = pantry
            .classify(today)
            .expiring_soon
            .into_iter()
            .map(|item| item.name)
            .collect();
        let profile = match pantry.profile() {
            Some(Profile::Public(user)) => Some(user.clone()),
            _ => None,
        };
        (names, profile)
    };

    if food_items.is_empty() {
        let payload = SmartRecipeResponse {
            food_items,
            recipes: Vec::new(),
        };
        return Ok((StatusCode::OK, axum::Json(payload)).into_response());
    }

    let language = Language::from_code(request.language.as_deref());
    let recipes = state
        .collaborators
        .smart_recipes(&food_items, profile.as_ref(), language)
        .await?;
    let payload = SmartRecipeResponse {
        food_items,
        recipes,
    };
    Ok((StatusCode::OK, axum::Json(payload)).into_response())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SmartPlateRequest {
    pub(crate) item_ids: Vec<InventoryItemId>,
    #[serde(default)]
    pub(crate) language: Option<String>,
}

/// A balanced plate built from the chosen inventory rows.
pub(crate) async fn smart_plate_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    axum::Json(request): axum::Json<SmartPlateRequest>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let (food_items, profile) = {
        let pantry = lock(&state.pantry)?;
        let names: Vec<String> = request
            .item_ids
            .iter()
            .filter_map(|id| pantry.inventory().get(id))
            .map(|item| item.name.clone())
            .collect();
        let profile = match pantry.profile() {
            Some(Profile::Public(user)) => Some(user.clone()),
            _ => None,
        };
        (names, profile)
    };
    if food_items.is_empty() {
        return Err(ValidationError::MissingField("items").into());
    }

    let language = Language::from_code(request.language.as_deref());
    let plate = state
        .collaborators
        .smart_plate(&food_items, profile.as_ref(), language)
        .await?;
    Ok((StatusCode::OK, axum::Json(json!({ "plate": plate }))).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LanguageQuery {
    pub(crate) language: Option<String>,
}

pub(crate) async fn learning_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    Path(topic): Path<LearningTopic>,
    Query(query): Query<LanguageQuery>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let language = Language::from_code(query.language.as_deref());
    let module = state.collaborators.learning_module(topic, language).await?;
    Ok((StatusCode::OK, axum::Json(module)).into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpeechRequest {
    pub(crate) text: String,
}

/// Read a recipe aloud. The body is raw audio.
pub(crate) async fn speech_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    axum::Json(request): axum::Json<SpeechRequest>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    crate::validation::require(&request.text, "text")?;
    let audio = state.collaborators.synthesize(&request.text).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/octet-stream")],
        audio,
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VideoRequest {
    pub(crate) prompt: String,
    #[serde(default)]
    pub(crate) aspect_ratio: AspectRatio,
}

pub(crate) async fn video_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    axum::Json(request): axum::Json<VideoRequest>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    crate::validation::require(&request.prompt, "prompt")?;
    let url = state
        .collaborators
        .generate_video(&request.prompt, request.aspect_ratio)
        .await?;
    Ok((StatusCode::OK, axum::Json(json!({ "videoUrl": url }))).into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct HotspotQuery {
    pub(crate) location: Option<String>,
    #[serde(default = "default_map_width")]
    pub(crate) width: f64,
    #[serde(default = "default_map_height")]
    pub(crate) height: f64,
    #[serde(default = "default_map_padding")]
    pub(crate) padding: f64,
}

fn default_map_width() -> f64 {
    600.0
}

fn default_map_height() -> f64 {
    400.0
}

fn default_map_padding() -> f64 {
    20.0
}

#[derive(Debug, Serialize)]
pub(crate) struct HotspotResponse {
    pub(crate) center: GeoLocation,
    pub(crate) hotspots: Vec<WasteHotspot>,
    pub(crate) points: Vec<ProjectedPoint>,
}

/// Nearby surplus hotspots around the given location, or the signed-in
/// profile's location when none is given.
pub(crate) async fn hotspots_handler<R, C>(
    State(state): State<PantryState<R, C>>,
    Query(query): Query<HotspotQuery>,
) -> Result<Response, PantryError>
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let location = resolve_location(&state.pantry, query.location)?;

    let center = state.collaborators.geocode(&location).await?;
    let hotspots = state.collaborators.waste_hotspots(&location).await?;
    let viewport = Viewport {
        width: query.width,
        height: query.height,
        padding: query.padding,
    };
    let points = project_points(center, &hotspots, viewport);

    let payload = HotspotResponse {
        center,
        hotspots,
        points,
    };
    Ok((StatusCode::OK, axum::Json(payload)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::DemoCollaborators;
    use crate::workflows::donation::{InMemoryDonationRepository, TransitionPolicy};
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    fn router(policy: TransitionPolicy) -> (Router, SharedPantry<InMemoryDonationRepository>) {
        let pantry = Pantry::new(Arc::new(InMemoryDonationRepository::default()), policy)
            .into_shared();
        let router = pantry_router(pantry.clone(), Arc::new(DemoCollaborators::instant()));
        (router, pantry)
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&value).unwrap())
            }
            None => Body::empty(),
        };
        router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn read_json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("valid json")
    }

    fn hotel_session() -> Value {
        json!({
            "role": "hotel",
            "profile": {
                "name": "The Grand Eatery",
                "location": "New York, USA",
                "email": "contact@grandeatery.com"
            }
        })
    }

    fn food_bank_session() -> Value {
        json!({
            "role": "food-bank",
            "profile": {
                "name": "City Harvest",
                "location": "New York, USA",
                "email": "ops@cityharvest.org"
            }
        })
    }

    fn stock(pantry: &SharedPantry<InMemoryDonationRepository>, name: &str) -> InventoryItemId {
        pantry
            .lock()
            .unwrap()
            .add_item(NewInventoryItem::new(
                name,
                NaiveDate::from_ymd_opt(2024, 7, 18).unwrap(),
                "20 lbs",
                FoodCategory::Produce,
            ))
            .id
    }

    async fn donate(router: &Router, item: &InventoryItemId) -> String {
        let created = send(
            router,
            "POST",
            "/api/v1/donations",
            Some(json!({ "itemIds": [item], "ngoName": "City Harvest" })),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let body = read_json_body(created).await;
        body["request"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn donor_counter_saturates_without_poisoning_state() {
        let (router, pantry) = router(TransitionPolicy::Lenient);
        let mut session = hotel_session();
        session["priorDonations"] = json!(u32::MAX);
        let signed_in = send(&router, "POST", "/api/v1/session", Some(session)).await;
        assert_eq!(signed_in.status(), StatusCode::OK);

        let item = stock(&pantry, "Potatoes");
        donate(&router, &item).await;

        let membership = send(&router, "GET", "/api/v1/membership", None).await;
        assert_eq!(membership.status(), StatusCode::OK);
        let body = read_json_body(membership).await;
        assert_eq!(body["donationCount"], u32::MAX);
        assert_eq!(body["tier"], "Diamond");

        let inventory = send(&router, "GET", "/api/v1/inventory", None).await;
        assert_eq!(inventory.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn only_food_banks_broadcast_requirements() {
        let (router, _) = router(TransitionPolicy::Lenient);
        let draft = json!({ "requestedItems": ["Rice", "Beans"], "message": "Weekend drive" });

        let anonymous = send(&router, "POST", "/api/v1/requirements", Some(draft.clone())).await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        send(&router, "POST", "/api/v1/session", Some(hotel_session())).await;
        let hotel = send(&router, "POST", "/api/v1/requirements", Some(draft.clone())).await;
        assert_eq!(hotel.status(), StatusCode::FORBIDDEN);

        send(&router, "POST", "/api/v1/session", Some(food_bank_session())).await;
        let created = send(&router, "POST", "/api/v1/requirements", Some(draft)).await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let body = read_json_body(created).await;
        assert_eq!(body["foodBankName"], "City Harvest");
        assert_eq!(body["foodBankLocation"], "New York, USA");

        let listed = send(&router, "GET", "/api/v1/requirements", None).await;
        let body = read_json_body(listed).await;
        assert_eq!(body["requests"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn dashboard_views_slice_the_history() {
        let (router, pantry) = router(TransitionPolicy::Lenient);
        send(&router, "POST", "/api/v1/session", Some(hotel_session())).await;
        let first = donate(&router, &stock(&pantry, "Potatoes")).await;
        donate(&router, &stock(&pantry, "Onions")).await;

        send(&router, "POST", &format!("/api/v1/donations/{first}/accept"), None).await;

        let count = |body: &Value| body["requests"].as_array().unwrap().len();
        let mine = send(&router, "GET", "/api/v1/donations?view=mine", None).await;
        assert_eq!(count(&read_json_body(mine).await), 2);
        let pending = send(&router, "GET", "/api/v1/donations?view=pending", None).await;
        assert_eq!(count(&read_json_body(pending).await), 1);
        let active = send(&router, "GET", "/api/v1/donations?view=active", None).await;
        let body = read_json_body(active).await;
        assert_eq!(count(&body), 1);
        assert_eq!(body["requests"][0]["id"], first.as_str());

        let history_uri = "/api/v1/partners/The%20Grand%20Eatery/history";
        let before = read_json_body(send(&router, "GET", history_uri, None).await).await;
        assert_eq!(before["donations"], json!([]));

        send(
            &router,
            "POST",
            &format!("/api/v1/donations/{first}/complete?today=2024-07-16"),
            None,
        )
        .await;
        let after = read_json_body(send(&router, "GET", history_uri, None).await).await;
        assert_eq!(after["partner"], "The Grand Eatery");
        assert_eq!(after["donations"][0]["donationDate"], "2024-07-16");

        send(&router, "POST", "/api/v1/session", Some(food_bank_session())).await;
        let mine = send(&router, "GET", "/api/v1/donations?view=mine", None).await;
        assert_eq!(mine.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn food_banks_default_to_the_session_location() {
        let (router, _) = router(TransitionPolicy::Lenient);
        let missing = send(&router, "GET", "/api/v1/food-banks", None).await;
        assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);

        send(&router, "POST", "/api/v1/session", Some(hotel_session())).await;
        let response = send(&router, "GET", "/api/v1/food-banks", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["location"], "New York, USA");
        assert_eq!(body["foodBanks"][0]["name"], "City Harvest");
        assert_eq!(body["foodBanks"].as_array().unwrap().len(), 3);

        let names = send(
            &router,
            "GET",
            "/api/v1/business-names?location=Denver&kind=restaurant",
            None,
        )
        .await;
        let body = read_json_body(names).await;
        assert_eq!(body["names"][0], "The Corner Bistro");
    }

    #[tokio::test]
    async fn smart_plate_uses_the_selected_items() {
        let (router, pantry) = router(TransitionPolicy::Lenient);
        let empty = send(
            &router,
            "POST",
            "/api/v1/smart-plate",
            Some(json!({ "itemIds": ["item-999999"] })),
        )
        .await;
        assert_eq!(empty.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let spinach = stock(&pantry, "Spinach");
        let response = send(
            &router,
            "POST",
            "/api/v1/smart-plate",
            Some(json!({ "itemIds": [spinach], "language": "fr" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["plate"]["calories"], 550);
        assert_eq!(body["plate"]["ingredients"][0], "Spinach");
        assert_eq!(body["plate"]["nutrition"]["vitaminsAndMinerals"], 5);
    }

    #[tokio::test]
    async fn learning_modules_are_served_per_topic() {
        let (router, _) = router(TransitionPolicy::Lenient);
        let response = send(&router, "GET", "/api/v1/learning/food-storage?language=ta", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["cards"].as_array().unwrap().len(), 3);
        assert_eq!(body["quiz"][0]["correctAnswer"], "In a cool, dark place");

        let unknown = send(&router, "GET", "/api/v1/learning/composting", None).await;
        assert!(unknown.status().is_client_error());
    }

    #[tokio::test]
    async fn disabled_media_surfaces_as_bad_gateway() {
        let (router, _) = router(TransitionPolicy::Lenient);
        let speech = send(
            &router,
            "POST",
            "/api/v1/media/speech",
            Some(json!({ "text": "Preheat the oven." })),
        )
        .await;
        assert_eq!(speech.status(), StatusCode::BAD_GATEWAY);
        let body = read_json_body(speech).await;
        assert_eq!(body["error"], "Speech generation is disabled in this demo version.");

        let video = send(
            &router,
            "POST",
            "/api/v1/media/video",
            Some(json!({ "prompt": "stir-fry", "aspectRatio": "9:16" })),
        )
        .await;
        assert_eq!(video.status(), StatusCode::BAD_GATEWAY);
        let body = read_json_body(video).await;
        assert_eq!(
            body["error"],
            "Video generation is temporarily disabled in this demo version."
        );

        let blank = send(&router, "POST", "/api/v1/media/speech", Some(json!({ "text": " " }))).await;
        assert_eq!(blank.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn classification_route_uses_the_requested_day() {
        let (router, _) = router(TransitionPolicy::Lenient);
        let created = send(
            &router,
            "POST",
            "/api/v1/inventory",
            Some(json!({
                "name": "Milk",
                "expiryDate": "2024-07-18",
                "quantity": "1 gallon",
                "category": "Dairy"
            })),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);

        let response = send(
            &router,
            "GET",
            "/api/v1/inventory/classification?today=2024-07-15",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["summary"]["expiring_soon_count"], 1);
        assert_eq!(body["classification"]["expired"], json!([]));
    }

    #[tokio::test]
    async fn malformed_expiry_dates_are_rejected() {
        let (router, pantry) = router(TransitionPolicy::Lenient);
        let response = send(
            &router,
            "POST",
            "/api/v1/inventory",
            Some(json!({
                "name": "Milk",
                "expiryDate": "18/07/2024",
                "quantity": "1 gallon",
                "category": "Dairy"
            })),
        )
        .await;
        assert!(response.status().is_client_error());
        assert!(pantry.lock().unwrap().inventory().is_empty());
    }

    #[tokio::test]
    async fn donate_route_requires_a_session() {
        let (router, _) = router(TransitionPolicy::Lenient);
        let response = send(
            &router,
            "POST",
            "/api/v1/donations",
            Some(json!({ "itemIds": ["item-000001"], "ngoName": "City Harvest" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn donate_route_reports_validation_errors() {
        let (router, _) = router(TransitionPolicy::Lenient);
        let signed_in = send(&router, "POST", "/api/v1/session", Some(hotel_session())).await;
        assert_eq!(signed_in.status(), StatusCode::OK);
        let body = read_json_body(signed_in).await;
        assert_eq!(body["profile"]["profile"]["latitude"], 40.7128);

        let response = send(
            &router,
            "POST",
            "/api/v1/donations",
            Some(json!({ "itemIds": [], "ngoName": "City Harvest" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_json_body(response).await;
        assert_eq!(body["error"], "select at least one item to donate");
    }

    #[tokio::test]
    async fn strict_transitions_map_to_conflict_and_not_found() {
        let (router, pantry) = router(TransitionPolicy::Strict);
        send(&router, "POST", "/api/v1/session", Some(hotel_session())).await;
        let item = {
            let mut guard = pantry.lock().unwrap();
            guard.add_item(NewInventoryItem::new(
                "Bread",
                NaiveDate::from_ymd_opt(2024, 7, 16).unwrap(),
                "2 loaves",
                FoodCategory::Bakery,
            ))
        };
        let created = send(
            &router,
            "POST",
            "/api/v1/donations",
            Some(json!({ "itemIds": [item.id], "ngoName": "City Harvest" })),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let body = read_json_body(created).await;
        let id = body["request"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["membership"]["tier"], "Silver");

        let complete_early = send(
            &router,
            "POST",
            &format!("/api/v1/donations/{id}/complete?today=2024-07-16"),
            None,
        )
        .await;
        assert_eq!(complete_early.status(), StatusCode::CONFLICT);

        let missing = send(&router, "POST", "/api/v1/donations/don-999999/accept", None).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let accepted = send(
            &router,
            "POST",
            &format!("/api/v1/donations/{id}/accept"),
            None,
        )
        .await;
        assert_eq!(accepted.status(), StatusCode::OK);
        let body = read_json_body(accepted).await;
        assert_eq!(body["outcome"], "applied");
        assert_eq!(body["request"]["status"], "accepted");
    }

    #[tokio::test]
    async fn lenient_transitions_report_ignored_outcomes() {
        let (router, _) = router(TransitionPolicy::Lenient);
        let response = send(&router, "POST", "/api/v1/donations/don-000042/decline", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["outcome"], "missing");
    }

    #[tokio::test]
    async fn suggestions_replace_generated_shopping_entries() {
        let (router, _) = router(TransitionPolicy::Lenient);
        send(
            &router,
            "POST",
            "/api/v1/shopping-list",
            Some(json!({ "name": "Coffee", "quantity": "1 bag" })),
        )
        .await;
        send(&router, "POST", "/api/v1/shopping-list/suggestions", None).await;
        let response = send(&router, "POST", "/api/v1/shopping-list/suggestions", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json_body(response).await;
        assert_eq!(body["added"], 5);
        assert_eq!(body["items"].as_array().unwrap().len(), 6);
        assert_eq!(body["items"][0]["name"], "Coffee");
    }

    #[tokio::test]
    async fn hotspots_are_projected_into_the_viewport() {
        let (router, _) = router(TransitionPolicy::Lenient);
        let response = send(
            &router,
            "GET",
            "/api/v1/hotspots?location=New%20York&width=400&height=300",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["points"].as_array().unwrap().len(), 3);
        assert_eq!(body["points"][0]["kind"], "center");
    }

    #[tokio::test]
    async fn empty_receipts_are_rejected() {
        let (router, _) = router(TransitionPolicy::Lenient);
        let response = send(
            &router,
            "POST",
            "/api/v1/inventory/scan",
            Some(json!({ "imageBase64": "" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
