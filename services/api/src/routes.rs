use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use pantrix::collaborators::{Language, RecipeSuggester};
use pantrix::pantry::{pantry_router, PantryCollaborators, SharedPantry};
use pantrix::profile::UserProfile;
use pantrix::workflows::donation::DonationRepository;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecipeRequest {
    #[serde(default)]
    pub(crate) food_item: Option<String>,
    #[serde(default)]
    pub(crate) user_profile: Option<serde_json::Value>,
    #[serde(default)]
    pub(crate) language: Option<String>,
}

pub(crate) fn with_pantry_routes<R, C>(pantry: SharedPantry<R>, collaborators: Arc<C>) -> Router
where
    R: DonationRepository + 'static,
    C: PantryCollaborators + 'static,
{
    let recipes = Router::new()
        .route("/api/recipes", post(recipes_endpoint::<C>))
        .with_state(collaborators.clone());

    pantry_router(pantry, collaborators)
        .merge(recipes)
        .route("/", get(root))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn root() -> &'static str {
    "Pantrix Backend is running!"
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Proxy to the recipe collaborator for a single ingredient.
pub(crate) async fn recipes_endpoint<C>(
    State(suggester): State<Arc<C>>,
    Json(payload): Json<RecipeRequest>,
) -> Response
where
    C: RecipeSuggester + 'static,
{
    let Some(food_item) = payload
        .food_item
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
    else {
        let body = json!({ "error": "foodItem is required" });
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    };

    // Profiles are optional context; a malformed one is dropped, not rejected.
    let profile: Option<UserProfile> = payload
        .user_profile
        .and_then(|value| serde_json::from_value(value).ok());
    let language = Language::from_code(payload.language.as_deref());

    match suggester
        .suggest_recipes(&food_item, profile.as_ref(), language)
        .await
    {
        Ok(recipes) => (StatusCode::OK, Json(json!({ "recipes": recipes }))).into_response(),
        Err(err) => {
            error!(%food_item, error = %err, "recipe collaborator failed");
            let body = json!({ "error": "Failed to fetch recipes from AI model." });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
