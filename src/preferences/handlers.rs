use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{auth::AuthUser, error::ApiError, state::AppState};

use super::dto::{AddPreferenceRequest, Category};
use super::repo::{self, Preference};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/preferences", get(list_preferences).post(add_preference))
        .route("/preferences/:id", axum::routing::delete(delete_preference))
}

#[instrument(skip(state))]
pub async fn list_preferences(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Preference>>, ApiError> {
    let preferences = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(preferences))
}

#[instrument(skip(state, payload))]
pub async fn add_preference(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddPreferenceRequest>,
) -> Result<(StatusCode, Json<Preference>), ApiError> {
    let category = Category::parse(&payload.category).ok_or_else(|| {
        warn!(category = %payload.category, "unknown preference category");
        ApiError::validation("Invalid preference category")
    })?;

    let value = payload.value.trim();
    if value.is_empty() {
        return Err(ApiError::validation("Preference value must not be empty"));
    }

    // Dedup on insert: a duplicate (category, value) would double-count
    // in scoring. A unique index backs this check against races.
    if repo::exists(&state.db, user_id, category.as_str(), value).await? {
        return Err(ApiError::validation("Preference already exists"));
    }

    let preference = repo::insert(&state.db, user_id, category.as_str(), value).await?;
    info!(user_id = %user_id, category = %category.as_str(), "preference added");
    Ok((StatusCode::CREATED, Json(preference)))
}

#[instrument(skip(state))]
pub async fn delete_preference(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let preference = repo::find(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Preference not found"))?;

    if preference.user_id != user_id {
        return Err(ApiError::Forbidden);
    }

    repo::delete(&state.db, id).await?;
    info!(user_id = %user_id, preference_id = %id, "preference deleted");
    Ok(Json(json!({ "message": "Preference deleted" })))
}
