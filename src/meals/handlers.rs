use std::collections::{HashMap, HashSet};

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{auth::AuthUser, error::ApiError, preferences, state::AppState};

use super::dto::{HistoryEntry, HistoryQuery, RateRequest, SuggestParams};
use super::engine::{self, PreferenceProfile};
use super::repo;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/meals/suggest", get(suggest_meal))
        .route("/meals/history", get(meal_history))
        .route("/meals/history/:id/rate", patch(rate_meal))
}

#[instrument(skip(state))]
pub async fn suggest_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<SuggestParams>,
) -> Result<Json<HistoryEntry>, ApiError> {
    if params.max_prep_time.is_some_and(|v| v < 0) {
        return Err(ApiError::validation("maxPrepTime must be non-negative"));
    }
    // Zero means unconstrained, same as absent.
    let max_prep_time = params.max_prep_time.filter(|v| *v > 0);

    let entries = preferences::repo::list_by_user(&state.db, user_id).await?;
    let profile = PreferenceProfile::from_entries(&entries);

    let recent = if params.exclude_recent {
        repo::recent_meal_ids(&state.db, user_id, state.config.suggest.recent_window_days).await?
    } else {
        HashSet::new()
    };

    let catalog = repo::catalog(&state.db).await?;
    let meal = {
        let mut rng = rand::thread_rng();
        engine::recommend(&catalog, &profile, &recent, max_prep_time, &mut rng).cloned()
    }
    .ok_or(ApiError::NoMatch)?;

    let entry = repo::record(&state.db, user_id, meal.id).await?;
    info!(user_id = %user_id, meal_id = %meal.id, meal = %meal.name, "meal suggested");
    Ok(Json(HistoryEntry::new(entry, meal)))
}

#[instrument(skip(state))]
pub async fn meal_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let limit = q.limit.clamp(1, 100);
    let entries = repo::list_entries(&state.db, user_id, limit).await?;

    let meal_ids: Vec<Uuid> = entries.iter().map(|e| e.meal_id).collect();
    let meals: HashMap<Uuid, repo::Meal> = repo::by_ids(&state.db, &meal_ids)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let history = entries
        .into_iter()
        .filter_map(|entry| match meals.get(&entry.meal_id) {
            Some(meal) => Some(HistoryEntry::new(entry, meal.clone())),
            None => {
                warn!(meal_id = %entry.meal_id, "history entry references missing meal");
                None
            }
        })
        .collect();
    Ok(Json(history))
}

#[instrument(skip(state, payload))]
pub async fn rate_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RateRequest>,
) -> Result<Json<HistoryEntry>, ApiError> {
    payload.validate()?;

    // Ownership is checked before any mutation.
    let entry = repo::find_entry(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Meal history not found"))?;
    if entry.user_id != user_id {
        return Err(ApiError::Forbidden);
    }

    let updated = repo::set_rating(&state.db, id, payload.rating).await?;
    let meal = repo::find_meal(&state.db, updated.meal_id)
        .await?
        .ok_or(ApiError::NotFound("Meal not found"))?;
    info!(user_id = %user_id, history_id = %id, rating = payload.rating, "meal rated");
    Ok(Json(HistoryEntry::new(updated, meal)))
}
