use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::AuthUser, error::ApiError, meals, state::AppState};

use super::dto::{CreateGroceryListRequest, UpdateGroceryListRequest};
use super::repo::{self, GroceryList};
use super::services::aggregate_items;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/grocery-lists",
            get(list_grocery_lists).post(create_grocery_list),
        )
        .route(
            "/grocery-lists/:id",
            axum::routing::patch(update_grocery_list),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_grocery_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateGroceryListRequest>,
) -> Result<(StatusCode, Json<GroceryList>), ApiError> {
    if payload.meal_ids.is_empty() {
        return Err(ApiError::validation("mealIds must not be empty"));
    }

    let found = meals::repo::by_ids(&state.db, &payload.meal_ids).await?;
    if found.is_empty() {
        return Err(ApiError::validation("No meals found for the given ids"));
    }

    // by_ids drops duplicate ids, so re-expand to honor repeats in the
    // requested set when counting quantities.
    let expanded: Vec<meals::repo::Meal> = payload
        .meal_ids
        .iter()
        .filter_map(|id| found.iter().find(|m| m.id == *id).cloned())
        .collect();
    let items = aggregate_items(&expanded);

    let list = repo::insert(&state.db, user_id, items).await?;
    info!(user_id = %user_id, list_id = %list.id, meals = expanded.len(), "grocery list created");
    Ok((StatusCode::CREATED, Json(list)))
}

#[instrument(skip(state))]
pub async fn list_grocery_lists(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<GroceryList>>, ApiError> {
    let lists = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(lists))
}

#[instrument(skip(state, payload))]
pub async fn update_grocery_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGroceryListRequest>,
) -> Result<Json<GroceryList>, ApiError> {
    // Ownership is checked before any mutation.
    let list = repo::find(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Grocery list not found"))?;
    if list.user_id != user_id {
        return Err(ApiError::Forbidden);
    }

    let updated = repo::update(&state.db, id, payload.items, payload.completed).await?;
    info!(user_id = %user_id, list_id = %id, "grocery list updated");
    Ok(Json(updated))
}
