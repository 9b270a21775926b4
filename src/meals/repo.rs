use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub ingredients: Json<Vec<String>>,
    pub cuisine: String,
    pub dietary_tags: Json<Vec<String>>,
    pub prep_time: Option<i32>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MealHistoryEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_id: Uuid,
    pub suggested_at: OffsetDateTime,
    pub rating: Option<i16>,
}

const MEAL_COLUMNS: &str =
    "id, name, description, ingredients, cuisine, dietary_tags, prep_time, created_at";

/// Full catalog snapshot in stable catalog order.
pub async fn catalog(db: &PgPool) -> Result<Vec<Meal>, sqlx::Error> {
    sqlx::query_as::<_, Meal>(&format!(
        "SELECT {MEAL_COLUMNS} FROM meals ORDER BY created_at, id"
    ))
    .fetch_all(db)
    .await
}

pub async fn by_ids(db: &PgPool, ids: &[Uuid]) -> Result<Vec<Meal>, sqlx::Error> {
    sqlx::query_as::<_, Meal>(&format!(
        "SELECT {MEAL_COLUMNS} FROM meals WHERE id = ANY($1) ORDER BY created_at, id"
    ))
    .bind(ids)
    .fetch_all(db)
    .await
}

pub async fn find_meal(db: &PgPool, id: Uuid) -> Result<Option<Meal>, sqlx::Error> {
    sqlx::query_as::<_, Meal>(&format!("SELECT {MEAL_COLUMNS} FROM meals WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Ids of meals suggested to the user within the trailing window,
/// cutoff inclusive at now - window_days.
pub async fn recent_meal_ids(
    db: &PgPool,
    user_id: Uuid,
    window_days: i64,
) -> Result<HashSet<Uuid>, sqlx::Error> {
    let cutoff = OffsetDateTime::now_utc() - Duration::days(window_days);
    let ids: Vec<Uuid> = sqlx::query_scalar(
        r#"
        SELECT meal_id FROM meal_history
        WHERE user_id = $1 AND suggested_at >= $2
        "#,
    )
    .bind(user_id)
    .bind(cutoff)
    .fetch_all(db)
    .await?;
    Ok(ids.into_iter().collect())
}

pub async fn record(
    db: &PgPool,
    user_id: Uuid,
    meal_id: Uuid,
) -> Result<MealHistoryEntry, sqlx::Error> {
    sqlx::query_as::<_, MealHistoryEntry>(
        r#"
        INSERT INTO meal_history (user_id, meal_id)
        VALUES ($1, $2)
        RETURNING id, user_id, meal_id, suggested_at, rating
        "#,
    )
    .bind(user_id)
    .bind(meal_id)
    .fetch_one(db)
    .await
}

pub async fn find_entry(db: &PgPool, id: Uuid) -> Result<Option<MealHistoryEntry>, sqlx::Error> {
    sqlx::query_as::<_, MealHistoryEntry>(
        r#"
        SELECT id, user_id, meal_id, suggested_at, rating
        FROM meal_history
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Overwrites the rating; re-rating is allowed.
pub async fn set_rating(
    db: &PgPool,
    id: Uuid,
    rating: i16,
) -> Result<MealHistoryEntry, sqlx::Error> {
    sqlx::query_as::<_, MealHistoryEntry>(
        r#"
        UPDATE meal_history
        SET rating = $2
        WHERE id = $1
        RETURNING id, user_id, meal_id, suggested_at, rating
        "#,
    )
    .bind(id)
    .bind(rating)
    .fetch_one(db)
    .await
}

pub async fn list_entries(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<MealHistoryEntry>, sqlx::Error> {
    sqlx::query_as::<_, MealHistoryEntry>(
        r#"
        SELECT id, user_id, meal_id, suggested_at, rating
        FROM meal_history
        WHERE user_id = $1
        ORDER BY suggested_at DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
}
