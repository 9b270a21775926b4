use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::GroceryItem;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GroceryList {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Json<Vec<GroceryItem>>,
    pub completed: bool,
    pub created_at: OffsetDateTime,
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    items: Vec<GroceryItem>,
) -> Result<GroceryList, sqlx::Error> {
    sqlx::query_as::<_, GroceryList>(
        r#"
        INSERT INTO grocery_lists (user_id, items)
        VALUES ($1, $2)
        RETURNING id, user_id, items, completed, created_at
        "#,
    )
    .bind(user_id)
    .bind(Json(items))
    .fetch_one(db)
    .await
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> Result<Vec<GroceryList>, sqlx::Error> {
    sqlx::query_as::<_, GroceryList>(
        r#"
        SELECT id, user_id, items, completed, created_at
        FROM grocery_lists
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn find(db: &PgPool, id: Uuid) -> Result<Option<GroceryList>, sqlx::Error> {
    sqlx::query_as::<_, GroceryList>(
        r#"
        SELECT id, user_id, items, completed, created_at
        FROM grocery_lists
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Merge-patch: absent fields keep their stored value.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    items: Option<Vec<GroceryItem>>,
    completed: Option<bool>,
) -> Result<GroceryList, sqlx::Error> {
    sqlx::query_as::<_, GroceryList>(
        r#"
        UPDATE grocery_lists
        SET items = COALESCE($2, items),
            completed = COALESCE($3, completed)
        WHERE id = $1
        RETURNING id, user_id, items, completed, created_at
        "#,
    )
    .bind(id)
    .bind(items.map(Json))
    .bind(completed)
    .fetch_one(db)
    .await
}
