use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub value: String,
    pub created_at: OffsetDateTime,
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> Result<Vec<Preference>, sqlx::Error> {
    sqlx::query_as::<_, Preference>(
        r#"
        SELECT id, user_id, category, value, created_at
        FROM preferences
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn exists(
    db: &PgPool,
    user_id: Uuid,
    category: &str,
    value: &str,
) -> Result<bool, sqlx::Error> {
    let found: Option<Uuid> = sqlx::query_scalar(
        r#"
        SELECT id FROM preferences
        WHERE user_id = $1 AND category = $2 AND value = $3
        "#,
    )
    .bind(user_id)
    .bind(category)
    .bind(value)
    .fetch_optional(db)
    .await?;
    Ok(found.is_some())
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    category: &str,
    value: &str,
) -> Result<Preference, sqlx::Error> {
    sqlx::query_as::<_, Preference>(
        r#"
        INSERT INTO preferences (user_id, category, value)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, category, value, created_at
        "#,
    )
    .bind(user_id)
    .bind(category)
    .bind(value)
    .fetch_one(db)
    .await
}

pub async fn find(db: &PgPool, id: Uuid) -> Result<Option<Preference>, sqlx::Error> {
    sqlx::query_as::<_, Preference>(
        r#"
        SELECT id, user_id, category, value, created_at
        FROM preferences
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM preferences WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
