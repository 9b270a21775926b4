use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider_customer_id: String,
    pub provider_price_id: Option<String>,
    pub status: String,
    pub current_period_end: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const COLUMNS: &str = "id, user_id, provider_customer_id, provider_price_id, status, \
                       current_period_end, created_at, updated_at";

pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> Result<Option<Subscription>, sqlx::Error> {
    sqlx::query_as::<_, Subscription>(&format!(
        "SELECT {COLUMNS} FROM subscriptions WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(db)
    .await
}

/// A user holds at most one subscription record, so checkout events
/// upsert on the user: re-subscribing after a cancel typically arrives
/// with a freshly minted customer reference, and conflicting on the
/// customer ref would trip the user_id unique constraint and turn a
/// replayable webhook into a 500. The new customer ref replaces the
/// old one; update/cancel events keep resolving by customer ref.
fn checkout_upsert_sql() -> String {
    format!(
        r#"
        INSERT INTO subscriptions
            (user_id, provider_customer_id, provider_price_id, status, current_period_end)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id) DO UPDATE
        SET provider_customer_id = EXCLUDED.provider_customer_id,
            provider_price_id = EXCLUDED.provider_price_id,
            status = EXCLUDED.status,
            current_period_end = EXCLUDED.current_period_end,
            updated_at = now()
        RETURNING {COLUMNS}
        "#
    )
}

pub async fn upsert_for_user(
    db: &PgPool,
    user_id: Uuid,
    customer_id: &str,
    price_id: &str,
    status: &str,
    current_period_end: OffsetDateTime,
) -> Result<Subscription, sqlx::Error> {
    sqlx::query_as::<_, Subscription>(&checkout_upsert_sql())
        .bind(user_id)
        .bind(customer_id)
        .bind(price_id)
        .bind(status)
        .bind(current_period_end)
        .fetch_one(db)
        .await
}

pub async fn apply_update(
    db: &PgPool,
    customer_id: &str,
    status: &str,
    current_period_end: OffsetDateTime,
) -> Result<Option<Subscription>, sqlx::Error> {
    sqlx::query_as::<_, Subscription>(&format!(
        r#"
        UPDATE subscriptions
        SET status = $2, current_period_end = $3, updated_at = now()
        WHERE provider_customer_id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(customer_id)
    .bind(status)
    .bind(current_period_end)
    .fetch_optional(db)
    .await
}

pub async fn apply_cancel(
    db: &PgPool,
    customer_id: &str,
) -> Result<Option<Subscription>, sqlx::Error> {
    sqlx::query_as::<_, Subscription>(&format!(
        r#"
        UPDATE subscriptions
        SET status = 'canceled', updated_at = now()
        WHERE provider_customer_id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(customer_id)
    .fetch_optional(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    // Re-subscribing after a cancel arrives with a new customer ref for
    // the same user; the checkout upsert must converge on the user's
    // single row instead of inserting a second one.
    #[test]
    fn checkout_upsert_conflicts_on_user_and_replaces_customer_ref() {
        let sql = checkout_upsert_sql();
        assert!(sql.contains("ON CONFLICT (user_id) DO UPDATE"));
        assert!(sql.contains("provider_customer_id = EXCLUDED.provider_customer_id"));
        assert!(!sql.contains("ON CONFLICT (provider_customer_id)"));
    }
}
