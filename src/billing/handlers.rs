use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{auth::AuthUser, error::ApiError, state::AppState};

use super::dto::{BillingEvent, SubscriptionStatusResponse};
use super::repo;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/billing/subscription", get(subscription_status))
        .route("/billing/webhook", post(billing_webhook))
}

#[instrument(skip(state))]
pub async fn subscription_status(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<SubscriptionStatusResponse>, ApiError> {
    let response = match repo::find_by_user(&state.db, user_id).await? {
        Some(sub) => SubscriptionStatusResponse::from_subscription(sub),
        None => SubscriptionStatusResponse::inactive(),
    };
    Ok(Json(response))
}

fn period_end(unix_seconds: i64) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::from_unix_timestamp(unix_seconds)
        .map_err(|_| ApiError::validation("Invalid current_period_end timestamp"))
}

/// Applies a provider-driven state transition. Signature verification
/// happens upstream; this endpoint only applies the transition. Updates
/// for an unknown customer reference are acknowledged and logged so the
/// provider does not retry forever.
#[instrument(skip(state, event))]
pub async fn billing_webhook(
    State(state): State<AppState>,
    Json(event): Json<BillingEvent>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match event {
        BillingEvent::CheckoutCompleted {
            user_id,
            customer_id,
            price_id,
            status,
            current_period_end,
        } => {
            let period_end = period_end(current_period_end)?;
            let sub = repo::upsert_for_user(
                &state.db,
                user_id,
                &customer_id,
                &price_id,
                &status,
                period_end,
            )
            .await?;
            info!(user_id = %user_id, customer_id = %customer_id, status = %sub.status,
                  "subscription created");
        }
        BillingEvent::SubscriptionUpdated {
            customer_id,
            status,
            current_period_end,
        } => {
            let period_end = period_end(current_period_end)?;
            match repo::apply_update(&state.db, &customer_id, &status, period_end).await? {
                Some(sub) => {
                    info!(customer_id = %customer_id, status = %sub.status, "subscription updated")
                }
                None => warn!(customer_id = %customer_id, "update for unknown customer"),
            }
        }
        BillingEvent::SubscriptionCanceled { customer_id } => {
            match repo::apply_cancel(&state.db, &customer_id).await? {
                Some(_) => info!(customer_id = %customer_id, "subscription canceled"),
                None => warn!(customer_id = %customer_id, "cancel for unknown customer"),
            }
        }
    }
    Ok(Json(json!({ "received": true })))
}
