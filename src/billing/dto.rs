use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::Subscription;

/// Inbound billing event, already signature-verified upstream. Events
/// are keyed by the provider's customer reference because that is all
/// the provider payloads carry; only checkout completion also names the
/// internal user.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BillingEvent {
    CheckoutCompleted {
        user_id: Uuid,
        customer_id: String,
        price_id: String,
        status: String,
        current_period_end: i64,
    },
    SubscriptionUpdated {
        customer_id: String,
        status: String,
        current_period_end: i64,
    },
    SubscriptionCanceled {
        customer_id: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatusResponse {
    pub status: String,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_period_end: Option<OffsetDateTime>,
    pub subscription: Option<Subscription>,
}

impl SubscriptionStatusResponse {
    pub fn inactive() -> Self {
        Self {
            status: "inactive".into(),
            active: false,
            current_period_end: None,
            subscription: None,
        }
    }

    pub fn from_subscription(sub: Subscription) -> Self {
        Self {
            status: sub.status.clone(),
            active: sub.status == "active",
            current_period_end: sub.current_period_end,
            subscription: Some(sub),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_each_event_kind() {
        let checkout: BillingEvent = serde_json::from_str(
            r#"{
                "type": "checkout_completed",
                "user_id": "7f3c9a92-1f8e-4c2b-9d6a-0b5a4cbb2f11",
                "customer_id": "cus_123",
                "price_id": "price_123",
                "status": "active",
                "current_period_end": 1756200000
            }"#,
        )
        .unwrap();
        assert!(matches!(checkout, BillingEvent::CheckoutCompleted { .. }));

        let updated: BillingEvent = serde_json::from_str(
            r#"{"type": "subscription_updated", "customer_id": "cus_123",
                "status": "past_due", "current_period_end": 1756200000}"#,
        )
        .unwrap();
        assert!(matches!(updated, BillingEvent::SubscriptionUpdated { .. }));

        let canceled: BillingEvent = serde_json::from_str(
            r#"{"type": "subscription_canceled", "customer_id": "cus_123"}"#,
        )
        .unwrap();
        assert!(matches!(canceled, BillingEvent::SubscriptionCanceled { .. }));
    }

    #[test]
    fn unknown_event_kind_is_rejected() {
        let err = serde_json::from_str::<BillingEvent>(
            r#"{"type": "invoice_finalized", "customer_id": "cus_123"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn active_flag_follows_status_exactly() {
        let sub = |status: &str| Subscription {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            provider_customer_id: "cus_123".into(),
            provider_price_id: Some("price_123".into()),
            status: status.into(),
            current_period_end: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        assert!(SubscriptionStatusResponse::from_subscription(sub("active")).active);
        assert!(!SubscriptionStatusResponse::from_subscription(sub("past_due")).active);
        assert!(!SubscriptionStatusResponse::from_subscription(sub("canceled")).active);
        assert!(!SubscriptionStatusResponse::inactive().active);
    }
}
