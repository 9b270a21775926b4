use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

use super::repo::{Meal, MealHistoryEntry};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestParams {
    #[serde(default = "default_true")]
    pub exclude_recent: bool,
    pub max_prep_time: Option<i32>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: i64,
}

fn default_history_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: i16,
}

impl RateRequest {
    /// Ratings live in [1, 5]; anything else is rejected before any
    /// entry is touched.
    pub fn validate(&self) -> Result<(), ApiError> {
        if (1..=5).contains(&self.rating) {
            Ok(())
        } else {
            Err(ApiError::validation("Rating must be between 1 and 5"))
        }
    }
}

/// Canonical response contract for suggestions, history listings and
/// rating updates: the history entry with its meal embedded.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_id: Uuid,
    pub suggested_at: OffsetDateTime,
    pub rating: Option<i16>,
    pub meal: Meal,
}

impl HistoryEntry {
    pub fn new(entry: MealHistoryEntry, meal: Meal) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            meal_id: entry.meal_id,
            suggested_at: entry.suggested_at,
            rating: entry.rating,
            meal,
        }
    }
}
