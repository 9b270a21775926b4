use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub name: String,
    pub quantity: u32,
    pub unit: String,
    pub checked: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroceryListRequest {
    pub meal_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGroceryListRequest {
    pub items: Option<Vec<GroceryItem>>,
    pub completed: Option<bool>,
}
