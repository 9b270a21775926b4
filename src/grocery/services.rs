use std::collections::HashMap;

use crate::meals::repo::Meal;

use super::dto::GroceryItem;

/// The catalog carries no real quantity data, so merged items count
/// occurrences in servings.
const DEFAULT_UNIT: &str = "serving";

/// Merges the ingredient lists of the given meals into one shopping
/// list. The lower-cased name is the dedup key; the first-seen casing
/// is kept as the display form and repeats increment the quantity.
/// First-seen order is preserved.
pub fn aggregate_items(meals: &[Meal]) -> Vec<GroceryItem> {
    let mut items: Vec<GroceryItem> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for meal in meals {
        for ingredient in meal.ingredients.0.iter() {
            let key = ingredient.to_lowercase();
            match index.get(&key) {
                Some(&i) => items[i].quantity += 1,
                None => {
                    index.insert(key, items.len());
                    items.push(GroceryItem {
                        name: ingredient.clone(),
                        quantity: 1,
                        unit: DEFAULT_UNIT.into(),
                        checked: false,
                    });
                }
            }
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn meal(name: &str, ingredients: &[&str]) -> Meal {
        Meal {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            ingredients: Json(ingredients.iter().map(|s| s.to_string()).collect()),
            cuisine: "Asian".into(),
            dietary_tags: Json(vec![]),
            prep_time: Some(20),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn repeated_meal_counts_ingredients_twice() {
        let m = meal("Stir Fry", &["Chicken", "Rice"]);
        let items = aggregate_items(&[m.clone(), m]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Chicken");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].unit, "serving");
        assert!(!items[0].checked);
    }

    #[test]
    fn dedup_is_case_insensitive_keeping_first_seen_casing() {
        let a = meal("A", &["Chicken breast", "rice"]);
        let b = meal("B", &["chicken breast", "Rice"]);
        let items = aggregate_items(&[a, b]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Chicken breast");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[1].name, "rice");
        assert_eq!(items[1].quantity, 2);
    }

    #[test]
    fn preserves_first_seen_order_across_meals() {
        let a = meal("A", &["Garlic", "Onion"]);
        let b = meal("B", &["Lime", "Garlic"]);
        let names: Vec<String> = aggregate_items(&[a, b])
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Garlic", "Onion", "Lime"]);
    }

    #[test]
    fn no_meals_yield_no_items() {
        assert!(aggregate_items(&[]).is_empty());
    }
}
