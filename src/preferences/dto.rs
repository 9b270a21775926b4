use serde::Deserialize;

/// Closed set of preference categories. Stored as text; anything outside
/// this set is rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    LikedFood,
    DislikedFood,
    DietaryRestriction,
    CuisinePreference,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::LikedFood,
        Category::DislikedFood,
        Category::DietaryRestriction,
        Category::CuisinePreference,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Category::LikedFood => "liked_food",
            Category::DislikedFood => "disliked_food",
            Category::DietaryRestriction => "dietary_restriction",
            Category::CuisinePreference => "cuisine_preference",
        }
    }

    pub fn parse(s: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

#[derive(Debug, Deserialize)]
pub struct AddPreferenceRequest {
    pub category: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_category() {
        for c in Category::ALL {
            assert_eq!(Category::parse(c.as_str()), Some(c));
        }
    }

    #[test]
    fn rejects_unknown_categories() {
        assert_eq!(Category::parse("allergy"), None);
        assert_eq!(Category::parse("LIKED_FOOD"), None);
        assert_eq!(Category::parse(""), None);
    }
}
