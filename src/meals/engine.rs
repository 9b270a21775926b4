//! Recommendation core: candidate filtering, disqualification, scoring
//! and randomized top-K selection. Pure and database-free; the caller
//! loads preferences, history and catalog, and injects the random
//! source so selection is deterministic under test.

use std::cmp::Reverse;
use std::collections::HashSet;

use rand::Rng;
use uuid::Uuid;

use crate::preferences::dto::Category;
use crate::preferences::repo::Preference;

use super::repo::Meal;

/// Size of the slice the random pick draws from.
pub const TOP_K: usize = 10;

/// A user's preferences partitioned by category, lower-cased for
/// comparison against catalog text.
#[derive(Debug, Default, Clone)]
pub struct PreferenceProfile {
    pub liked: Vec<String>,
    pub disliked: Vec<String>,
    pub restrictions: Vec<String>,
    pub cuisines: Vec<String>,
}

impl PreferenceProfile {
    pub fn from_entries(entries: &[Preference]) -> Self {
        let mut profile = PreferenceProfile::default();
        for entry in entries {
            let value = entry.value.to_lowercase();
            match Category::parse(&entry.category) {
                Some(Category::LikedFood) => profile.liked.push(value),
                Some(Category::DislikedFood) => profile.disliked.push(value),
                Some(Category::DietaryRestriction) => profile.restrictions.push(value),
                Some(Category::CuisinePreference) => profile.cuisines.push(value),
                // Unknown rows are skipped rather than failing the request.
                None => {}
            }
        }
        profile
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisqualifyReason {
    RestrictionUnmet,
    DislikedIngredient,
    CuisineMismatch,
}

/// Per-candidate verdict. Disqualified candidates never reach scoring
/// or the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidacy {
    Qualified(u32),
    Disqualified(DisqualifyReason),
}

/// Applies the disqualification rules and scores survivors.
///
/// Restrictions and dislikes use case-insensitive substring matching to
/// tolerate free-text variance ("gluten-free" satisfies a meal tagged
/// "gluten-free-option"); cuisine preferences require an exact match on
/// the cuisine label. That asymmetry is deliberate.
///
/// Score is +1 per (liked value, ingredient) substring pair, cumulative
/// and uncapped. Cuisine match contributes no bonus.
pub fn evaluate(meal: &Meal, profile: &PreferenceProfile) -> Candidacy {
    let ingredients: Vec<String> = meal
        .ingredients
        .0
        .iter()
        .map(|i| i.to_lowercase())
        .collect();
    let tags: Vec<String> = meal
        .dietary_tags
        .0
        .iter()
        .map(|t| t.to_lowercase())
        .collect();

    // Every dietary restriction must be satisfied.
    let restriction_unmet = profile
        .restrictions
        .iter()
        .any(|r| !tags.iter().any(|t| t.contains(r.as_str())));
    if restriction_unmet {
        return Candidacy::Disqualified(DisqualifyReason::RestrictionUnmet);
    }

    // Any disliked value appearing in any ingredient disqualifies.
    let has_disliked = profile
        .disliked
        .iter()
        .any(|d| ingredients.iter().any(|i| i.contains(d.as_str())));
    if has_disliked {
        return Candidacy::Disqualified(DisqualifyReason::DislikedIngredient);
    }

    if !profile.cuisines.is_empty() {
        let cuisine = meal.cuisine.to_lowercase();
        if !profile.cuisines.iter().any(|c| *c == cuisine) {
            return Candidacy::Disqualified(DisqualifyReason::CuisineMismatch);
        }
    }

    let score = profile
        .liked
        .iter()
        .map(|liked| {
            ingredients
                .iter()
                .filter(|i| i.contains(liked.as_str()))
                .count() as u32
        })
        .sum();
    Candidacy::Qualified(score)
}

fn within_prep_limit(meal: &Meal, max_prep_time: Option<i32>) -> bool {
    match (max_prep_time, meal.prep_time) {
        // Null/zero prep time is unconstrained and always eligible.
        (Some(limit), Some(prep)) if prep > 0 => prep <= limit,
        _ => true,
    }
}

/// Produces one suggestion from the catalog, or `None` when nothing
/// qualifies. Survivors are stable-sorted by score descending (ties
/// keep catalog order) and the result is drawn uniformly at random
/// from the top min(TOP_K, n) slice.
pub fn recommend<'a, R: Rng>(
    catalog: &'a [Meal],
    profile: &PreferenceProfile,
    recent: &HashSet<Uuid>,
    max_prep_time: Option<i32>,
    rng: &mut R,
) -> Option<&'a Meal> {
    let mut qualified: Vec<(&Meal, u32)> = catalog
        .iter()
        .filter(|m| !recent.contains(&m.id))
        .filter(|m| within_prep_limit(m, max_prep_time))
        .filter_map(|m| match evaluate(m, profile) {
            Candidacy::Qualified(score) => Some((m, score)),
            Candidacy::Disqualified(_) => None,
        })
        .collect();

    if qualified.is_empty() {
        return None;
    }

    // sort_by_key is stable, so equal scores keep catalog order.
    qualified.sort_by_key(|(_, score)| Reverse(*score));
    let top = &qualified[..qualified.len().min(TOP_K)];
    Some(top[rng.gen_range(0..top.len())].0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use sqlx::types::Json;
    use time::OffsetDateTime;

    fn meal(name: &str, ingredients: &[&str], cuisine: &str, tags: &[&str], prep: i32) -> Meal {
        Meal {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            ingredients: Json(ingredients.iter().map(|s| s.to_string()).collect()),
            cuisine: cuisine.into(),
            dietary_tags: Json(tags.iter().map(|s| s.to_string()).collect()),
            prep_time: Some(prep),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn profile(liked: &[&str], disliked: &[&str], restrictions: &[&str], cuisines: &[&str]) -> PreferenceProfile {
        let lower = |vals: &[&str]| vals.iter().map(|s| s.to_lowercase()).collect();
        PreferenceProfile {
            liked: lower(liked),
            disliked: lower(disliked),
            restrictions: lower(restrictions),
            cuisines: lower(cuisines),
        }
    }

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn profile_partitions_and_lowercases_entries() {
        let entry = |category: &str, value: &str| Preference {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category: category.into(),
            value: value.into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let entries = vec![
            entry("liked_food", "Chicken"),
            entry("disliked_food", "Mushroom"),
            entry("dietary_restriction", "Vegan"),
            entry("cuisine_preference", "Italian"),
            entry("bogus_category", "ignored"),
        ];
        let profile = PreferenceProfile::from_entries(&entries);
        assert_eq!(profile.liked, vec!["chicken"]);
        assert_eq!(profile.disliked, vec!["mushroom"]);
        assert_eq!(profile.restrictions, vec!["vegan"]);
        assert_eq!(profile.cuisines, vec!["italian"]);
    }

    #[test]
    fn empty_profile_qualifies_everything_with_zero_score() {
        let m = meal("Stir Fry", &["Chicken breast", "Rice"], "Asian", &["high-protein"], 20);
        assert_eq!(evaluate(&m, &PreferenceProfile::default()), Candidacy::Qualified(0));
    }

    #[test]
    fn disliked_substring_disqualifies() {
        let m = meal("Risotto", &["Arborio rice", "Mushrooms"], "Italian", &[], 35);
        let p = profile(&[], &["mushroom"], &[], &[]);
        assert_eq!(
            evaluate(&m, &p),
            Candidacy::Disqualified(DisqualifyReason::DislikedIngredient)
        );
    }

    #[test]
    fn restrictions_all_required_with_substring_semantics() {
        let m = meal("Stir Fry", &["Chicken"], "Asian", &["gluten-free-option", "high-protein"], 20);
        // "gluten-free" matches tag "gluten-free-option" as a substring.
        let p = profile(&[], &[], &["gluten-free"], &[]);
        assert_eq!(evaluate(&m, &p), Candidacy::Qualified(0));
        // Both restrictions must hold; "vegan" is unmet.
        let p = profile(&[], &[], &["gluten-free", "vegan"], &[]);
        assert_eq!(
            evaluate(&m, &p),
            Candidacy::Disqualified(DisqualifyReason::RestrictionUnmet)
        );
    }

    #[test]
    fn cuisine_requires_exact_match() {
        let m = meal("Pasta", &["Pasta"], "Italian", &[], 25);
        let exact = profile(&[], &[], &[], &["italian"]);
        assert_eq!(evaluate(&m, &exact), Candidacy::Qualified(0));
        // Unlike restrictions, a cuisine prefix is not enough.
        let prefix = profile(&[], &[], &[], &["ital"]);
        assert_eq!(
            evaluate(&m, &prefix),
            Candidacy::Disqualified(DisqualifyReason::CuisineMismatch)
        );
    }

    #[test]
    fn score_counts_liked_ingredient_matches_cumulatively() {
        let m = meal(
            "Double Chicken",
            &["Chicken breast", "Chicken thighs", "Rice"],
            "Asian",
            &[],
            20,
        );
        let p = profile(&["chicken", "rice"], &[], &[], &[]);
        // chicken matches two ingredients, rice one.
        assert_eq!(evaluate(&m, &p), Candidacy::Qualified(3));
    }

    #[test]
    fn liked_and_disliked_scenario() {
        let a = meal("Meal A", &["chicken", "rice"], "Asian", &[], 20);
        let b = meal("Meal B", &["mushroom", "rice"], "Asian", &[], 20);
        let p = profile(&["chicken"], &["mushroom"], &[], &[]);
        assert_eq!(evaluate(&a, &p), Candidacy::Qualified(1));
        let catalog = vec![a.clone(), b];
        for seed in 0..50 {
            let picked = recommend(&catalog, &p, &HashSet::new(), None, &mut rng(seed))
                .expect("meal a qualifies");
            assert_eq!(picked.name, "Meal A");
        }
    }

    #[test]
    fn max_prep_time_excludes_slow_meals() {
        let slow = meal("Meal X", &["Beef"], "American", &[], 30);
        let fast = meal("Meal Y", &["Eggs"], "American", &[], 10);
        let mut unconstrained = meal("Meal Z", &["Tofu"], "Asian", &[], 0);
        unconstrained.prep_time = None;
        let catalog = vec![slow, fast, unconstrained];
        let p = PreferenceProfile::default();
        for seed in 0..50 {
            let picked = recommend(&catalog, &p, &HashSet::new(), Some(15), &mut rng(seed))
                .expect("fast meals qualify");
            assert_ne!(picked.name, "Meal X");
        }
    }

    #[test]
    fn zero_prep_time_always_within_limit() {
        let mut m = meal("Soup", &["Water"], "Asian", &[], 0);
        assert!(within_prep_limit(&m, Some(5)));
        m.prep_time = None;
        assert!(within_prep_limit(&m, Some(5)));
    }

    #[test]
    fn recent_meals_are_excluded_until_window_passes() {
        let recent_meal = meal("Meal Z", &["Rice"], "Asian", &[], 10);
        let other = meal("Other", &["Beans"], "Mexican", &[], 10);
        let catalog = vec![recent_meal.clone(), other];
        let p = PreferenceProfile::default();

        let recent: HashSet<Uuid> = [recent_meal.id].into_iter().collect();
        for seed in 0..50 {
            let picked = recommend(&catalog, &p, &recent, None, &mut rng(seed)).unwrap();
            assert_ne!(picked.id, recent_meal.id);
        }

        // Outside the window the tracker no longer reports it, so it is
        // eligible again.
        let mut seen_again = false;
        for seed in 0..50 {
            let picked = recommend(&catalog, &p, &HashSet::new(), None, &mut rng(seed)).unwrap();
            seen_again |= picked.id == recent_meal.id;
        }
        assert!(seen_again);
    }

    #[test]
    fn selection_restricted_to_top_k_slice() {
        // Eleven qualified meals with strictly descending scores; the
        // lowest scorer falls outside the top ten and must never win.
        let catalog: Vec<Meal> = (0..11)
            .map(|i| {
                let reps = 11 - i;
                let ingredients: Vec<String> =
                    (0..reps).map(|j| format!("chicken cut {j}")).collect();
                let refs: Vec<&str> = ingredients.iter().map(|s| s.as_str()).collect();
                meal(&format!("meal-{i}"), &refs, "Asian", &[], 10)
            })
            .collect();
        let p = profile(&["chicken"], &[], &[], &[]);
        for seed in 0..200 {
            let picked = recommend(&catalog, &p, &HashSet::new(), None, &mut rng(seed)).unwrap();
            assert_ne!(picked.name, "meal-10");
        }
    }

    #[test]
    fn ties_keep_catalog_order() {
        let a = meal("First", &["rice"], "Asian", &[], 10);
        let b = meal("Second", &["rice"], "Asian", &[], 10);
        let c = meal("Scored", &["chicken"], "Asian", &[], 10);
        let catalog = vec![a, b, c];
        let p = profile(&["chicken"], &[], &[], &[]);

        let mut qualified: Vec<(&Meal, u32)> = catalog
            .iter()
            .filter_map(|m| match evaluate(m, &p) {
                Candidacy::Qualified(s) => Some((m, s)),
                Candidacy::Disqualified(_) => None,
            })
            .collect();
        qualified.sort_by_key(|(_, s)| Reverse(*s));
        let names: Vec<&str> = qualified.iter().map(|(m, _)| m.name.as_str()).collect();
        assert_eq!(names, vec!["Scored", "First", "Second"]);
    }

    #[test]
    fn empty_or_fully_disqualified_catalog_yields_none() {
        let p = PreferenceProfile::default();
        assert!(recommend(&[], &p, &HashSet::new(), None, &mut rng(1)).is_none());

        let m = meal("Risotto", &["Mushrooms"], "Italian", &[], 35);
        let p = profile(&[], &["mushroom"], &[], &[]);
        assert!(recommend(&[m], &p, &HashSet::new(), None, &mut rng(1)).is_none());
    }

    #[test]
    fn uniform_pick_reaches_every_tied_candidate() {
        let catalog: Vec<Meal> = (0..3)
            .map(|i| meal(&format!("meal-{i}"), &["rice"], "Asian", &[], 10))
            .collect();
        let p = PreferenceProfile::default();
        let mut seen = HashSet::new();
        for seed in 0..100 {
            let picked = recommend(&catalog, &p, &HashSet::new(), None, &mut rng(seed)).unwrap();
            seen.insert(picked.name.clone());
        }
        assert_eq!(seen.len(), 3);
    }
}
