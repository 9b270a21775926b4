use sqlx::{types::Json, PgPool};
use tracing::info;

struct SeedMeal {
    name: &'static str,
    description: &'static str,
    ingredients: &'static [&'static str],
    cuisine: &'static str,
    dietary_tags: &'static [&'static str],
    prep_time: i32,
}

const CATALOG: &[SeedMeal] = &[
    SeedMeal {
        name: "Chicken Stir Fry",
        description: "A quick and healthy Asian-style stir fry with tender chicken and crisp vegetables",
        ingredients: &[
            "Chicken breast", "Bell peppers", "Broccoli", "Carrots", "Soy sauce",
            "Garlic", "Ginger", "Sesame oil", "Rice",
        ],
        cuisine: "Asian",
        dietary_tags: &["gluten-free-option", "high-protein"],
        prep_time: 20,
    },
    SeedMeal {
        name: "Vegetarian Pasta Primavera",
        description: "Colorful pasta dish loaded with fresh seasonal vegetables",
        ingredients: &[
            "Pasta", "Zucchini", "Cherry tomatoes", "Bell peppers", "Garlic",
            "Olive oil", "Parmesan cheese", "Basil", "Cream",
        ],
        cuisine: "Italian",
        dietary_tags: &["vegetarian"],
        prep_time: 25,
    },
    SeedMeal {
        name: "Salmon with Quinoa",
        description: "Grilled salmon fillet served over fluffy quinoa with roasted vegetables",
        ingredients: &[
            "Salmon fillet", "Quinoa", "Asparagus", "Lemon", "Olive oil",
            "Garlic", "Cherry tomatoes", "Dill",
        ],
        cuisine: "Mediterranean",
        dietary_tags: &["gluten-free", "high-protein"],
        prep_time: 30,
    },
    SeedMeal {
        name: "Black Bean Tacos",
        description: "Delicious and filling tacos with seasoned black beans and fresh toppings",
        ingredients: &[
            "Black beans", "Corn tortillas", "Avocado", "Tomatoes", "Lettuce",
            "Lime", "Cilantro", "Cumin", "Onion",
        ],
        cuisine: "Mexican",
        dietary_tags: &["vegetarian", "vegan-option"],
        prep_time: 15,
    },
    SeedMeal {
        name: "Thai Green Curry",
        description: "Aromatic coconut curry with vegetables and Thai basil",
        ingredients: &[
            "Coconut milk", "Green curry paste", "Tofu", "Bamboo shoots", "Thai basil",
            "Bell peppers", "Eggplant", "Jasmine rice", "Lime",
        ],
        cuisine: "Thai",
        dietary_tags: &["vegan", "gluten-free"],
        prep_time: 25,
    },
    SeedMeal {
        name: "Greek Salad Bowl",
        description: "Fresh Mediterranean salad with feta, olives, and grilled chicken",
        ingredients: &[
            "Chicken breast", "Cucumbers", "Tomatoes", "Red onion", "Feta cheese",
            "Kalamata olives", "Olive oil", "Lemon", "Oregano",
        ],
        cuisine: "Greek",
        dietary_tags: &["gluten-free", "high-protein"],
        prep_time: 15,
    },
    SeedMeal {
        name: "Beef Burrito Bowl",
        description: "Hearty Mexican-style bowl with seasoned beef, rice, and toppings",
        ingredients: &[
            "Ground beef", "Rice", "Black beans", "Corn", "Tomatoes",
            "Lettuce", "Sour cream", "Cheese", "Salsa", "Avocado",
        ],
        cuisine: "Mexican",
        dietary_tags: &["gluten-free", "high-protein"],
        prep_time: 30,
    },
    SeedMeal {
        name: "Margherita Pizza",
        description: "Classic Italian pizza with fresh mozzarella, tomatoes, and basil",
        ingredients: &[
            "Pizza dough", "Tomato sauce", "Fresh mozzarella", "Fresh basil",
            "Olive oil", "Garlic", "Salt",
        ],
        cuisine: "Italian",
        dietary_tags: &["vegetarian"],
        prep_time: 20,
    },
    SeedMeal {
        name: "Teriyaki Tofu Bowl",
        description: "Crispy tofu glazed with teriyaki sauce over rice with vegetables",
        ingredients: &[
            "Firm tofu", "Teriyaki sauce", "Rice", "Broccoli", "Carrots",
            "Sesame seeds", "Green onions", "Ginger",
        ],
        cuisine: "Asian",
        dietary_tags: &["vegan", "vegetarian"],
        prep_time: 20,
    },
    SeedMeal {
        name: "Caesar Salad with Grilled Shrimp",
        description: "Classic Caesar salad topped with perfectly grilled shrimp",
        ingredients: &[
            "Shrimp", "Romaine lettuce", "Croutons", "Parmesan cheese",
            "Caesar dressing", "Lemon", "Black pepper", "Garlic",
        ],
        cuisine: "American",
        dietary_tags: &["high-protein"],
        prep_time: 15,
    },
    SeedMeal {
        name: "Mushroom Risotto",
        description: "Creamy Italian rice dish with earthy mushrooms and parmesan",
        ingredients: &[
            "Arborio rice", "Mushrooms", "Vegetable broth", "White wine",
            "Parmesan cheese", "Butter", "Onion", "Garlic", "Thyme",
        ],
        cuisine: "Italian",
        dietary_tags: &["vegetarian", "gluten-free"],
        prep_time: 35,
    },
    SeedMeal {
        name: "Spicy Korean Bibimbap",
        description: "Colorful rice bowl with vegetables, egg, and gochujang sauce",
        ingredients: &[
            "Rice", "Beef", "Spinach", "Bean sprouts", "Carrots",
            "Egg", "Gochujang", "Sesame oil", "Kimchi",
        ],
        cuisine: "Asian",
        dietary_tags: &["high-protein"],
        prep_time: 30,
    },
];

/// Seeds the meal catalog once; a non-empty table is left untouched.
pub async fn seed_catalog(db: &PgPool) -> anyhow::Result<()> {
    let existing: i64 = sqlx::query_scalar("SELECT count(*) FROM meals")
        .fetch_one(db)
        .await?;
    if existing > 0 {
        info!(meals = existing, "catalog already seeded, skipping");
        return Ok(());
    }

    for meal in CATALOG {
        let ingredients: Vec<String> = meal.ingredients.iter().map(|s| s.to_string()).collect();
        let tags: Vec<String> = meal.dietary_tags.iter().map(|s| s.to_string()).collect();
        sqlx::query(
            r#"
            INSERT INTO meals (name, description, ingredients, cuisine, dietary_tags, prep_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(meal.name)
        .bind(meal.description)
        .bind(Json(ingredients))
        .bind(meal.cuisine)
        .bind(Json(tags))
        .bind(meal.prep_time)
        .execute(db)
        .await?;
    }
    info!(meals = CATALOG.len(), "catalog seeded");
    Ok(())
}
