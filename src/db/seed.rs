//! Starter catalog inserted into an empty database.

use anyhow::Result;
use tracing::info;

use super::Store;
use super::migrator::m20240102_seed_admin::BOOTSTRAP_ADMIN_USERNAME;
use crate::domain::UserId;
use crate::models::NewRecipe;

struct SampleRecipe {
    title: &'static str,
    description: &'static str,
    ingredients: &'static [&'static str],
    steps: &'static [&'static str],
    cooking_time: i32,
    difficulty: &'static str,
    category: &'static str,
    image_url: &'static str,
}

const SAMPLES: &[SampleRecipe] = &[
    SampleRecipe {
        title: "Pancakes with maple syrup",
        description: "Fluffy American-style pancakes",
        ingredients: &[
            "flour 200g",
            "milk 300ml",
            "eggs 2",
            "sugar 2 tbsp",
            "baking powder 2 tsp",
        ],
        steps: &[
            "Mix the dry ingredients",
            "Whisk in the eggs and milk",
            "Fry on a hot pan until golden",
        ],
        cooking_time: 20,
        difficulty: "Easy",
        category: "Breakfast",
        image_url: "/static/img/pancakes.jpg",
    },
    SampleRecipe {
        title: "Tomato soup",
        description: "Smooth roasted tomato soup",
        ingredients: &[
            "tomatoes 1kg",
            "onion 1",
            "garlic 3 cloves",
            "vegetable stock 500ml",
            "olive oil 2 tbsp",
        ],
        steps: &[
            "Roast the tomatoes, onion and garlic",
            "Simmer with the stock for 15 minutes",
            "Blend until smooth and season",
        ],
        cooking_time: 45,
        difficulty: "Easy",
        category: "Lunch",
        image_url: "/static/img/tomato-soup.jpg",
    },
    SampleRecipe {
        title: "Chicken stir-fry",
        description: "Quick weeknight stir-fry",
        ingredients: &[
            "chicken breast 400g",
            "bell pepper 1",
            "broccoli 200g",
            "soy sauce 3 tbsp",
            "rice 250g",
        ],
        steps: &[
            "Cook the rice",
            "Sear the chicken strips",
            "Add vegetables and soy sauce and toss",
        ],
        cooking_time: 30,
        difficulty: "Medium",
        category: "Dinner",
        image_url: "/static/img/stir-fry.jpg",
    },
    SampleRecipe {
        title: "Beef stroganoff",
        description: "Creamy beef with mushrooms",
        ingredients: &[
            "beef tenderloin 500g",
            "mushrooms 250g",
            "onion 1",
            "sour cream 200g",
            "butter 30g",
        ],
        steps: &[
            "Slice the beef into strips and sear",
            "Soften onion and mushrooms in butter",
            "Stir in sour cream and return the beef",
        ],
        cooking_time: 40,
        difficulty: "Medium",
        category: "Main",
        image_url: "/static/img/stroganoff.jpg",
    },
    SampleRecipe {
        title: "Chocolate mousse",
        description: "Rich mousse that sets overnight",
        ingredients: &[
            "dark chocolate 200g",
            "eggs 4",
            "sugar 50g",
            "cream 200ml",
        ],
        steps: &[
            "Melt the chocolate",
            "Whip the cream and the egg whites separately",
            "Fold everything together and chill",
        ],
        cooking_time: 25,
        difficulty: "Hard",
        category: "Dessert",
        image_url: "/static/img/mousse.jpg",
    },
];

fn to_new_recipe(sample: &SampleRecipe) -> NewRecipe {
    NewRecipe {
        title: sample.title.to_string(),
        description: Some(sample.description.to_string()),
        ingredients: sample.ingredients.iter().map(ToString::to_string).collect(),
        steps: sample.steps.iter().map(ToString::to_string).collect(),
        cooking_time: sample.cooking_time,
        difficulty: sample.difficulty.to_string(),
        category: sample.category.to_string(),
        image_url: sample.image_url.to_string(),
    }
}

/// Inserts the sample recipes, owned by `owner`, if the catalog is empty.
/// Returns the number of recipes inserted.
pub async fn seed_sample_recipes(store: &Store, owner: Option<UserId>) -> Result<usize> {
    if store.count_recipes().await? > 0 {
        return Ok(0);
    }

    for sample in SAMPLES {
        store.add_recipe(&to_new_recipe(sample), owner).await?;
    }

    info!("Seeded {} sample recipes", SAMPLES.len());
    Ok(SAMPLES.len())
}

/// Seeds the sample recipes owned by the bootstrap administrator, if that
/// account still exists.
pub async fn seed_default_catalog(store: &Store) -> Result<usize> {
    let owner = store
        .get_user_by_username(BOOTSTRAP_ADMIN_USERNAME)
        .await?
        .map(|user| UserId::new(user.id));

    seed_sample_recipes(store, owner).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeding_only_fills_an_empty_catalog() {
        let store = Store::new("sqlite::memory:").await.unwrap();

        let inserted = seed_default_catalog(&store).await.unwrap();
        assert_eq!(inserted, SAMPLES.len());

        let again = seed_default_catalog(&store).await.unwrap();
        assert_eq!(again, 0);
        assert_eq!(store.count_recipes().await.unwrap(), SAMPLES.len() as u64);

        let admin = store
            .get_user_by_username(BOOTSTRAP_ADMIN_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            store
                .count_recipes_for_user(UserId::new(admin.id))
                .await
                .unwrap(),
            SAMPLES.len() as u64
        );
    }

    #[tokio::test]
    async fn seeded_lists_decode_to_items() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        seed_sample_recipes(&store, None).await.unwrap();

        let soup = store
            .list_all_recipes(Some("Lunch"))
            .await
            .unwrap()
            .into_iter()
            .next()
            .unwrap();
        assert_eq!(soup.title, "Tomato soup");
        assert_eq!(soup.ingredients.len(), 5);
        assert_eq!(soup.steps[0], "Roast the tomatoes, onion and garlic");
        assert!(soup.user_id.is_none());
    }
}
