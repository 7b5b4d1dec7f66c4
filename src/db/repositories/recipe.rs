use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use tracing::info;

use crate::domain::{RecipeId, UserId, list_text};
use crate::entities::{prelude::*, recipes};
use crate::models::{NewRecipe, Recipe, RecipeChanges, RecipePage};

pub struct RecipeRepository {
    conn: DatabaseConnection,
}

impl RecipeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model_to_recipe(model: recipes::Model) -> Recipe {
        Recipe {
            id: RecipeId::new(model.id),
            title: model.title,
            description: model.description,
            ingredients: list_text::decode(&model.ingredients),
            steps: list_text::decode(&model.steps),
            cooking_time: model.cooking_time,
            difficulty: model.difficulty,
            category: model.category,
            image_url: model.image_url,
            created_at: model.created_at,
            user_id: model.user_id.map(UserId::new),
        }
    }

    /// Newest first; id breaks ties between rows created in the same instant.
    fn newest_first() -> Select<Recipes> {
        Recipes::find()
            .order_by_desc(recipes::Column::CreatedAt)
            .order_by_desc(recipes::Column::Id)
    }

    pub async fn insert(&self, recipe: &NewRecipe, owner: Option<UserId>) -> Result<Recipe> {
        let active_model = recipes::ActiveModel {
            title: Set(recipe.title.clone()),
            description: Set(recipe.description.clone()),
            ingredients: Set(list_text::encode(&recipe.ingredients)),
            steps: Set(list_text::encode(&recipe.steps)),
            cooking_time: Set(recipe.cooking_time),
            difficulty: Set(recipe.difficulty.clone()),
            category: Set(recipe.category.clone()),
            image_url: Set(recipe.image_url.clone()),
            created_at: Set(timestamp()),
            user_id: Set(owner.map(UserId::value)),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert recipe")?;

        info!("Added recipe {}: {}", model.id, model.title);
        Ok(Self::map_model_to_recipe(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Recipe>> {
        let model = Recipes::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query recipe by ID")?;

        Ok(model.map(Self::map_model_to_recipe))
    }

    /// Applies the supplied changes. Returns `None` if the recipe is absent.
    pub async fn update(&self, id: i32, changes: RecipeChanges) -> Result<Option<Recipe>> {
        let Some(model) = Recipes::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query recipe for update")?
        else {
            return Ok(None);
        };

        if changes.is_empty() {
            return Ok(Some(Self::map_model_to_recipe(model)));
        }

        let mut active: recipes::ActiveModel = model.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(ingredients) = changes.ingredients {
            active.ingredients = Set(list_text::encode(&ingredients));
        }
        if let Some(steps) = changes.steps {
            active.steps = Set(list_text::encode(&steps));
        }
        if let Some(cooking_time) = changes.cooking_time {
            active.cooking_time = Set(cooking_time);
        }
        if let Some(difficulty) = changes.difficulty {
            active.difficulty = Set(difficulty);
        }
        if let Some(category) = changes.category {
            active.category = Set(category);
        }
        if let Some(image_url) = changes.image_url {
            active.image_url = Set(image_url);
        }

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update recipe")?;

        info!("Updated recipe {}", model.id);
        Ok(Some(Self::map_model_to_recipe(model)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Recipes::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete recipe")?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed recipe with ID: {}", id);
        }
        Ok(removed)
    }

    /// Returns one page (1-based) of recipes, newest first.
    pub async fn list_page(
        &self,
        page: u64,
        page_size: u64,
        category: Option<&str>,
    ) -> Result<RecipePage> {
        let mut query = Self::newest_first();

        if let Some(category) = category {
            query = query.filter(recipes::Column::Category.eq(category));
        }

        anyhow::ensure!(page_size > 0, "Page size must be at least 1");

        let paginator = query.paginate(&self.conn, page_size);
        let total = paginator.num_items().await?;
        let pages = total.div_ceil(page_size);

        // Past the last page the offset could overflow, so nothing is fetched.
        let items = if page == 0 || page > pages {
            Vec::new()
        } else {
            paginator.fetch_page(page - 1).await?
        };

        Ok(RecipePage {
            items: items.into_iter().map(Self::map_model_to_recipe).collect(),
            total,
            pages,
        })
    }

    /// All recipes, newest first, optionally narrowed to one category.
    pub async fn list_all(&self, category: Option<&str>) -> Result<Vec<Recipe>> {
        let mut query = Self::newest_first();

        if let Some(category) = category {
            query = query.filter(recipes::Column::Category.eq(category));
        }

        let rows = query.all(&self.conn).await?;
        Ok(rows.into_iter().map(Self::map_model_to_recipe).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Recipes::find().count(&self.conn).await?)
    }

    pub async fn count_for_user(&self, user_id: i32) -> Result<u64> {
        Ok(Recipes::find()
            .filter(recipes::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await?)
    }
}

/// Fixed-width UTC timestamp so that text ordering matches time ordering.
fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
