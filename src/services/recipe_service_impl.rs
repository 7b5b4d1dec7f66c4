//! `SeaORM` implementation of the `RecipeService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::config::CatalogConfig;
use crate::db::Store;
use crate::domain::{Identity, RecipeId};
use crate::models::{Recipe, RecipeFields};
use crate::services::recipe_service::{RecipeError, RecipeListing, RecipeService};
use crate::services::search::{self, SearchCriteria, SearchOutcome};
use crate::services::validation;

pub struct SeaOrmRecipeService {
    store: Store,
    catalog: CatalogConfig,
}

impl SeaOrmRecipeService {
    #[must_use]
    pub const fn new(store: Store, catalog: CatalogConfig) -> Self {
        Self { store, catalog }
    }

    fn require_admin(actor: &Identity) -> Result<(), RecipeError> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(RecipeError::Forbidden(
                "Administrator role required".to_string(),
            ))
        }
    }
}

#[async_trait]
impl RecipeService for SeaOrmRecipeService {
    async fn create(&self, actor: &Identity, fields: RecipeFields) -> Result<Recipe, RecipeError> {
        Self::require_admin(actor)?;

        let recipe = validation::validate_new_recipe(fields, &self.catalog)
            .map_err(RecipeError::Validation)?;

        let created = self.store.add_recipe(&recipe, Some(actor.user_id)).await?;
        info!(actor = %actor.username, recipe_id = %created.id, "Recipe created");
        Ok(created)
    }

    async fn update(
        &self,
        actor: &Identity,
        id: RecipeId,
        fields: RecipeFields,
    ) -> Result<Recipe, RecipeError> {
        Self::require_admin(actor)?;

        let changes = validation::validate_recipe_changes(fields).map_err(RecipeError::Validation)?;

        self.store
            .update_recipe(id.value(), changes)
            .await?
            .ok_or(RecipeError::NotFound(id))
    }

    async fn delete(&self, actor: &Identity, id: RecipeId) -> Result<(), RecipeError> {
        Self::require_admin(actor)?;

        if self.store.remove_recipe(id.value()).await? {
            info!(actor = %actor.username, recipe_id = %id, "Recipe deleted");
            Ok(())
        } else {
            Err(RecipeError::NotFound(id))
        }
    }

    async fn get(&self, id: RecipeId) -> Result<Recipe, RecipeError> {
        self.store
            .get_recipe(id.value())
            .await?
            .ok_or(RecipeError::NotFound(id))
    }

    async fn list(
        &self,
        page: u64,
        page_size: Option<u64>,
        category: Option<&str>,
    ) -> Result<RecipeListing, RecipeError> {
        if page == 0 {
            return Err(RecipeError::Validation("page must be at least 1".to_string()));
        }

        let page_size = page_size.unwrap_or(self.catalog.default_page_size);
        if page_size == 0 {
            return Err(RecipeError::Validation(
                "perPage must be at least 1".to_string(),
            ));
        }
        let page_size = page_size.min(self.catalog.max_page_size);

        let category = category.map(str::trim).filter(|c| !c.is_empty());
        let result = self
            .store
            .list_recipes_page(page, page_size, category)
            .await?;

        Ok(RecipeListing {
            recipes: result.items,
            total: result.total,
            pages: result.pages,
            current_page: page,
        })
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<SearchOutcome, RecipeError> {
        // Category is an equality filter, so it can narrow the scan up front.
        let category = criteria
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let candidates = self.store.list_all_recipes(category).await?;

        Ok(search::search(
            candidates,
            criteria,
            self.catalog.search_result_limit,
        ))
    }
}
