//! Domain service for the recipe catalog.

use thiserror::Error;

use crate::domain::{Identity, RecipeId};
use crate::models::{Recipe, RecipeFields};
use crate::services::search::{SearchCriteria, SearchOutcome};

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Recipe not found: {0}")]
    NotFound(RecipeId),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for RecipeError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RecipeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A page of recipes with the numbers needed for pagination controls.
#[derive(Debug, Clone)]
pub struct RecipeListing {
    pub recipes: Vec<Recipe>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
}

/// Domain service trait for recipes.
///
/// Reads are public. Writes require an administrator [`Identity`].
#[async_trait::async_trait]
pub trait RecipeService: Send + Sync {
    async fn create(&self, actor: &Identity, fields: RecipeFields) -> Result<Recipe, RecipeError>;

    /// Applies only the supplied fields.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::Validation`] if any supplied field is invalid,
    /// in which case nothing is written.
    async fn update(
        &self,
        actor: &Identity,
        id: RecipeId,
        fields: RecipeFields,
    ) -> Result<Recipe, RecipeError>;

    async fn delete(&self, actor: &Identity, id: RecipeId) -> Result<(), RecipeError>;

    async fn get(&self, id: RecipeId) -> Result<Recipe, RecipeError>;

    /// Lists one page, newest first. `page_size` is clamped to the configured
    /// maximum; `None` uses the configured default.
    async fn list(
        &self,
        page: u64,
        page_size: Option<u64>,
        category: Option<&str>,
    ) -> Result<RecipeListing, RecipeError>;

    async fn search(&self, criteria: &SearchCriteria) -> Result<SearchOutcome, RecipeError>;
}
