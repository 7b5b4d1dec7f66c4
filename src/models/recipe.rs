use serde::{Deserialize, Serialize};

use crate::domain::{ListOrText, RecipeId, UserId};

/// A stored recipe with its lists already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub cooking_time: i32,
    pub difficulty: String,
    pub category: String,
    pub image_url: String,
    pub created_at: String,
    pub user_id: Option<UserId>,
}

impl Recipe {
    /// Builds the API-facing form of this recipe.
    #[must_use]
    pub fn to_presentable(self) -> RecipeDto {
        RecipeDto {
            id: self.id.value(),
            title: self.title,
            description: self.description,
            ingredients: self.ingredients,
            steps: self.steps,
            cooking_time: self.cooking_time,
            difficulty: self.difficulty,
            category: self.category,
            image_url: self.image_url,
            created_at: self.created_at,
        }
    }
}

/// Presentable form of a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDto {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub cooking_time: i32,
    pub difficulty: String,
    pub category: String,
    pub image_url: String,
    pub created_at: String,
}

/// Recipe fields as supplied by a client, for both create and update.
///
/// Every field is optional here; [`crate::services::validation`] decides
/// which ones are required for the operation at hand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<ListOrText>,
    pub steps: Option<ListOrText>,
    #[serde(alias = "cooking_time")]
    pub cooking_time: Option<i64>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    #[serde(alias = "image_url")]
    pub image_url: Option<String>,
}

/// Validated data for inserting a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub cooking_time: i32,
    pub difficulty: String,
    pub category: String,
    pub image_url: String,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub ingredients: Option<Vec<String>>,
    pub steps: Option<Vec<String>>,
    pub cooking_time: Option<i32>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl RecipeChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.ingredients.is_none()
            && self.steps.is_none()
            && self.cooking_time.is_none()
            && self.difficulty.is_none()
            && self.category.is_none()
            && self.image_url.is_none()
    }
}

/// One page of a recipe listing.
#[derive(Debug, Clone)]
pub struct RecipePage {
    pub items: Vec<Recipe>,
    pub total: u64,
    pub pages: u64,
}
