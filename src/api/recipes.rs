//! Recipe catalog endpoints.
//!
//! Reads are public. Writes need a logged-in administrator; the role check
//! itself lives in [`crate::services::RecipeService`].

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::AuthUser;
use super::validation::{validate_page, validate_recipe_id, validate_time_limit};
use super::{ApiError, ApiResponse, AppState, MessageResponse, RecipeListDto, SearchResultsDto};
use crate::domain::{MatchMode, RecipeId};
use crate::models::{Recipe, RecipeDto, RecipeFields};
use crate::services::{RecipeError, SearchCriteria};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(alias = "per_page")]
    pub per_page: Option<u64>,
    pub category: Option<String>,
}

const fn default_page() -> u64 {
    1
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub ingredients: Option<String>,
    pub mode: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub time: Option<i32>,
}

impl SearchQuery {
    fn into_criteria(self) -> Result<SearchCriteria, ApiError> {
        let max_time = self.time.map(validate_time_limit).transpose()?;

        Ok(SearchCriteria {
            query: self.q,
            ingredients: self.ingredients,
            mode: self.mode.as_deref().map(MatchMode::parse).unwrap_or_default(),
            category: self.category,
            difficulty: self.difficulty,
            max_time,
        })
    }
}

impl From<RecipeError> for ApiError {
    fn from(err: RecipeError) -> Self {
        match err {
            RecipeError::Validation(msg) => Self::validation(msg),
            RecipeError::NotFound(id) => Self::not_found("Recipe", id),
            RecipeError::Forbidden(msg) => Self::forbidden(msg),
            RecipeError::Database(msg) => Self::DatabaseError(msg),
            RecipeError::Internal(msg) => Self::internal(msg),
        }
    }
}

fn presentable(recipes: Vec<Recipe>) -> Vec<RecipeDto> {
    recipes.into_iter().map(Recipe::to_presentable).collect()
}

/// `GET /api/recipes?page&perPage&category`
pub async fn list_recipes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<RecipeListDto>>, ApiError> {
    let page = validate_page(query.page)?;

    let listing = state
        .recipe_service()
        .list(page, query.per_page, query.category.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(RecipeListDto {
        recipes: presentable(listing.recipes),
        total: listing.total,
        pages: listing.pages,
        current_page: listing.current_page,
    })))
}

/// `GET /api/recipes/search`
///
/// Accepts `q`, `ingredients` (comma-separated), `mode` (`any`/`all`),
/// `category`, `difficulty` and `time` (maximum minutes).
pub async fn search_recipes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchResultsDto>>, ApiError> {
    let criteria = query.into_criteria()?;
    let outcome = state.recipe_service().search(&criteria).await?;

    Ok(Json(ApiResponse::success(SearchResultsDto {
        recipes: presentable(outcome.recipes),
        count: outcome.count,
    })))
}

pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<RecipeDto>>, ApiError> {
    let id = RecipeId::new(validate_recipe_id(id)?);
    let recipe = state.recipe_service().get(id).await?;
    Ok(Json(ApiResponse::success(recipe.to_presentable())))
}

pub async fn create_recipe(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(fields): Json<RecipeFields>,
) -> Result<(StatusCode, Json<ApiResponse<RecipeDto>>), ApiError> {
    let recipe = state.recipe_service().create(&identity, fields).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(recipe.to_presentable())),
    ))
}

pub async fn update_recipe(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<i32>,
    Json(fields): Json<RecipeFields>,
) -> Result<Json<ApiResponse<RecipeDto>>, ApiError> {
    let id = RecipeId::new(validate_recipe_id(id)?);
    let recipe = state
        .recipe_service()
        .update(&identity, id, fields)
        .await?;

    Ok(Json(ApiResponse::success(recipe.to_presentable())))
}

pub async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = RecipeId::new(validate_recipe_id(id)?);
    state.recipe_service().delete(&identity, id).await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Recipe deleted",
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_query_defaults_to_any_mode() {
        let criteria = SearchQuery {
            mode: Some("sometimes".to_string()),
            ..SearchQuery::default()
        }
        .into_criteria()
        .unwrap();
        assert_eq!(criteria.mode, MatchMode::Any);

        let criteria = SearchQuery::default().into_criteria().unwrap();
        assert_eq!(criteria.mode, MatchMode::Any);
    }

    #[test]
    fn search_query_rejects_non_positive_time() {
        let query = SearchQuery {
            time: Some(0),
            ..SearchQuery::default()
        };
        assert!(query.into_criteria().is_err());
    }
}
