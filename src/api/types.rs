use serde::{Deserialize, Serialize};

use crate::models::RecipeDto;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub id: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionUserDto {
    pub id: i32,
    pub username: String,
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: SessionUserDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeListDto {
    pub recipes: Vec<RecipeDto>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
}

#[derive(Debug, Serialize)]
pub struct SearchResultsDto {
    pub recipes: Vec<RecipeDto>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDeletedDto {
    pub message: String,
    pub recipes_removed: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: String,
    pub database: String,
    pub uptime_seconds: u64,
}
