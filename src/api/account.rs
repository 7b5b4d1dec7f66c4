//! Account removal endpoints.

use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::AuthUser;
use super::validation::validate_user_id;
use super::{AccountDeletedDto, ApiError, ApiResponse, AppState};
use crate::domain::UserId;

/// `POST /api/user/delete`
///
/// Removes the caller's own account together with its recipes and ends the
/// session. Administrators cannot delete themselves this way.
pub async fn delete_own_account(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    session: Session,
) -> Result<Json<ApiResponse<AccountDeletedDto>>, ApiError> {
    let recipes_removed = state
        .auth_service()
        .delete_user(&identity, identity.user_id)
        .await?;

    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to clear session: {e}")))?;

    Ok(Json(ApiResponse::success(AccountDeletedDto {
        message: "Account deleted".to_string(),
        recipes_removed,
    })))
}

/// `DELETE /api/users/{id}`
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<AccountDeletedDto>>, ApiError> {
    let target = UserId::new(validate_user_id(id)?);

    let recipes_removed = state
        .auth_service()
        .delete_user(&identity, target)
        .await?;

    Ok(Json(ApiResponse::success(AccountDeletedDto {
        message: format!("User {target} deleted"),
        recipes_removed,
    })))
}
