use axum::{
    Json,
    extract::{FromRequestParts, State},
    http::{StatusCode, request::Parts},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{
    ApiError, ApiResponse, AppState, LoginResponse, MessageResponse, RegisterResponse,
    SessionUserDto,
};
use crate::domain::Identity;
use crate::services::{AuthError, UserInfo};

/// Session key holding the serialized [`Identity`].
pub const SESSION_USER_KEY: &str = "user";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::Conflict(msg) => Self::Conflict(msg),
            AuthError::InvalidCredentials => {
                Self::unauthorized("Invalid username or password")
            }
            AuthError::Unauthenticated => Self::unauthorized("Not authenticated"),
            AuthError::Forbidden(msg) => Self::forbidden(msg),
            AuthError::NotFound(id) => Self::not_found("User", id),
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Extractor
// ============================================================================

/// The logged-in caller, read from the session cookie.
///
/// Handlers that take this extractor reject anonymous requests with 401.
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::internal(format!("Session unavailable: {msg}")))?;

        let identity = session
            .get::<Identity>(SESSION_USER_KEY)
            .await
            .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
            .ok_or_else(|| ApiError::from(AuthError::Unauthenticated))?;

        tracing::Span::current().record("user_id", identity.user_id.value());
        Ok(Self(identity))
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponse>>), ApiError> {
    let user_id = state
        .auth_service()
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(RegisterResponse {
            message: "Registration successful".to_string(),
            id: user_id.value(),
        })),
    ))
}

/// POST /login
/// Verifies credentials and stores the caller identity in a fresh session
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Username and password are required"));
    }

    let identity = state
        .auth_service()
        .authenticate(&payload.username, &payload.password)
        .await?;

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;
    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!(user = %identity.username, admin = identity.is_admin, "User logged in");

    Ok(Json(ApiResponse::success(LoginResponse {
        message: "Login successful".to_string(),
        user: SessionUserDto {
            id: identity.user_id.value(),
            username: identity.username,
            is_admin: identity.is_admin,
        },
    })))
}

/// POST /logout
pub async fn logout(session: Session) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to clear session: {e}")))?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Logged out",
    ))))
}

/// GET /me
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let user = state.auth_service().get_user(identity.user_id).await?;
    Ok(Json(ApiResponse::success(user)))
}
