//! Domain service for accounts and authentication.
//!
//! Handles registration, credential checks, and account removal.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{Identity, UserId};

/// Errors specific to authentication and account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("User not found: {0}")]
    NotFound(UserId),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        if matches!(
            err.sql_err(),
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
        ) {
            return Self::Conflict("Username or email already exists".to_string());
        }
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Public account details.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<crate::db::User> for UserInfo {
    fn from(user: crate::db::User) -> Self {
        Self {
            id: UserId::new(user.id),
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// Domain service trait for accounts.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a non-admin account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for malformed input and
    /// [`AuthError::Conflict`] if the username or email is taken.
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserId, AuthError>;

    /// Checks a username/password pair and returns the caller identity.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on any mismatch, without
    /// revealing which part was wrong.
    async fn authenticate(&self, username: &str, password: &str) -> Result<Identity, AuthError>;

    async fn get_user(&self, id: UserId) -> Result<UserInfo, AuthError>;

    /// Deletes a non-admin account and every recipe it owns.
    ///
    /// The actor must be the target user or an administrator. Returns the
    /// number of recipes removed.
    async fn delete_user(&self, actor: &Identity, target: UserId) -> Result<u64, AuthError>;

    /// Creates an administrator, or promotes an existing user with that name.
    async fn create_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserId, AuthError>;
}
