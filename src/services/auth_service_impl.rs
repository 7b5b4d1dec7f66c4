//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tokio::task;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::{Store, UserDeletion};
use crate::domain::{Identity, UserId};
use crate::services::auth_service::{AuthError, AuthService, UserInfo};
use crate::services::validation;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn validate_account(username: &str, email: &str, password: &str) -> Result<(), AuthError> {
        validation::validate_username(username).map_err(AuthError::Validation)?;
        validation::validate_email(email).map_err(AuthError::Validation)?;
        validation::validate_password(password).map_err(AuthError::Validation)?;
        Ok(())
    }

    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_string();
        let security = self.security.clone();

        task::spawn_blocking(move || {
            crate::db::repositories::user::hash_password(&password, Some(&security))
        })
        .await
        .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {e}")))?
        .map_err(AuthError::from)
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserId, AuthError> {
        let username = username.trim();
        let email = email.trim();
        Self::validate_account(username, email, password)?;

        if self.store.username_exists(username).await? {
            return Err(AuthError::Conflict("Username already exists".to_string()));
        }
        if self.store.email_exists(email).await? {
            return Err(AuthError::Conflict("Email already registered".to_string()));
        }

        let password_hash = self.hash(password).await?;

        // The unique indexes still catch a concurrent registration.
        let user = self
            .store
            .create_user(username, email, password_hash, false)
            .await?;

        Ok(UserId::new(user.id))
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let user = self
            .store
            .verify_user_credentials(username.trim(), password, &self.security)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(Identity {
            user_id: UserId::new(user.id),
            username: user.username,
            is_admin: user.is_admin,
        })
    }

    async fn get_user(&self, id: UserId) -> Result<UserInfo, AuthError> {
        self.store
            .get_user(id)
            .await?
            .map(UserInfo::from)
            .ok_or(AuthError::NotFound(id))
    }

    async fn delete_user(&self, actor: &Identity, target: UserId) -> Result<u64, AuthError> {
        if !actor.can_act_for(target) {
            return Err(AuthError::Forbidden(
                "You can only delete your own account".to_string(),
            ));
        }

        match self.store.delete_user_with_recipes(target).await? {
            UserDeletion::NotFound => Err(AuthError::NotFound(target)),
            UserDeletion::Protected => Err(AuthError::Forbidden(
                "Administrator accounts cannot be deleted".to_string(),
            )),
            UserDeletion::Deleted { recipes_removed } => {
                info!(
                    actor = %actor.username,
                    user_id = %target,
                    recipes_removed,
                    "Account deleted"
                );
                Ok(recipes_removed)
            }
        }
    }

    async fn create_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserId, AuthError> {
        let username = username.trim();

        if let Some(existing) = self.store.get_user_by_username(username).await? {
            self.store
                .set_user_admin(UserId::new(existing.id), true)
                .await?;
            info!("Promoted existing user {} to administrator", username);
            return Ok(UserId::new(existing.id));
        }

        let email = email.trim();
        Self::validate_account(username, email, password)?;

        let password_hash = self.hash(password).await?;
        let user = self
            .store
            .create_user(username, email, password_hash, true)
            .await?;

        info!("Created administrator {}", username);
        Ok(UserId::new(user.id))
    }
}
