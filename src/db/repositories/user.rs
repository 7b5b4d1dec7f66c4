use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use tokio::task;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{prelude::*, recipes, users};

/// User data returned from repository (without sensitive password hash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            is_admin: model.is_admin,
            created_at: model.created_at,
        }
    }
}

/// Outcome of a cascading user delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserDeletion {
    NotFound,
    /// Administrator accounts are never removed through this path.
    Protected,
    Deleted { recipes_removed: u64 },
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        Ok(self.get_by_username(username).await?.is_some())
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.is_some())
    }

    /// Inserts a user with an already hashed password.
    ///
    /// Unique-constraint violations surface as [`sea_orm::DbErr`] so callers
    /// can map them to a conflict.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: String,
        is_admin: bool,
    ) -> Result<User, sea_orm::DbErr> {
        let active = users::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash),
            is_admin: Set(is_admin),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await?;
        info!("Registered user: {}", model.username);
        Ok(User::from(model))
    }

    pub async fn set_admin(&self, id: i32, is_admin: bool) -> Result<()> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for admin flag update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let mut active: users::ActiveModel = user.into();
        active.is_admin = Set(is_admin);
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Verify a username/password pair and return the user on success.
    ///
    /// Unknown usernames are checked against a throwaway hash built with the
    /// same `security` params, so both failure paths cost about the same.
    /// Note: This uses `spawn_blocking` because Argon2 hashing is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let stored_hash = user.as_ref().map(|model| model.password_hash.clone());
        let password = password.to_string();
        let security = security.clone();

        let is_valid = task::spawn_blocking(move || {
            let password_hash = match stored_hash {
                Some(hash) => hash,
                None => dummy_hash(&security)?,
            };
            verify_password(&password, &password_hash)
        })
        .await
        .context("Password verification task panicked")??;

        Ok(user.filter(|_| is_valid).map(User::from))
    }

    /// Removes the user and every recipe they own in one transaction.
    pub async fn delete_with_recipes(&self, id: i32) -> Result<UserDeletion> {
        let txn = self.conn.begin().await?;

        let Some(user) = Users::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(UserDeletion::NotFound);
        };

        if user.is_admin {
            txn.rollback().await?;
            return Ok(UserDeletion::Protected);
        }

        let recipes_removed = match Self::remove_owner_and_recipes(&txn, id).await {
            Ok(removed) => removed,
            Err(e) => {
                txn.rollback().await?;
                return Err(e).context("Failed to delete user and owned recipes");
            }
        };

        txn.commit().await?;

        info!(
            "Deleted user {} ({}) and {} owned recipes",
            user.username, id, recipes_removed
        );

        Ok(UserDeletion::Deleted { recipes_removed })
    }

    async fn remove_owner_and_recipes(txn: &DatabaseTransaction, id: i32) -> Result<u64, DbErr> {
        let removed = recipes::Entity::delete_many()
            .filter(recipes::Column::UserId.eq(id))
            .exec(txn)
            .await?;

        Users::delete_by_id(id).exec(txn).await?;

        Ok(removed.rows_affected)
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the argon2 crate defaults.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None, // output length (use default)
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Checks a password against a PHC-format hash. Params are read from the hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Throwaway hash for unknown users, cached per Argon2 parameter set.
fn dummy_hash(config: &SecurityConfig) -> Result<String> {
    static DUMMY: OnceLock<Mutex<HashMap<(u32, u32, u32), String>>> = OnceLock::new();

    let key = (
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
    );
    let cache = DUMMY.get_or_init(Mutex::default);

    if let Some(hash) = cache
        .lock()
        .map_err(|_| anyhow::anyhow!("Dummy hash cache poisoned"))?
        .get(&key)
    {
        return Ok(hash.clone());
    }

    let hash = hash_password("not-a-real-password-0", Some(config))?;
    Ok(cache
        .lock()
        .map_err(|_| anyhow::anyhow!("Dummy hash cache poisoned"))?
        .entry(key)
        .or_insert(hash)
        .clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    #[test]
    fn hash_is_salted_and_verifiable() {
        let first = hash_password("abc12345", Some(&fast_config())).unwrap();
        let second = hash_password("abc12345", Some(&fast_config())).unwrap();

        assert_ne!(first, second);
        assert!(!first.contains("abc12345"));
        assert!(first.starts_with("$argon2id$"));
        assert!(verify_password("abc12345", &first).unwrap());
        assert!(!verify_password("abc12346", &first).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("abc12345", "plaintext").is_err());
    }

    #[test]
    fn dummy_hash_is_stable() {
        let a = dummy_hash(&fast_config()).unwrap();
        let b = dummy_hash(&fast_config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn dummy_hash_uses_configured_params() {
        let fast = dummy_hash(&fast_config()).unwrap();
        assert!(fast.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"), "{fast}");

        let other = SecurityConfig {
            argon2_memory_cost_kib: 2048,
            argon2_time_cost: 2,
            argon2_parallelism: 1,
        };
        let slower = dummy_hash(&other).unwrap();
        assert!(slower.starts_with("$argon2id$v=19$m=2048,t=2,p=1$"), "{slower}");
        assert!(!verify_password("not-the-dummy", &slower).unwrap());
    }
}
