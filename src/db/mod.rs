use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::UserId;
use crate::models::{NewRecipe, Recipe, RecipeChanges, RecipePage};

pub mod migrator;
pub mod repositories;
pub mod seed;

pub use repositories::user::{User, UserDeletion};

const IN_MEMORY_LIFETIME: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = is_in_memory(db_url);

        if !in_memory {
            let path = sqlite_file_path(db_url);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !path.exists() {
                std::fs::File::create(path)?;
            }
        }

        // Every pooled connection to an in-memory database sees its own empty
        // database, and closing the last one drops the data. Those are pinned
        // to a single long-lived connection.
        let (max_connections, min_connections, idle, lifetime) = if in_memory {
            (1, 1, IN_MEMORY_LIFETIME, IN_MEMORY_LIFETIME)
        } else {
            (
                max_connections,
                min_connections,
                Duration::from_secs(300),
                Duration::from_secs(600),
            )
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(idle)
            .max_lifetime(lifetime)
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn recipe_repo(&self) -> repositories::recipe::RecipeRepository {
        repositories::recipe::RecipeRepository::new(self.conn.clone())
    }

    // ========== Recipe Repository Methods ==========

    pub async fn add_recipe(&self, recipe: &NewRecipe, owner: Option<UserId>) -> Result<Recipe> {
        self.recipe_repo().insert(recipe, owner).await
    }

    pub async fn get_recipe(&self, id: i32) -> Result<Option<Recipe>> {
        self.recipe_repo().get(id).await
    }

    pub async fn update_recipe(&self, id: i32, changes: RecipeChanges) -> Result<Option<Recipe>> {
        self.recipe_repo().update(id, changes).await
    }

    pub async fn remove_recipe(&self, id: i32) -> Result<bool> {
        self.recipe_repo().delete(id).await
    }

    pub async fn list_recipes_page(
        &self,
        page: u64,
        page_size: u64,
        category: Option<&str>,
    ) -> Result<RecipePage> {
        self.recipe_repo()
            .list_page(page, page_size, category)
            .await
    }

    pub async fn list_all_recipes(&self, category: Option<&str>) -> Result<Vec<Recipe>> {
        self.recipe_repo().list_all(category).await
    }

    pub async fn count_recipes(&self) -> Result<u64> {
        self.recipe_repo().count().await
    }

    pub async fn count_recipes_for_user(&self, user_id: UserId) -> Result<u64> {
        self.recipe_repo().count_for_user(user_id.value()).await
    }

    // ========== User Repository Methods ==========

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.user_repo().get_by_id(id.value()).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        self.user_repo().username_exists(username).await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        self.user_repo().email_exists(email).await
    }

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: String,
        is_admin: bool,
    ) -> Result<User, sea_orm::DbErr> {
        self.user_repo()
            .create(username, email, password_hash, is_admin)
            .await
    }

    pub async fn set_user_admin(&self, id: UserId, is_admin: bool) -> Result<()> {
        self.user_repo().set_admin(id.value(), is_admin).await
    }

    pub async fn verify_user_credentials(
        &self,
        username: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo()
            .verify_credentials(username, password, security)
            .await
    }

    pub async fn delete_user_with_recipes(&self, id: UserId) -> Result<UserDeletion> {
        self.user_repo().delete_with_recipes(id.value()).await
    }
}

#[must_use]
pub fn is_in_memory(db_url: &str) -> bool {
    db_url.contains(":memory:") || db_url.contains("mode=memory")
}

/// Filesystem path of a `sqlite:` URL, without scheme or query string.
#[must_use]
pub fn sqlite_file_path(db_url: &str) -> &Path {
    let path = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
    let path = path.split('?').next().unwrap_or(path);
    Path::new(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path("sqlite:data/recipes.db"),
            Path::new("data/recipes.db")
        );
        assert_eq!(
            sqlite_file_path("sqlite:///tmp/r.db?mode=rwc"),
            Path::new("/tmp/r.db")
        );
    }

    #[test]
    fn test_is_in_memory() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(!is_in_memory("sqlite:data/recipes.db"));
    }

    #[tokio::test]
    async fn in_memory_store_is_migrated_with_bootstrap_admin() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        store.ping().await.unwrap();

        let admin = store
            .get_user_by_username(migrator::m20240102_seed_admin::BOOTSTRAP_ADMIN_USERNAME)
            .await
            .unwrap()
            .expect("bootstrap admin");
        assert!(admin.is_admin);
        assert_eq!(store.count_recipes().await.unwrap(), 0);
    }
}
