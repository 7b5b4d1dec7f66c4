//! Create-admin command handler

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, SeaOrmAuthService};

pub async fn cmd_create_admin(
    config: &Config,
    username: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let auth = SeaOrmAuthService::new(store, config.security.clone());

    let id = auth
        .create_admin(username, email, password)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    println!("Administrator '{username}' ready (ID: {id})");
    Ok(())
}
