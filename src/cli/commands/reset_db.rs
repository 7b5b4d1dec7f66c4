//! Reset-db command handler

use std::io::{self, Write};

use crate::config::Config;
use crate::db::migrator::m20240102_seed_admin::BOOTSTRAP_ADMIN_USERNAME;
use crate::db::{self, Store, seed};

pub async fn cmd_reset_db(config: &Config, skip_confirm: bool) -> anyhow::Result<()> {
    let url = &config.general.database_path;

    if db::is_in_memory(url) {
        println!("In-memory database configured; nothing to reset.");
        return Ok(());
    }

    let path = db::sqlite_file_path(url);

    if !skip_confirm {
        print!(
            "This deletes every user and recipe in {}. Continue? [y/N] ",
            path.display()
        );
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if path.exists() {
        tokio::fs::remove_file(path).await?;
    }

    let store = Store::new(url).await?;
    let seeded = if config.catalog.seed_sample_recipes {
        seed::seed_default_catalog(&store).await?
    } else {
        0
    };

    println!("Database recreated at {}", path.display());
    println!("  Bootstrap admin: {BOOTSTRAP_ADMIN_USERNAME}");
    println!("  Sample recipes:  {seeded}");
    Ok(())
}
