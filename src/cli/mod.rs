//! Command-line interface for the recipe catalog.

mod commands;

use clap::{Parser, Subcommand};

/// Recipe catalog web service
#[derive(Parser)]
#[command(name = "recipe-catalog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    #[command(alias = "web")]
    Serve {
        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Delete the database and recreate it with the bootstrap data
    ResetDb {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Create an administrator, or promote an existing user
    CreateAdmin {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

pub use commands::*;
