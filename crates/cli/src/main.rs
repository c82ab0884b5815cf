//! BrickExchange CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! bx-cli migrate
//!
//! # Create an admin account for the admin portal
//! bx-cli admin create -e admin@test.edu -p 'a long passphrase'
//!
//! # Insert products from a YAML catalogue
//! bx-cli seed products catalogue.yaml
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bx-cli")]
#[command(author, version, about = "BrickExchange CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert products from a YAML catalogue
    Products {
        /// Path to the catalogue file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create { email, password } => {
                commands::admin::create_account(&email, &password).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => {
                commands::seed::products(&file).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_admin_create() {
        let cli = Cli::try_parse_from([
            "bx-cli", "admin", "create", "-e", "admin@test.edu", "-p", "longpassword",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Admin {
                action: AdminAction::Create { .. }
            })
        ));
    }
}
