//! Basketwatch CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! bw migrate
//!
//! # Seed the database with demo catalog data
//! bw seed
//!
//! # Create a user account
//! bw user create -e shopper@example.com -n "Demo Shopper"
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed demo categories, markets, products and listings
//! - `user create` - Create user accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bw")]
#[command(author, version, about = "Basketwatch CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with demo catalog data
    Seed,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user account
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::User { action } => match action {
            UserAction::Create { email, name } => {
                commands::user::create_user(&email, &name).await?;
            }
        },
    }
    Ok(())
}
