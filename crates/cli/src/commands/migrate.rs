//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! bw migrate
//! ```
//!
//! # Environment Variables
//!
//! - `API_DATABASE_URL` - `PostgreSQL` connection string
//! - `DATABASE_URL` - Fallback connection string (set by Fly.io postgres attach)
//!
//! Migration files live in `crates/api/migrations/` and are embedded into the
//! binary at compile time, so the CLI can migrate a fresh database without a
//! checkout of the repository.

use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while running migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails, or
/// a migration cannot be applied.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}

fn database_url() -> Result<String, MigrationError> {
    std::env::var("API_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrationError::MissingEnvVar("API_DATABASE_URL"))
}
