//! User account management commands.
//!
//! Authentication happens upstream of the API, but owned records still need a
//! `users` row to reference. This command provisions one and prints the id to
//! pass in the `x-user-id` header.
//!
//! # Usage
//!
//! ```bash
//! bw user create -e shopper@example.com -n "Demo Shopper"
//! ```
//!
//! # Environment Variables
//!
//! - `API_DATABASE_URL` - `PostgreSQL` connection string
//! - `DATABASE_URL` - Fallback connection string (set by Fly.io postgres attach)

use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// User already exists.
    #[error("User already exists with email: {0}")]
    UserExists(String),
}

/// Create a new user account.
///
/// # Arguments
///
/// * `email` - Email address
/// * `name` - Display name
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns an error if the email is malformed, the user already exists, or
/// the database is unreachable.
pub async fn create_user(email: &str, name: &str) -> Result<i32, UserError> {
    dotenvy::dotenv().ok();

    // Basic email validation
    if !email.contains('@') || !email.contains('.') {
        return Err(UserError::InvalidEmail(email.to_owned()));
    }

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Creating user: {} ({})", name, email);

    // Check if user already exists
    let existing = sqlx::query_scalar::<_, i32>(
        r"
        SELECT id FROM users WHERE email = $1
        ",
    )
    .bind(email)
    .fetch_optional(&pool)
    .await?;

    if existing.is_some() {
        return Err(UserError::UserExists(email.to_owned()));
    }

    // Create the user
    let user_id = sqlx::query_scalar::<_, i32>(
        r"
        INSERT INTO users (name, email)
        VALUES ($1, $2)
        RETURNING id
        ",
    )
    .bind(name)
    .bind(email)
    .fetch_one(&pool)
    .await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}",
        user_id,
        email
    );
    tracing::info!("Requests act as this user when sent with the header: x-user-id: {user_id}");

    Ok(user_id)
}

fn database_url() -> Result<String, UserError> {
    std::env::var("API_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| UserError::MissingEnvVar("API_DATABASE_URL"))
}
