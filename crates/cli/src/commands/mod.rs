//! CLI subcommand implementations.

pub mod migrate;
pub mod stores;

use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: set SHOPLARK_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Connect to the database named by `SHOPLARK_DATABASE_URL` (falling back to
/// `DATABASE_URL`).
pub async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SHOPLARK_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CliError::MissingDatabaseUrl)?;

    Ok(PgPool::connect(&database_url).await?)
}
