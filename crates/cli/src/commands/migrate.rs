//! Database migration command.
//!
//! Migrations live in `crates/server/migrations/` and are embedded at
//! compile time; the server never runs them on startup, this command is the
//! only path that applies them.

use super::{CliError, connect};

/// Run pending migrations.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
