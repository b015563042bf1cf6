//! Database operations for the Shoplark `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `settings` - Owner profile/contact/store-identity records
//! - `store_templates` - One published storefront configuration per owner
//! - `payment_images` - Append-only payment-display asset log
//! - `templates` - Base template gallery
//! - `customers`, `orders`, `products` - Owner-scoped CRUD records
//!
//! Queries use the runtime `sqlx::query_as`/`QueryBuilder` API with
//! `FromRow` models, so the crate builds without a live database.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p shoplark-cli -- migrate
//! ```

pub mod customers;
pub mod orders;
pub mod payment_images;
pub mod products;
pub mod settings;
pub mod store_templates;
pub mod templates;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use customers::{CustomerPatch, CustomerRepository, NewCustomer};
pub use orders::{NewOrder, OrderPatch, OrderRepository};
pub use payment_images::PaymentImageRepository;
pub use products::{NewProduct, ProductPatch, ProductRepository};
pub use settings::{NewSettings, SettingsPatch, SettingsRepository};
pub use store_templates::{NewStoreTemplate, StoreTemplatePatch, StoreTemplateRepository};
pub use templates::{BaseTemplatePatch, BaseTemplateRepository, NewBaseTemplate};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Constraint violation (e.g., unique email or subdomain).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Whether the error means the database could not be reached at all,
    /// as opposed to rejecting a valid connection's query.
    ///
    /// Callers use this to surface "backend unavailable" distinctly from
    /// data errors.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Database(
                sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
            )
        )
    }

    /// Map a sqlx error, converting unique violations into `Conflict`.
    pub(crate) fn from_write(e: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_message.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
