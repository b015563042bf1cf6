//! Persisted domain models.
//!
//! Each model derives `sqlx::FromRow` so repositories can map rows without
//! per-query boilerplate, and `Serialize` so route handlers can return rows
//! directly inside the response envelope.

pub mod customer;
pub mod order;
pub mod product;
pub mod settings;
pub mod store_template;
pub mod template;

pub use customer::Customer;
pub use order::{Order, sanitize_order_items};
pub use product::{Product, ProductStatus};
pub use settings::Settings;
pub use store_template::{StoreTemplate, StoreView};
pub use template::BaseTemplate;
