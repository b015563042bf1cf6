//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (pings the database)
//!
//! # Public storefront
//! GET  /store/{subdomain}                        - Resolved published store
//! GET  /api/store-templates/subdomain/{sub}      - Same payload, API path
//! GET  /api/store-templates/{id}                 - Published template by id
//! GET  /api/products/public                      - Active products for a store
//!
//! # Settings (owner)
//! GET    /api/settings              - All settings rows for the owner
//! GET    /api/settings/{id}         - One settings row
//! POST   /api/settings              - Create (first/last name, email, store name)
//! PUT    /api/settings/store        - Update store info (requires store_name)
//! PUT    /api/settings/{id}         - Partial update
//! DELETE /api/settings/{id}         - Delete
//!
//! # Store template (owner; one per account)
//! GET    /api/store-templates           - The owner's template
//! POST   /api/store-templates           - Create or update
//! PUT    /api/store-templates/publish   - Publish (optional subdomain override)
//! PUT    /api/store-templates/unpublish - Take offline
//! DELETE /api/store-templates           - Delete
//!
//! # Base template gallery (owner)
//! GET/POST       /api/templates
//! GET/PUT/DELETE /api/templates/{id}
//!
//! # Customers / Orders / Products (owner-scoped CRUD)
//! GET/POST       /api/customers   /api/orders   /api/products
//! GET/PUT/DELETE /api/customers/{id} /api/orders/{id} /api/products/{id}
//! GET            /api/products/summary - Dashboard aggregates
//!
//! # Storage
//! POST /api/storage/upload-image   - Multipart image upload (5 MiB cap)
//! GET  /api/storage/images         - List uploaded images
//! ```
//!
//! Success responses use the `{ "success": true, "data": ... }` envelope;
//! errors use `{ "error": "..." }`.

pub mod customers;
pub mod health;
pub mod orders;
pub mod products;
pub mod settings;
pub mod storage;
pub mod store;
pub mod store_templates;
pub mod templates;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use serde::Serialize;

use crate::services::storage::MAX_IMAGE_BYTES;

use crate::state::AppState;

/// The `{ success, data, message? }` envelope for successful responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload.
    pub const fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    /// Wrap a payload with a human-readable message.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

/// Create the settings routes router.
pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(settings::list).post(settings::create))
        .route("/store", put(settings::update_store_info))
        .route(
            "/{id}",
            get(settings::show)
                .put(settings::update)
                .delete(settings::delete),
        )
}

/// Create the store template routes router.
pub fn store_template_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(store_templates::show_own)
                .post(store_templates::upsert)
                .delete(store_templates::delete),
        )
        .route("/publish", put(store_templates::publish))
        .route("/unpublish", put(store_templates::unpublish))
        .route(
            "/subdomain/{subdomain}",
            get(store_templates::show_by_subdomain),
        )
        .route("/{id}", get(store_templates::show_by_id))
}

/// Create the base template gallery routes router.
pub fn template_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(templates::list).post(templates::create))
        .route(
            "/{id}",
            get(templates::show)
                .put(templates::update)
                .delete(templates::delete),
        )
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::list).post(customers::create))
        .route(
            "/{id}",
            get(customers::show)
                .put(customers::update)
                .delete(customers::delete),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route(
            "/{id}",
            get(orders::show).put(orders::update).delete(orders::delete),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route("/public", get(products::list_public))
        .route("/summary", get(products::summary))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the storage routes router.
pub fn storage_routes() -> Router<AppState> {
    Router::new()
        .route("/upload-image", post(storage::upload_image))
        .route("/images", get(storage::list_images))
        // Leave headroom over the image cap for multipart framing.
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 64 * 1024))
}

/// Assemble the full application router.
pub fn router() -> Router<AppState> {
    let api = Router::new()
        .nest("/settings", settings_routes())
        .nest("/store-templates", store_template_routes())
        .nest("/templates", template_routes())
        .nest("/customers", customer_routes())
        .nest("/orders", order_routes())
        .nest("/products", product_routes())
        .nest("/storage", storage_routes());

    Router::new()
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/store/{subdomain}", get(store::show))
        .nest("/api", api)
}
