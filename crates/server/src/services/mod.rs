//! External service clients and core storefront logic.
//!
//! - [`auth`] / [`storage`] - reqwest clients for the external backend
//! - [`tenant`] - hostname to store subdomain extraction
//! - [`resolver`] - published store resolution with payment-asset fallback
//! - [`sync`] - settings/template synchronization policy

pub mod auth;
pub mod resolver;
pub mod storage;
pub mod sync;
pub mod tenant;

pub use auth::AuthClient;
pub use storage::StorageClient;
