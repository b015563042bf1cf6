//! Request middleware and extractors.

pub mod auth;
pub mod tenant;

pub use auth::RequireOwner;
