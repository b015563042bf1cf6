//! Core types for Shoplark.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod owner;
pub mod subdomain;

pub use email::{Email, EmailError};
pub use id::*;
pub use owner::OwnerId;
pub use subdomain::{Subdomain, SubdomainError};
