//! Shoplark Core - Shared types library.
//!
//! This crate provides the common types the `server` crate builds on: the
//! API backend serving sellers and public storefronts.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, owner identities,
//!   and subdomains

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
