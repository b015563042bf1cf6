//! Integration tests for Shoplark.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! shoplark-cli migrate
//!
//! # Start the server
//! cargo run -p shoplark-server
//!
//! # Run integration tests
//! cargo test -p shoplark-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `SHOPLARK_BASE_URL` - Server base URL (default `http://localhost:3000`)
//! - `SHOPLARK_TEST_TOKEN` - Bearer token for an existing owner account
//!
//! All tests are `#[ignore]`d by default since they need a running server
//! with a reachable database and auth backend.
