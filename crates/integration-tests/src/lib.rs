//! Integration tests for Jabuticaba.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations + seed
//! cargo run -p jabuticaba-cli -- migrate
//! cargo run -p jabuticaba-cli -- seed
//!
//! # Start the server
//! cargo run -p jabuticaba-server
//!
//! # Run the ignored integration tests
//! cargo test -p jabuticaba-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `JABUTICABA_BASE_URL` - Server base URL (default: <http://localhost:3000>)
//! - `JABUTICABA_ADMIN_TOKEN` - Admin bearer token, same value the server
//!   was started with

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("JABUTICABA_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Admin bearer token from the environment.
///
/// # Panics
///
/// Panics if `JABUTICABA_ADMIN_TOKEN` is not set; the admin tests cannot
/// run without it.
#[must_use]
pub fn admin_token() -> String {
    std::env::var("JABUTICABA_ADMIN_TOKEN")
        .expect("JABUTICABA_ADMIN_TOKEN must be set for admin integration tests")
}

/// Build an HTTP client for the tests.
///
/// # Panics
///
/// Panics if the client fails to build.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}
