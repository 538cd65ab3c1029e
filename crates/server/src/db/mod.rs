//! `PostgreSQL` persistence layer.
//!
//! Three tables: `products` (the catalog, with the mutable stock counter),
//! `orders` (headers), and `order_lines` (cascade-owned line items).
//! Schema migrations live in `crates/server/migrations/` and are applied
//! with `jb-cli migrate` - never automatically at startup.

pub mod orders;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use orders::OrderRepository;
pub use products::ProductRepository;

const POOL_MAX_CONNECTIONS: u32 = 10;
const POOL_MIN_CONNECTIONS: u32 = 2;
const POOL_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Failures surfaced by the repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying sqlx call failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row no longer parses into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The requested entity does not exist.
    #[error("not found")]
    NotFound,

    /// A constraint or concurrent update got in the way.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Open the connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` when the database cannot be reached within the
/// acquire timeout.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(POOL_MAX_CONNECTIONS)
        .min_connections(POOL_MIN_CONNECTIONS)
        .acquire_timeout(POOL_ACQUIRE_TIMEOUT)
        .connect(database_url.expose_secret())
        .await
}
