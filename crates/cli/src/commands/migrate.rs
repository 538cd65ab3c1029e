//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! jb-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `JABUTICABA_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)
//!
//! Migration files live in `crates/server/migrations/` and are embedded at
//! compile time.

use secrecy::ExposeSecret;
use sqlx::PgPool;

use super::{CommandError, database_url};

/// Run all pending migrations against the configured database.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails to apply.
pub async fn run() -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
