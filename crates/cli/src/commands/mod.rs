//! CLI subcommands.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use thiserror::Error;

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Resolve the database URL from the environment.
///
/// Tries `JABUTICABA_DATABASE_URL` first, then the generic `DATABASE_URL`.
pub(crate) fn database_url() -> Result<SecretString, CommandError> {
    std::env::var("JABUTICABA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("JABUTICABA_DATABASE_URL"))
}
