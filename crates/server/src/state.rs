//! Shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::cep::CepClient;
use crate::config::ServerConfig;

/// Everything a handler needs, behind one cheap `Clone`.
///
/// Holds the parsed configuration, the `PostgreSQL` pool, and the CEP
/// directory client. Handlers receive it via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: ServerConfig,
    pool: PgPool,
    cep: CepClient,
}

impl AppState {
    /// Build the state, constructing the CEP directory client from the
    /// configured base URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns the underlying reqwest error if the HTTP client cannot be
    /// built.
    pub fn new(config: ServerConfig, pool: PgPool) -> Result<Self, reqwest::Error> {
        let cep = CepClient::new(&config.cep_directory)?;

        Ok(Self {
            inner: Arc::new(Inner { config, pool, cep }),
        })
    }

    /// The server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// The database pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The CEP directory client.
    #[must_use]
    pub fn cep(&self) -> &CepClient {
        &self.inner.cep
    }
}
