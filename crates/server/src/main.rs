//! Jabuticaba API binary.
//!
//! One axum server hosts both route groups: the public checkout API (CEP
//! resolution, freight quotes, order placement) and the admin order API,
//! which requires the bearer token from `JABUTICABA_ADMIN_TOKEN`. Checkout
//! and admin operate on the same `PostgreSQL` database, so there is a
//! single binary to run.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use sentry::integrations::tracing as sentry_tracing;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jabuticaba_server::config::ServerConfig;
use jabuticaba_server::state::AppState;
use jabuticaba_server::{db, routes};

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env().expect("configuration error");

    // Sentry comes first: the guard must stay alive for the whole run, and
    // the tracing layer installed below forwards into it.
    let _sentry_guard = config.sentry_dsn.as_ref().map(|dsn| {
        sentry::init((
            dsn.as_str(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: config
                    .sentry_environment
                    .clone()
                    .map(std::borrow::Cow::Owned),
                attach_stacktrace: true,
                ..Default::default()
            },
        ))
    });

    init_tracing();

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("database pool error");
    tracing::info!("database pool ready");

    // Migrations are applied out of band (`jb-cli migrate`), never here.

    let state = AppState::new(config.clone(), pool).expect("state init error");

    let app = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers go outermost so every request is covered
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await.expect("bind error");
    tracing::info!(%addr, "jabuticaba-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

/// Install the tracing subscriber with env-filter and Sentry forwarding.
///
/// `RUST_LOG` wins when set; the fallback keeps this crate at info and
/// tower-http request traces at debug. Warnings and errors become Sentry
/// events, info and debug become breadcrumbs.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jabuticaba_server=info,tower_http=debug".into());

    let sentry_layer =
        sentry_tracing::layer().event_filter(|metadata| match *metadata.level() {
            tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
            tracing::Level::INFO | tracing::Level::DEBUG => {
                sentry_tracing::EventFilter::Breadcrumb
            }
            _ => sentry_tracing::EventFilter::Ignore,
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_layer)
        .init();
}

/// Liveness probe. Says nothing about dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness probe: 503 until the database answers a trivial query.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if sqlx::query("SELECT 1").fetch_one(state.pool()).await.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Resolve on SIGINT or SIGTERM so in-flight checkouts can drain.
async fn shutdown_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c().await.expect("ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, draining");
}
