//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server faults to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; responses are the API's JSON envelope
//! `{"success": false, "message": ...}` with a status code matching the
//! error class. Internal causes are logged, never sent to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use jabuticaba_core::{CepParseError, StatusError};

use crate::cep::CepError;
use crate::checkout::{AssembleError, CommitError};
use crate::db::RepositoryError;
use crate::db::orders::StatusUpdateError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Checkout payload failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] AssembleError),

    /// A postal code did not parse; raised before any directory lookup.
    #[error("Invalid postal code: {0}")]
    CepFormat(#[from] CepParseError),

    /// The address directory lookup failed.
    #[error("Directory error: {0}")]
    Directory(#[from] CepError),

    /// An order status value or transition was rejected.
    #[error("Status error: {0}")]
    Status(#[from] StatusError),

    /// The order-creation transaction aborted.
    #[error("Commit error: {0}")]
    Commit(#[from] CommitError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Caller is not authorized for the admin API.
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<StatusUpdateError> for AppError {
    fn from(err: StatusUpdateError) -> Self {
        match err {
            StatusUpdateError::Status(e) => Self::Status(e),
            StatusUpdateError::Repository(e) => Self::Database(e),
        }
    }
}

impl AppError {
    /// Whether this error is a server fault worth reporting to Sentry.
    const fn is_server_fault(&self) -> bool {
        matches!(
            self,
            Self::Database(RepositoryError::Database(_) | RepositoryError::DataCorruption(_))
                | Self::Commit(CommitError::Store(_))
                | Self::Directory(
                    CepError::Transport(_) | CepError::Api { .. } | CepError::Parse(_)
                )
        )
    }

    /// HTTP status for this error class.
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::CepFormat(_) | Self::Status(StatusError::Unknown(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Status(StatusError::InvalidTransition { .. }) => StatusCode::CONFLICT,
            Self::Directory(err) => match err {
                CepError::NotFound => StatusCode::NOT_FOUND,
                CepError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                CepError::Transport(_) | CepError::Api { .. } | CepError::Parse(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
            Self::Commit(err) => match err {
                CommitError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                CommitError::InsufficientStock { .. } | CommitError::PriceChanged { .. } => {
                    StatusCode::CONFLICT
                }
                CommitError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Client-facing message. Server faults get a generic message; the
    /// original cause stays in the logs.
    fn client_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::CepFormat(err) => err.to_string(),
            Self::Directory(err) => match err {
                CepError::NotFound => "CEP not found".to_owned(),
                CepError::Timeout => {
                    "The address directory did not respond in time. Try again.".to_owned()
                }
                CepError::Transport(_) | CepError::Api { .. } | CepError::Parse(_) => {
                    "The address directory is unavailable. Try again later.".to_owned()
                }
            },
            Self::Status(err) => err.to_string(),
            Self::Commit(err) => match err {
                CommitError::ProductNotFound(id) => format!("product {id} not found"),
                CommitError::InsufficientStock { .. } | CommitError::PriceChanged { .. } => {
                    err.to_string()
                }
                CommitError::Store(_) => {
                    "Could not process your order. No charge was made.".to_owned()
                }
            },
            Self::Database(err) => match err {
                RepositoryError::NotFound => "not found".to_owned(),
                RepositoryError::Conflict(msg) => msg.clone(),
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    "Internal server error".to_owned()
                }
            },
            Self::Unauthorized => "Unauthorized".to_owned(),
            Self::NotFound(what) => format!("Not found: {what}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server faults to Sentry
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let status = self.status_code();
        let body = serde_json::json!({
            "success": false,
            "message": self.client_message(),
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use jabuticaba_core::{OrderStatus, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_validation_maps_to_422() {
        assert_eq!(
            status_of(AppError::Validation(AssembleError::MissingField("email"))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(AppError::CepFormat(CepParseError::Empty)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_directory_outcomes_are_distinct() {
        assert_eq!(
            status_of(AppError::Directory(CepError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Directory(CepError::Timeout)),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_of(AppError::Directory(CepError::Api { status: 500 })),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_status_errors() {
        assert_eq!(
            status_of(AppError::Status(StatusError::Unknown("shipped-ish".into()))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(AppError::Status(StatusError::InvalidTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Paid,
            })),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_commit_errors() {
        assert_eq!(
            status_of(AppError::Commit(CommitError::ProductNotFound(
                ProductId::new(9)
            ))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Commit(CommitError::InsufficientStock {
                product_id: ProductId::new(1),
                requested: 2,
                available: 1,
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Commit(CommitError::PriceChanged {
                product_id: ProductId::new(1),
                submitted: Decimal::ONE,
                current: Decimal::TWO,
            })),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_store_faults_hide_cause() {
        let err = AppError::Commit(CommitError::Store(RepositoryError::DataCorruption(
            "row 12 has a broken email".to_owned(),
        )));
        assert!(err.is_server_fault());
        let msg = err.client_message();
        assert!(!msg.contains("row 12"));
    }

    #[test]
    fn test_unauthorized() {
        assert_eq!(status_of(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
    }
}
