//! Authorization extractor for the admin API.
//!
//! Admin operations take an explicit authorization context instead of
//! relying on ambient session state: every admin handler declares
//! [`RequireAdminToken`] and receives an [`AdminContext`] proving the check
//! happened. The token travels as `Authorization: Bearer <token>` and is
//! compared against `JABUTICABA_ADMIN_TOKEN`.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use secrecy::ExposeSecret;

use crate::error::AppError;
use crate::state::AppState;

/// Proof that the caller presented the admin token.
///
/// Deliberately not `Clone`/constructible outside this module, so the only
/// way a handler gets one is through the extractor.
#[derive(Debug)]
pub struct AdminContext {
    _private: (),
}

/// Extractor that requires the admin bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminToken(admin): RequireAdminToken,
/// ) -> impl IntoResponse {
///     // admin: AdminContext proves authorization was checked
/// }
/// ```
pub struct RequireAdminToken(pub AdminContext);

impl FromRequestParts<AppState> for RequireAdminToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        if token != state.config().admin_token.expose_secret() {
            tracing::warn!("admin request with invalid token");
            return Err(AppError::Unauthorized);
        }

        Ok(Self(AdminContext { _private: () }))
    }
}
