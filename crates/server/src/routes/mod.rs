//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check (verifies database)
//!
//! # Checkout (public)
//! POST /api/checkout/quote            - Resolve CEP + estimate freight
//! POST /api/checkout/orders           - Place an order
//!
//! # Admin (requires bearer token)
//! GET  /api/admin/products            - Catalog with stock levels
//! GET  /api/admin/orders              - List orders (?status= filter)
//! GET  /api/admin/orders/{id}         - Order detail with lines
//! PUT  /api/admin/orders/{id}/status  - Change order status
//! ```

pub mod admin;
pub mod checkout;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/checkout/quote", post(checkout::quote))
        .route("/api/checkout/orders", post(checkout::place_order))
        .route("/api/admin/products", get(admin::list_products))
        .route("/api/admin/orders", get(admin::list_orders))
        .route("/api/admin/orders/{id}", get(admin::order_detail))
        .route("/api/admin/orders/{id}/status", put(admin::update_status))
}
