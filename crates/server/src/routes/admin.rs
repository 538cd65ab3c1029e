//! Admin route handlers for order management.
//!
//! Every handler takes [`RequireAdminToken`], so authorization is checked
//! per operation rather than through ambient state.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use jabuticaba_core::{OrderId, OrderStatus};

use crate::db::{OrderRepository, ProductRepository};
use crate::error::Result;
use crate::middleware::RequireAdminToken;
use crate::models::{Order, OrderLine, Product};
use crate::state::AppState;

/// Query parameters for the order list.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Optional status filter; must be one of the fixed status set.
    pub status: Option<String>,
}

/// Order list response.
#[derive(Debug, Serialize)]
pub struct ListOrdersResponse {
    pub success: bool,
    pub count: usize,
    pub orders: Vec<Order>,
}

/// Order detail response: header plus lines.
#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    pub success: bool,
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

/// Body of a status update request.
///
/// The status arrives as a plain string and is parsed explicitly, so an
/// unknown value is rejected with a named error instead of a
/// deserialization failure - and before anything touches the database.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// Status update response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusResponse {
    pub success: bool,
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Catalog list response.
#[derive(Debug, Serialize)]
pub struct ListProductsResponse {
    pub success: bool,
    pub count: usize,
    pub products: Vec<Product>,
}

/// List the catalog with current stock levels.
#[instrument(skip(_admin, state))]
pub async fn list_products(
    RequireAdminToken(_admin): RequireAdminToken,
    State(state): State<AppState>,
) -> Result<Json<ListProductsResponse>> {
    let products = ProductRepository::new(state.pool()).list().await?;

    Ok(Json(ListProductsResponse {
        success: true,
        count: products.len(),
        products,
    }))
}

/// List orders, newest first, optionally filtered by status.
#[instrument(skip(_admin, state))]
pub async fn list_orders(
    RequireAdminToken(_admin): RequireAdminToken,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListOrdersResponse>> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()?;

    let orders = OrderRepository::new(state.pool()).list(status).await?;

    Ok(Json(ListOrdersResponse {
        success: true,
        count: orders.len(),
        orders,
    }))
}

/// Fetch one order with its lines.
#[instrument(skip(_admin, state))]
pub async fn order_detail(
    RequireAdminToken(_admin): RequireAdminToken,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderDetailResponse>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo.get(OrderId::new(id)).await?;
    let lines = repo.lines(order.id).await?;

    Ok(Json(OrderDetailResponse {
        success: true,
        order,
        lines,
    }))
}

/// Change an order's status.
///
/// Values outside the fixed status set are rejected without touching the
/// stored status; allowed values still have to be a valid transition from
/// the current one.
#[instrument(skip(_admin, state))]
pub async fn update_status(
    RequireAdminToken(_admin): RequireAdminToken,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>> {
    let new_status: OrderStatus = payload.status.parse()?;

    let change = OrderRepository::new(state.pool())
        .update_status(OrderId::new(id), new_status)
        .await?;

    tracing::info!(
        order_id = %change.order_id,
        from = %change.from,
        to = %change.to,
        "order status updated"
    );

    Ok(Json(UpdateStatusResponse {
        success: true,
        order_id: change.order_id,
        from: change.from,
        to: change.to,
    }))
}
