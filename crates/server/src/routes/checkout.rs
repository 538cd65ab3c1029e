//! Checkout route handlers: shipping quote and order placement.

use axum::{Json, extract::State, http::StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use jabuticaba_core::{Cep, OrderId};

use crate::cep::ResolvedAddress;
use crate::checkout::{CartLineInput, PlaceOrderRequest, assemble};
use crate::db::OrderRepository;
use crate::error::Result;
use crate::shipping::{self, ShippingQuote};
use crate::state::AppState;

/// Body of a shipping quote request.
///
/// The cart is optional: a quote for an empty cart simply carries no volume
/// surcharge. Only quantities matter here; ids and prices are validated
/// later, at order placement.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub cart: Vec<CartLineInput>,
}

/// Successful quote: the resolved address plus the freight estimate.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub success: bool,
    pub address: ResolvedAddress,
    pub shipping: ShippingQuote,
}

/// Successful order placement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub success: bool,
    pub order_id: OrderId,
    pub total: Decimal,
}

/// Resolve a CEP and estimate freight for the cart.
///
/// The postal code is validated *before* the directory is consulted; a
/// malformed CEP never causes a network call.
#[instrument(skip(state, payload))]
pub async fn quote(
    State(state): State<AppState>,
    Json(payload): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let cep = Cep::parse(&payload.postal_code)?;
    let address = state.cep().resolve(&cep).await?;

    let total_items: u32 = payload
        .cart
        .iter()
        .map(|line| u32::try_from(line.quantity).unwrap_or(0))
        .sum();
    let shipping = shipping::estimate(&address.region, total_items);

    tracing::debug!(
        cep = %cep,
        region = %address.region,
        total_items,
        amount = %shipping.amount,
        "freight quoted"
    );

    Ok(Json(QuoteResponse {
        success: true,
        address,
        shipping,
    }))
}

/// Place an order: validate, price, and commit atomically.
#[instrument(skip(state, payload))]
pub async fn place_order(
    State(state): State<AppState>,
    Json(payload): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>)> {
    let draft = assemble(&payload)?;

    let order_id = OrderRepository::new(state.pool()).create(&draft).await?;

    tracing::info!(
        order_id = %order_id,
        lines = draft.lines.len(),
        total = %draft.order.total,
        "order placed"
    );

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            success: true,
            order_id,
            total: draft.order.total,
        }),
    ))
}
