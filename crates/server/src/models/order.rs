//! Order and order line models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use jabuticaba_core::{Cep, Email, OrderId, OrderLineId, OrderStatus, ProductId, Uf};

/// A persisted order header.
///
/// Invariant: `total == subtotal + shipping_cost`. Orders are created once
/// in status `pending`; only the status changes afterwards, and orders are
/// never physically deleted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub email: Email,
    pub postal_code: Cep,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub city: String,
    pub region: Uf,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// A persisted order line.
///
/// `unit_price` is a historical snapshot taken at commit time; later catalog
/// price changes never touch it. Lines are immutable and cascade-owned by
/// their order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: OrderLineId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_subtotal: Decimal,
}

/// An order header ready for insertion (no id yet, status implied `pending`).
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_name: String,
    pub email: Email,
    pub postal_code: Cep,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub city: String,
    pub region: Uf,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
}

/// An order line ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_subtotal: Decimal,
}

/// A validated, priced order waiting to be committed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub order: NewOrder,
    pub lines: Vec<NewOrderLine>,
}
