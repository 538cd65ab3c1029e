//! Catalog product model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use jabuticaba_core::ProductId;

/// A catalog product.
///
/// `stock` is the only contended mutable field: order commits decrement it
/// under the same transaction that inserts the order rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}
