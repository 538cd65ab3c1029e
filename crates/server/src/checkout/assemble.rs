//! Order assembly: payload validation and pricing.
//!
//! Takes the untrusted checkout payload, validates every field, and computes
//! the totals in decimal arithmetic. The output is an [`OrderDraft`] ready
//! for the commit step - nothing is persisted here.

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use jabuticaba_core::{Cep, CepParseError, Email, EmailError, ProductId, Uf, UfParseError};

use crate::models::{NewOrder, NewOrderLine, OrderDraft};

/// Errors produced while validating a checkout payload.
///
/// Each variant names exactly what the caller got wrong, so the client can
/// point at the offending field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssembleError {
    /// A required field is missing or blank after trimming.
    #[error("field '{0}' is required")]
    MissingField(&'static str),

    /// The email does not pass the syntax check.
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    /// The postal code does not normalize to 8 digits.
    #[error("invalid postal code: {0}")]
    PostalCode(#[from] CepParseError),

    /// The region is not one of the 27 federative units.
    #[error("invalid region: {0}")]
    Region(#[from] UfParseError),

    /// The cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line is malformed.
    #[error("cart line {index} is invalid: {reason}")]
    InvalidCartLine {
        /// Zero-based position of the bad line.
        index: usize,
        reason: &'static str,
    },

    /// The quoted shipping cost is negative.
    #[error("shipping cost cannot be negative")]
    NegativeShipping,
}

/// A single cart line as submitted by the client.
///
/// The price is the client's view of the catalog at quote time; it is
/// verified against the catalog row inside the commit transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct CartLineInput {
    #[serde(default = "missing_product_id")]
    pub id: ProductId,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub price: Decimal,
}

/// Sentinel for an absent product id; rejected by line validation.
const fn missing_product_id() -> ProductId {
    ProductId::new(0)
}

/// The checkout payload: customer, address, quoted shipping, cart.
///
/// All fields default so that absent keys surface as named validation
/// errors rather than deserialization rejections.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub complement: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub shipping_cost: Decimal,
    #[serde(default)]
    pub cart: Vec<CartLineInput>,
}

/// Validate a checkout payload and build the priced order draft.
///
/// Subtotal is `Σ(price × quantity)` over all lines, computed in `Decimal`;
/// total is subtotal plus the quoted shipping cost. The draft's header
/// starts life as `pending` when committed.
///
/// # Errors
///
/// Returns the first [`AssembleError`] found, in field order.
pub fn assemble(request: &PlaceOrderRequest) -> Result<OrderDraft, AssembleError> {
    let customer_name = required(&request.customer_name, "customerName")?;
    let email_raw = required(&request.email, "email")?;
    let postal_raw = required(&request.postal_code, "postalCode")?;
    let street = required(&request.street, "street")?;
    let number = required(&request.number, "number")?;
    let city = required(&request.city, "city")?;
    let region_raw = required(&request.region, "region")?;

    let email = Email::parse(&email_raw)?;
    let postal_code = Cep::parse(&postal_raw)?;
    let region: Uf = region_raw.parse()?;

    let complement = request
        .complement
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned);

    if request.shipping_cost < Decimal::ZERO {
        return Err(AssembleError::NegativeShipping);
    }
    // Monetary values are normalized to centavo precision so that totals
    // always carry two decimal places regardless of how the JSON was written
    let mut shipping_cost = request.shipping_cost;
    shipping_cost.rescale(2);

    if request.cart.is_empty() {
        return Err(AssembleError::EmptyCart);
    }

    let mut lines = Vec::with_capacity(request.cart.len());
    let mut subtotal = Decimal::ZERO;

    for (index, line) in request.cart.iter().enumerate() {
        if line.id.as_i32() <= 0 {
            return Err(AssembleError::InvalidCartLine {
                index,
                reason: "missing product id",
            });
        }
        if line.quantity <= 0 {
            return Err(AssembleError::InvalidCartLine {
                index,
                reason: "quantity must be positive",
            });
        }
        if line.price <= Decimal::ZERO {
            return Err(AssembleError::InvalidCartLine {
                index,
                reason: "price must be positive",
            });
        }

        let mut unit_price = line.price;
        unit_price.rescale(2);

        let line_subtotal = unit_price * Decimal::from(line.quantity);
        subtotal += line_subtotal;

        lines.push(NewOrderLine {
            product_id: line.id,
            quantity: line.quantity,
            unit_price,
            line_subtotal,
        });
    }

    let total = subtotal + shipping_cost;

    Ok(OrderDraft {
        order: NewOrder {
            customer_name,
            email,
            postal_code,
            street,
            number,
            complement,
            city,
            region,
            subtotal,
            shipping_cost,
            total,
        },
        lines,
    })
}

/// Trim a required field, rejecting blanks with the wire-level field name.
fn required(value: &str, field: &'static str) -> Result<String, AssembleError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AssembleError::MissingField(field));
    }
    Ok(trimmed.to_owned())
}
