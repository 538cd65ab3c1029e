//! The order-creation transaction.
//!
//! [`place_order`] drives an [`OrderTransaction`] through the write
//! sequence: verify every line against the catalog, insert the header,
//! then insert each line and decrement its product's stock. The caller owns
//! the surrounding database transaction; any error returned from here must
//! cause a rollback so that no partial order is ever visible.
//!
//! The trait seam exists so the all-or-nothing behavior can be exercised
//! against an in-memory store with injected faults; the production
//! implementation lives in [`crate::db::orders`].

use rust_decimal::Decimal;
use thiserror::Error;

use jabuticaba_core::{OrderId, ProductId};

use crate::db::RepositoryError;
use crate::models::{NewOrder, NewOrderLine, OrderDraft, Product};

/// Errors that abort the commit.
///
/// Every variant leaves the store untouched: the driving transaction rolls
/// back whatever had been written.
#[derive(Debug, Error)]
pub enum CommitError {
    /// A cart line references a product that does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// A product does not have enough stock for its line.
    #[error(
        "insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: i32,
        available: i32,
    },

    /// The catalog price no longer matches what the client was quoted.
    #[error("price of product {product_id} changed from {submitted} to {current}")]
    PriceChanged {
        product_id: ProductId,
        submitted: Decimal,
        current: Decimal,
    },

    /// The underlying store failed mid-sequence.
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// The write operations the commit sequence needs from a store, scoped to
/// one transaction. Implementations stage writes; nothing becomes visible
/// until the driver commits.
#[allow(async_fn_in_trait)]
pub trait OrderTransaction {
    /// Read a product row within the transaction.
    async fn fetch_product(&mut self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Insert the order header, returning the generated id.
    async fn insert_order(&mut self, order: &NewOrder) -> Result<OrderId, RepositoryError>;

    /// Insert one line row for an order.
    async fn insert_line(
        &mut self,
        order_id: OrderId,
        line: &NewOrderLine,
    ) -> Result<(), RepositoryError>;

    /// Decrement a product's stock, guarded so it can never go negative.
    /// Returns `false` when the guard refused (stock too low).
    async fn decrement_stock(
        &mut self,
        id: ProductId,
        quantity: i32,
    ) -> Result<bool, RepositoryError>;
}

/// Run the order-creation write sequence.
///
/// All-or-nothing: the caller must roll the transaction back on any `Err`
/// and only commit on `Ok`. Within one commit the insertion order of lines
/// does not matter; what matters is that header, lines, and stock decrements
/// share the transaction.
///
/// Each line is verified against its catalog row before anything is
/// written: the product must exist, have sufficient stock, and still carry
/// the price the client was quoted. The stock decrement is additionally
/// guarded at the store level, which catches a concurrent commit taking the
/// same units between our check and our write.
///
/// # Errors
///
/// Returns [`CommitError`] describing the first failed step.
pub async fn place_order<T: OrderTransaction>(
    tx: &mut T,
    draft: &OrderDraft,
) -> Result<OrderId, CommitError> {
    for line in &draft.lines {
        let product = tx
            .fetch_product(line.product_id)
            .await?
            .ok_or(CommitError::ProductNotFound(line.product_id))?;

        if product.stock < line.quantity {
            return Err(CommitError::InsufficientStock {
                product_id: line.product_id,
                requested: line.quantity,
                available: product.stock,
            });
        }

        if product.price != line.unit_price {
            return Err(CommitError::PriceChanged {
                product_id: line.product_id,
                submitted: line.unit_price,
                current: product.price,
            });
        }
    }

    let order_id = tx.insert_order(&draft.order).await?;

    for line in &draft.lines {
        tx.insert_line(order_id, line).await?;

        let decremented = tx.decrement_stock(line.product_id, line.quantity).await?;
        if !decremented {
            // Lost a race against a concurrent commit for the same units
            let available = tx
                .fetch_product(line.product_id)
                .await?
                .map_or(0, |p| p.stock);
            return Err(CommitError::InsufficientStock {
                product_id: line.product_id,
                requested: line.quantity,
                available,
            });
        }
    }

    Ok(order_id)
}
