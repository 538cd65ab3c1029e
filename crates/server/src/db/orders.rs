//! Database operations for orders and their lines.
//!
//! `OrderRepository::create` is the production driver for the checkout
//! commit sequence: it opens one transaction, runs
//! [`place_order`](crate::checkout::place_order) through
//! [`PgOrderTransaction`], and commits only if every step succeeded.
//! Dropping the sqlx transaction on the error path rolls everything back,
//! so a failed commit leaves no order row, no line rows, and no stock
//! change behind.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;

use jabuticaba_core::{
    Cep, Email, OrderId, OrderLineId, OrderStatus, ProductId, StatusError,
};

use super::RepositoryError;
use super::products::ProductRow;
use crate::checkout::{CommitError, OrderTransaction, place_order};
use crate::models::{NewOrder, NewOrderLine, Order, OrderDraft, OrderLine, Product};

/// Errors from a status update: either the transition is not allowed or the
/// database said no.
#[derive(Debug, Error)]
pub enum StatusUpdateError {
    #[error(transparent)]
    Status(#[from] StatusError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A successfully applied status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for order header queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    customer_name: String,
    email: String,
    postal_code: String,
    street: String,
    number: String,
    complement: Option<String>,
    city: String,
    region: String,
    subtotal: Decimal,
    shipping_cost: Decimal,
    total: Decimal,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let postal_code = Cep::parse(&row.postal_code).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid postal code in database: {e}"))
        })?;
        let region = row.region.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid region in database: {e}"))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            customer_name: row.customer_name,
            email,
            postal_code,
            street: row.street,
            number: row.number,
            complement: row.complement,
            city: row.city,
            region,
            subtotal: row.subtotal,
            shipping_cost: row.shipping_cost,
            total: row.total,
            status: row.status,
            created_at: row.created_at,
        })
    }
}

/// Internal row type for order line queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    quantity: i32,
    unit_price: Decimal,
    line_subtotal: Decimal,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        Self {
            id: OrderLineId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            unit_price: row.unit_price,
            line_subtotal: row.line_subtotal,
        }
    }
}

// =============================================================================
// Transactional commit
// =============================================================================

/// [`OrderTransaction`] backed by a live `PostgreSQL` transaction.
pub struct PgOrderTransaction<'a, 'c> {
    tx: &'a mut Transaction<'c, Postgres>,
}

impl OrderTransaction for PgOrderTransaction<'_, '_> {
    async fn fetch_product(&mut self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, stock, created_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(&mut **self.tx)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn insert_order(&mut self, order: &NewOrder) -> Result<OrderId, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO orders (
                customer_name, email, postal_code, street, number, complement,
                city, region, subtotal, shipping_cost, total
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            ",
        )
        .bind(&order.customer_name)
        .bind(order.email.as_str())
        .bind(order.postal_code.as_str())
        .bind(&order.street)
        .bind(&order.number)
        .bind(&order.complement)
        .bind(&order.city)
        .bind(order.region.as_str())
        .bind(order.subtotal)
        .bind(order.shipping_cost)
        .bind(order.total)
        .fetch_one(&mut **self.tx)
        .await?;

        Ok(OrderId::new(id))
    }

    async fn insert_line(
        &mut self,
        order_id: OrderId,
        line: &NewOrderLine,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO order_lines (order_id, product_id, quantity, unit_price, line_subtotal)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(order_id.as_i32())
        .bind(line.product_id.as_i32())
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.line_subtotal)
        .execute(&mut **self.tx)
        .await?;

        Ok(())
    }

    async fn decrement_stock(
        &mut self,
        id: ProductId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        // Guarded so concurrent commits cannot drive stock negative; the
        // row lock taken here is what serializes two commits racing for the
        // same product's last units.
        let result = sqlx::query(
            r"
            UPDATE products
            SET stock = stock - $2
            WHERE id = $1 AND stock >= $2
            ",
        )
        .bind(id.as_i32())
        .bind(quantity)
        .execute(&mut **self.tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Commit an order draft: header, lines, and stock decrements as one
    /// all-or-nothing unit.
    ///
    /// # Errors
    ///
    /// Returns [`CommitError`] if any step aborted; every write made so far
    /// is rolled back before this returns.
    pub async fn create(&self, draft: &OrderDraft) -> Result<OrderId, CommitError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        // An early return here drops `tx`, which rolls the transaction back
        let order_id = place_order(&mut PgOrderTransaction { tx: &mut tx }, draft).await?;

        tx.commit().await.map_err(RepositoryError::from)?;
        Ok(order_id)
    }

    /// Get an order header by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn get(&self, id: OrderId) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, customer_name, email, postal_code, street, number, complement,
                   city, region, subtotal, shipping_cost, total, status, created_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map_or(Err(RepositoryError::NotFound), Order::try_from)
    }

    /// Get the lines of an order, in insertion order.
    ///
    /// The result is stable: repeated reads after a successful commit
    /// return the same set every time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, order_id: OrderId) -> Result<Vec<OrderLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderLineRow>(
            r"
            SELECT id, order_id, product_id, quantity, unit_price, line_subtotal
            FROM order_lines
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(order_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderLine::from).collect())
    }

    /// List orders, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a query fails or a row is corrupt.
    pub async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, RepositoryError> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, OrderRow>(
                    r"
                    SELECT id, customer_name, email, postal_code, street, number, complement,
                           city, region, subtotal, shipping_cost, total, status, created_at
                    FROM orders
                    WHERE status = $1
                    ORDER BY created_at DESC, id DESC
                    ",
                )
                .bind(status)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, OrderRow>(
                    r"
                    SELECT id, customer_name, email, postal_code, street, number, complement,
                           city, region, subtotal, shipping_cost, total, status, created_at
                    FROM orders
                    ORDER BY created_at DESC, id DESC
                    ",
                )
                .fetch_all(self.pool)
                .await?
            }
        };

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Apply a status change after validating the transition.
    ///
    /// The update is guarded on the status the transition was validated
    /// against, so a concurrent change makes this fail with a conflict
    /// instead of silently overwriting.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` if the order does not exist
    /// - `StatusError::InvalidTransition` if the move is not allowed
    pub async fn update_status(
        &self,
        id: OrderId,
        new_status: OrderStatus,
    ) -> Result<StatusChange, StatusUpdateError> {
        let current = sqlx::query_scalar::<_, OrderStatus>(
            r"
            SELECT status FROM orders WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::from)?
        .ok_or(RepositoryError::NotFound)?;

        current.transition_to(new_status)?;

        let result = sqlx::query(
            r"
            UPDATE orders SET status = $2 WHERE id = $1 AND status = $3
            ",
        )
        .bind(id.as_i32())
        .bind(new_status)
        .bind(current)
        .execute(self.pool)
        .await
        .map_err(RepositoryError::from)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict(
                "order status changed concurrently".to_owned(),
            )
            .into());
        }

        Ok(StatusChange {
            order_id: id,
            from: current,
            to: new_status,
        })
    }
}
