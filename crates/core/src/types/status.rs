//! Order status and its allowed transitions.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors raised when parsing or changing an order status.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    /// The requested value is not one of the fixed status set.
    #[error(
        "unknown order status: {0:?}. Use: pending, paid, shipped, delivered or cancelled"
    )]
    Unknown(String),
    /// The requested transition is not allowed from the current status.
    #[error("cannot change order status from '{from}' to '{to}'")]
    InvalidTransition {
        /// Current stored status.
        from: OrderStatus,
        /// Requested status.
        to: OrderStatus,
    },
}

/// Lifecycle status of an order.
///
/// The allowed transitions form a forward chain with cancellation as a side
/// exit from any non-terminal state:
///
/// ```text
/// pending -> paid -> shipped -> delivered
///    |        |         |
///    +--------+---------+-----> cancelled
/// ```
///
/// `delivered` and `cancelled` are terminal. Orders are always created as
/// `pending`; the transition rules are enforced at the status-update
/// boundary, not at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// The lowercase wire/database form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether no further transitions are allowed from this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether moving from `self` to `to` is an allowed transition.
    #[must_use]
    pub const fn can_transition_to(&self, to: Self) -> bool {
        match (self, to) {
            (Self::Pending, Self::Paid)
            | (Self::Paid, Self::Shipped)
            | (Self::Shipped, Self::Delivered) => true,
            (Self::Pending | Self::Paid | Self::Shipped, Self::Cancelled) => true,
            _ => false,
        }
    }

    /// Validate a transition from `self` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError::InvalidTransition`] if the move is not in the
    /// allowed set (this includes "transitions" to the current status).
    pub const fn transition_to(self, to: Self) -> Result<Self, StatusError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(StatusError::InvalidTransition { from: self, to })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(StatusError::Unknown(other.to_owned())),
        }
    }
}
