//! Domain error types.

use thiserror::Error;

use common::Money;

/// Errors that can occur while constructing or parsing domain values.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Quantity is zero or beyond the per-row maximum.
    #[error("Quantity must be between 1 and {}", crate::cart::MAX_QUANTITY)]
    InvalidQuantity,

    /// Unit price is non-positive or beyond the per-unit maximum.
    #[error("Unit price must be positive and at most {max}, got {0}", max = crate::cart::MAX_UNIT_PRICE)]
    InvalidUnitPrice(Money),

    /// An order cannot be created from an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The string does not name a declared order status.
    #[error("Unknown order status: {0}")]
    UnknownOrderStatus(String),

    /// The string does not name a declared payment status.
    #[error("Unknown payment status: {0}")]
    UnknownPaymentStatus(String),
}
