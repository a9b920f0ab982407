//! Checkout error types.

use cart::CartError;
use common::ProductId;
use domain::DomainError;
use orders::OrderStoreError;
use stock::StockError;
use thiserror::Error;

use crate::services::{PaymentError, ProfileError};

/// Errors that can occur while driving an order through checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A line item exceeded the available stock at checkout time.
    #[error("Insufficient stock for product {product_id}")]
    InsufficientStock { product_id: ProductId },

    /// Domain validation error.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Cart store error.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Order store error.
    #[error("Order store error: {0}")]
    Store(#[from] OrderStoreError),

    /// Stock verification error.
    #[error("Stock error: {0}")]
    Stock(#[from] StockError),

    /// Payment gateway error.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Profile lookup error.
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
