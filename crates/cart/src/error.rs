use thiserror::Error;

use common::ProductId;
use domain::DomainError;
use stock::StockError;

/// Errors that can occur when interacting with the cart store.
#[derive(Debug, Error)]
pub enum CartError {
    /// Stock cannot cover the would-be merged quantity.
    #[error("Insufficient stock for {product_id}: requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
    },

    /// The cart has no row for the product.
    #[error("Cart item not found: {0}")]
    ItemNotFound(ProductId),

    /// The stock oracle failed or does not know the product.
    #[error("Stock check failed: {0}")]
    Stock(#[from] StockError),

    /// A domain validation error occurred.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for cart store operations.
pub type Result<T> = std::result::Result<T, CartError>;
