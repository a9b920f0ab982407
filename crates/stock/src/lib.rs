//! Stock verification boundary.
//!
//! The oracle answers one question: does a product have at least the
//! requested quantity available. Insufficient stock is an ordinary
//! `false` answer; unknown products and upstream outages are errors and
//! are never retried here.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use common::ProductId;

pub use memory::InMemoryStockOracle;

/// Errors from the stock oracle.
#[derive(Debug, Error)]
pub enum StockError {
    /// The product does not exist upstream.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The stock service could not be reached or answered abnormally.
    #[error("Stock service unavailable: {0}")]
    Upstream(String),
}

/// Trait for stock availability checks.
#[async_trait]
pub trait StockOracle: Send + Sync {
    /// Returns true if the product has at least `quantity` units available,
    /// false if it exists but cannot cover the quantity.
    async fn verify_stock(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<bool, StockError>;
}
