use thiserror::Error;

use common::OrderId;
use domain::DomainError;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// No order exists with the given id.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The string does not name a sortable field.
    #[error("Unknown sort field: {0}")]
    InvalidSortField(String),

    /// The string does not name a sort direction.
    #[error("Unknown sort direction: {0}")]
    InvalidSortDirection(String),

    /// A stored value failed domain parsing.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, OrderStoreError>;
