//! Order store for the checkout core.
//!
//! Orders and their line items persist as a unit and are never deleted.
//! Listings are always per-user, with optional status and payment-status
//! filters and a configurable sort.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod repository;

pub use error::{OrderStoreError, Result};
pub use memory::InMemoryOrderRepository;
pub use postgres::PostgresOrderRepository;
pub use query::{OrderQuery, SortDirection, SortField};
pub use repository::OrderRepository;
