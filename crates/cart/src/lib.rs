//! Cart store for the checkout core.
//!
//! Reads are cache-aside: the cache is consulted first and populated on
//! miss. Writes verify stock against the would-be merged quantity, commit
//! to the repository, and only then invalidate the user's cache entry.

pub mod cache;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod store;

pub use cache::CartCache;
pub use error::{CartError, Result};
pub use memory::InMemoryCartRepository;
pub use postgres::PostgresCartRepository;
pub use repository::CartRepository;
pub use store::CartStore;
