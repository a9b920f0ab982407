//! Shared identifier and money types used across the checkout crates.

pub mod ids;
pub mod money;

pub use ids::{AddressId, OrderId, ProductId, UserId};
pub use money::Money;
