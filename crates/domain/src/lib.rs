//! Domain model for the checkout core.
//!
//! This crate provides the cart and order types:
//! - CartItem rows and the derived CartSnapshot view
//! - Order and OrderItem, built as a point-in-time copy of a cart
//! - OrderStatus and PaymentStatus enums with strict string parsing

pub mod cart;
pub mod error;
pub mod order;
pub mod status;

pub use cart::{CartItem, CartSnapshot, MAX_QUANTITY, MAX_UNIT_PRICE};
pub use error::DomainError;
pub use order::{Order, OrderItem};
pub use status::{OrderStatus, PaymentStatus};
