//! Checkout orchestration for cart-to-order flows.
//!
//! This crate drives the forward-only checkout saga:
//! 1. Snapshot the cart
//! 2. Verify stock per line item
//! 3. Persist the order (the commit point)
//! 4. Clear the cart in the background
//! 5. Resolve the customer profile
//! 6. Mint and record a payment link
//! 7. Publish the order status event
//!
//! Failures before the commit point leave nothing behind. Failures after
//! it surface to the caller while the order stays persisted; there are no
//! compensating transactions.

pub mod error;
pub mod events;
pub mod orchestrator;
pub mod services;

pub use error::CheckoutError;
pub use events::{ORDER_STATUS_TOPIC, OrderStatusEvent};
pub use orchestrator::OrderOrchestrator;
pub use services::{
    InMemoryNotificationBus, InMemoryPaymentGateway, InMemoryProfileProvider, NotificationBus,
    NotificationError, PaymentError, PaymentGateway, PaymentLinkRequest, ProfileError,
    ProfileProvider, UserProfile,
};
