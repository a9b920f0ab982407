//! External service traits and in-memory implementations for checkout.

pub mod notification;
pub mod payment;
pub mod profile;

pub use notification::{InMemoryNotificationBus, NotificationBus, NotificationError};
pub use payment::{InMemoryPaymentGateway, PaymentError, PaymentGateway, PaymentLinkRequest};
pub use profile::{InMemoryProfileProvider, ProfileError, ProfileProvider, UserProfile};
