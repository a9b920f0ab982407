//! Payment gateway trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{Money, OrderId, UserId};
use thiserror::Error;

/// Errors surfaced by the payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The gateway rejected the link request.
    #[error("Payment link creation failed: {0}")]
    LinkCreation(String),

    /// The gateway could not be reached.
    #[error("Payment gateway unavailable: {0}")]
    Upstream(String),
}

/// Everything the gateway needs to mint a hosted payment link.
#[derive(Debug, Clone)]
pub struct PaymentLinkRequest {
    /// The order being paid for.
    pub order_id: OrderId,
    /// The paying customer.
    pub user_id: UserId,
    /// Amount to collect.
    pub amount: Money,
    /// ISO currency code, lowercase.
    pub currency: String,
    /// Customer name from the profile lookup.
    pub customer_name: String,
    /// Customer email from the profile lookup.
    pub customer_email: String,
    /// Human-readable line shown on the payment page.
    pub description: String,
}

/// Trait for payment link creation.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a hosted payment link and returns its URL.
    async fn create_payment_link(
        &self,
        request: &PaymentLinkRequest,
    ) -> Result<String, PaymentError>;
}

#[derive(Debug, Default)]
struct InMemoryGatewayState {
    requests: Vec<PaymentLinkRequest>,
    next_id: u32,
    fail_on_create: bool,
}

/// In-memory payment gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentGateway {
    state: Arc<RwLock<InMemoryGatewayState>>,
}

impl InMemoryPaymentGateway {
    /// Creates a new in-memory payment gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to fail on the next create call.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create = fail;
    }

    /// Returns the number of link requests the gateway accepted.
    pub fn request_count(&self) -> usize {
        self.state.read().unwrap().requests.len()
    }

    /// Returns the most recently accepted link request.
    pub fn last_request(&self) -> Option<PaymentLinkRequest> {
        self.state.read().unwrap().requests.last().cloned()
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn create_payment_link(
        &self,
        request: &PaymentLinkRequest,
    ) -> Result<String, PaymentError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_create {
            return Err(PaymentError::LinkCreation(
                "Gateway rejected the request".to_string(),
            ));
        }

        state.next_id += 1;
        let link = format!("https://pay.example.com/links/PL-{:04}", state.next_id);
        state.requests.push(request.clone());

        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: Money) -> PaymentLinkRequest {
        PaymentLinkRequest {
            order_id: OrderId::new(),
            user_id: UserId::new(),
            amount,
            currency: "usd".to_string(),
            customer_name: "Ada Lovelace".to_string(),
            customer_email: "ada@example.com".to_string(),
            description: "Order payment".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_returns_sequential_links() {
        let gateway = InMemoryPaymentGateway::new();

        let l1 = gateway
            .create_payment_link(&request(Money::from_cents(1000)))
            .await
            .unwrap();
        let l2 = gateway
            .create_payment_link(&request(Money::from_cents(2000)))
            .await
            .unwrap();

        assert_eq!(l1, "https://pay.example.com/links/PL-0001");
        assert_eq!(l2, "https://pay.example.com/links/PL-0002");
        assert_eq!(gateway.request_count(), 2);
    }

    #[tokio::test]
    async fn test_last_request_captures_details() {
        let gateway = InMemoryPaymentGateway::new();
        gateway
            .create_payment_link(&request(Money::from_cents(4500)))
            .await
            .unwrap();

        let last = gateway.last_request().unwrap();
        assert_eq!(last.amount, Money::from_cents(4500));
        assert_eq!(last.customer_email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_fail_on_create() {
        let gateway = InMemoryPaymentGateway::new();
        gateway.set_fail_on_create(true);

        let result = gateway
            .create_payment_link(&request(Money::from_cents(1000)))
            .await;
        assert!(matches!(result, Err(PaymentError::LinkCreation(_))));
        assert_eq!(gateway.request_count(), 0);
    }
}
