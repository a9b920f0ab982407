use async_trait::async_trait;

use common::OrderId;
use domain::{Order, OrderStatus, PaymentStatus};

use crate::{Result, query::OrderQuery};

/// Persistence boundary for orders.
///
/// An order and its line items are written and read as a unit. Orders are
/// never deleted; the only fields that change after insert are status,
/// payment status, payment link, and updated_at.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists a new order with its items in a single commit.
    async fn insert(&self, order: &Order) -> Result<()>;

    /// Returns the order with its items, if it exists.
    async fn get(&self, order_id: OrderId) -> Result<Option<Order>>;

    /// Overwrites the order's status and returns the updated order.
    async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> Result<Order>;

    /// Overwrites the order's payment status and returns the updated order.
    async fn update_payment_status(
        &self,
        order_id: OrderId,
        payment_status: PaymentStatus,
    ) -> Result<Order>;

    /// Records the gateway payment link and returns the updated order.
    async fn set_payment_link(&self, order_id: OrderId, link: &str) -> Result<Order>;

    /// Lists a user's orders with the query's filters and sort applied.
    async fn query(&self, query: OrderQuery) -> Result<Vec<Order>>;
}
