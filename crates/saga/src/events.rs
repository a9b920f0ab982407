//! Order status events published to the notification bus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::{OrderId, UserId};
use domain::{Order, OrderStatus, PaymentStatus};

/// Topic that order status changes are published to.
pub const ORDER_STATUS_TOPIC: &str = "order-status";

/// Snapshot of an order's status, published after creation and after
/// every status change. Payment-status-only changes are not published.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusEvent {
    /// The order that changed.
    pub order_id: OrderId,
    /// The order's owner.
    pub user_id: UserId,
    /// Status after the change.
    pub status: OrderStatus,
    /// Payment status at the time of the change.
    pub payment_status: PaymentStatus,
    /// When the event was built.
    pub occurred_at: DateTime<Utc>,
}

impl OrderStatusEvent {
    /// Builds an event from the order's current state.
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id,
            user_id: order.user_id,
            status: order.status,
            payment_status: order.payment_status,
            occurred_at: Utc::now(),
        }
    }
}
