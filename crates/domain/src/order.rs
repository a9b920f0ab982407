//! Orders and their line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::{AddressId, Money, OrderId, ProductId, UserId};

use crate::cart::{CartItem, CartSnapshot};
use crate::error::DomainError;
use crate::status::{OrderStatus, PaymentStatus};

/// A line item on an order.
///
/// Carries its parent order id rather than a back-pointer, and captures
/// the product name, unit price, and subtotal as they were when the order
/// was created. Later cart or catalog changes never touch these rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The order this item belongs to.
    pub order_id: OrderId,

    /// The product identifier.
    pub product_id: ProductId,

    /// Product name at order time.
    pub product_name: String,

    /// Price per unit at order time, in cents.
    pub unit_price: Money,

    /// Quantity ordered.
    pub quantity: u32,

    /// Line subtotal (quantity * unit_price), fixed at construction.
    pub subtotal: Money,
}

impl OrderItem {
    /// Copies a cart row into an order line item.
    pub fn from_cart_item(order_id: OrderId, item: &CartItem) -> Self {
        Self {
            order_id,
            product_id: item.product_id.clone(),
            product_name: item.product_name.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            subtotal: item.line_total(),
        }
    }
}

/// A persisted order.
///
/// Items and total are fixed when the order is built from a cart snapshot.
/// Only status, payment status, payment link, and updated_at change after
/// creation; orders are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,

    /// Customer who placed the order.
    pub user_id: UserId,

    /// Point-in-time copy of the cart rows.
    pub items: Vec<OrderItem>,

    /// Order total, fixed at creation from the snapshot.
    pub total_amount: Money,

    /// Lifecycle status.
    pub status: OrderStatus,

    /// Payment status, tracked independently.
    pub payment_status: PaymentStatus,

    /// Shipping address chosen at checkout.
    pub address_id: AddressId,

    /// Payment method chosen at checkout, when one was given.
    pub payment_method: Option<String>,

    /// Gateway payment link; None until the gateway call succeeds.
    pub payment_link: Option<String>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last status, payment-status, or link change.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Builds an order from a cart snapshot.
    ///
    /// The items and total are a point-in-time copy of the snapshot; the
    /// order starts as CREATED with payment PENDING and no payment link.
    /// An empty snapshot is rejected.
    pub fn from_cart(
        user_id: UserId,
        address_id: AddressId,
        payment_method: Option<String>,
        cart: &CartSnapshot,
    ) -> Result<Self, DomainError> {
        if cart.is_empty() {
            return Err(DomainError::EmptyCart);
        }

        let id = OrderId::new();
        let now = Utc::now();
        let items: Vec<OrderItem> = cart
            .items
            .iter()
            .map(|item| OrderItem::from_cart_item(id, item))
            .collect();

        Ok(Self {
            id,
            user_id,
            total_amount: items.iter().map(|item| item.subtotal).sum(),
            items,
            status: OrderStatus::Created,
            payment_status: PaymentStatus::Pending,
            address_id,
            payment_method,
            payment_link: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Overwrites the lifecycle status and touches updated_at.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Overwrites the payment status and touches updated_at.
    pub fn set_payment_status(&mut self, payment_status: PaymentStatus) {
        self.payment_status = payment_status;
        self.updated_at = Utc::now();
    }

    /// Records the gateway payment link and touches updated_at.
    pub fn set_payment_link(&mut self, link: String) {
        self.payment_link = Some(link);
        self.updated_at = Utc::now();
    }

    /// Returns the number of line items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(user_id: UserId) -> CartSnapshot {
        let items = vec![
            CartItem::new(user_id, "SKU-001", "Widget", Money::from_cents(1000), 2).unwrap(),
            CartItem::new(user_id, "SKU-002", "Gadget", Money::from_cents(500), 1).unwrap(),
        ];
        CartSnapshot::new(user_id, items)
    }

    #[test]
    fn test_from_cart_copies_items_and_total() {
        let user_id = UserId::new();
        let order = Order::from_cart(user_id, AddressId::new(), None, &snapshot(user_id)).unwrap();

        assert_eq!(order.user_id, user_id);
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.total_amount, Money::from_cents(2500));
        assert_eq!(order.items[0].subtotal, Money::from_cents(2000));
        assert_eq!(order.items[1].subtotal, Money::from_cents(500));
    }

    #[test]
    fn test_from_cart_starts_created_and_pending() {
        let user_id = UserId::new();
        let order = Order::from_cart(user_id, AddressId::new(), None, &snapshot(user_id)).unwrap();

        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.payment_link, None);
        assert_eq!(order.created_at, order.updated_at);
    }

    #[test]
    fn test_from_cart_stamps_items_with_parent_id() {
        let user_id = UserId::new();
        let order = Order::from_cart(user_id, AddressId::new(), None, &snapshot(user_id)).unwrap();

        for item in &order.items {
            assert_eq!(item.order_id, order.id);
        }
    }

    #[test]
    fn test_from_cart_rejects_empty_cart() {
        let user_id = UserId::new();
        let empty = CartSnapshot::empty(user_id);
        let err = Order::from_cart(user_id, AddressId::new(), None, &empty).unwrap_err();
        assert!(matches!(err, DomainError::EmptyCart));
    }

    #[test]
    fn test_items_unaffected_by_later_cart_changes() {
        let user_id = UserId::new();
        let mut cart = snapshot(user_id);
        let order = Order::from_cart(user_id, AddressId::new(), None, &cart).unwrap();

        cart.items.clear();
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.total_amount, Money::from_cents(2500));
    }

    #[test]
    fn test_set_status_touches_updated_at() {
        let user_id = UserId::new();
        let mut order =
            Order::from_cart(user_id, AddressId::new(), None, &snapshot(user_id)).unwrap();
        let created = order.created_at;

        order.set_status(OrderStatus::Shipped);
        assert_eq!(order.status, OrderStatus::Shipped);
        assert!(order.updated_at >= created);
        assert_eq!(order.created_at, created);
    }

    #[test]
    fn test_set_payment_link() {
        let user_id = UserId::new();
        let mut order =
            Order::from_cart(user_id, AddressId::new(), None, &snapshot(user_id)).unwrap();

        order.set_payment_link("https://pay.example/abc".to_string());
        assert_eq!(
            order.payment_link.as_deref(),
            Some("https://pay.example/abc")
        );
    }

    #[test]
    fn test_payment_method_carried_through() {
        let user_id = UserId::new();
        let order = Order::from_cart(
            user_id,
            AddressId::new(),
            Some("card".to_string()),
            &snapshot(user_id),
        )
        .unwrap();
        assert_eq!(order.payment_method.as_deref(), Some("card"));
    }
}
