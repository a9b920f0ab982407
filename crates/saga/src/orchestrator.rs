//! Checkout orchestrator driving carts through order creation.

use cart::{CartRepository, CartStore};
use common::{AddressId, OrderId, UserId};
use domain::{DomainError, Order, OrderStatus, PaymentStatus};
use orders::{OrderQuery, OrderRepository};
use stock::StockOracle;

use crate::error::{CheckoutError, Result};
use crate::events::{ORDER_STATUS_TOPIC, OrderStatusEvent};
use crate::services::notification::NotificationBus;
use crate::services::payment::{PaymentGateway, PaymentLinkRequest};
use crate::services::profile::ProfileProvider;

/// Currency the payment gateway collects in.
const PAYMENT_CURRENCY: &str = "usd";

/// Orchestrates the checkout flow from cart snapshot to payment link.
///
/// The flow runs forward only. The order insert is the commit point:
/// everything before it fails cleanly, and failures after it (profile
/// lookup, payment link) are surfaced to the caller while the committed
/// order stays in place with no payment link. There is no compensation.
pub struct OrderOrchestrator<C, O, S, P, F, N>
where
    C: CartRepository,
    O: OrderRepository,
    S: StockOracle,
    P: PaymentGateway,
    F: ProfileProvider,
    N: NotificationBus,
{
    carts: CartStore<C, S>,
    orders: O,
    stock: S,
    payments: P,
    profiles: F,
    notifications: N,
}

impl<C, O, S, P, F, N> OrderOrchestrator<C, O, S, P, F, N>
where
    C: CartRepository + Clone + 'static,
    O: OrderRepository,
    S: StockOracle + Clone + 'static,
    P: PaymentGateway,
    F: ProfileProvider,
    N: NotificationBus + Clone + 'static,
{
    /// Creates a new orchestrator over the given stores and services.
    pub fn new(
        carts: CartStore<C, S>,
        orders: O,
        stock: S,
        payments: P,
        profiles: F,
        notifications: N,
    ) -> Self {
        Self {
            carts,
            orders,
            stock,
            payments,
            profiles,
            notifications,
        }
    }

    /// Runs the checkout flow for the user's current cart.
    ///
    /// Returns the created order. On a post-commit failure the error
    /// carries no order, but the order exists and can be fetched; its
    /// payment link stays unset.
    #[tracing::instrument(skip(self, token))]
    pub async fn create_order_from_cart(
        &self,
        user_id: UserId,
        token: &str,
        address_id: AddressId,
        payment_method: Option<String>,
    ) -> Result<Order> {
        metrics::counter!("checkout_attempts_total").increment(1);
        let checkout_start = std::time::Instant::now();

        // 1. Snapshot the cart, straight from the repository.
        let snapshot = self.carts.snapshot_fresh(user_id).await?;

        // 2. An empty cart cannot check out.
        if snapshot.is_empty() {
            return Err(DomainError::EmptyCart.into());
        }

        // 3. Verify stock for every line item, failing fast on the first
        //    shortfall. Each line is checked against its own quantity.
        for item in &snapshot.items {
            if !self
                .stock
                .verify_stock(&item.product_id, item.quantity)
                .await?
            {
                metrics::counter!("checkout_stock_rejections_total").increment(1);
                return Err(CheckoutError::InsufficientStock {
                    product_id: item.product_id.clone(),
                });
            }
        }

        // 4. Build the order from the snapshot.
        let order = Order::from_cart(user_id, address_id, payment_method, &snapshot)?;

        // 5. Persist it. Commit point: from here the order exists and is
        //    never rolled back.
        self.orders.insert(&order).await?;
        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(
            order_id = %order.id,
            %user_id,
            total = %order.total_amount,
            "order created"
        );

        // 6. Clear the cart without blocking the response. A failed clear
        //    leaves stale rows behind, never a missing order.
        let carts = self.carts.clone();
        let order_id = order.id;
        tokio::spawn(async move {
            if let Err(e) = carts.clear_cart(user_id).await {
                tracing::warn!(%order_id, %user_id, error = %e, "cart clear after checkout failed");
            }
        });

        // 7. Resolve the customer profile behind the token.
        let profile = match self.profiles.get_profile(token).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(
                    order_id = %order.id,
                    error = %e,
                    "profile lookup failed after order commit"
                );
                return Err(e.into());
            }
        };

        // 8. Mint the payment link and record it on the order.
        let request = PaymentLinkRequest {
            order_id: order.id,
            user_id,
            amount: order.total_amount,
            currency: PAYMENT_CURRENCY.to_string(),
            customer_name: profile.name,
            customer_email: profile.email,
            description: format!("Order {}", order.id),
        };
        let link = match self.payments.create_payment_link(&request).await {
            Ok(link) => link,
            Err(e) => {
                tracing::warn!(
                    order_id = %order.id,
                    error = %e,
                    "payment link creation failed after order commit"
                );
                return Err(e.into());
            }
        };
        let order = self.orders.set_payment_link(order.id, &link).await?;

        // 9. Announce the order and hand it back.
        self.publish_status(&order);

        let duration = checkout_start.elapsed().as_secs_f64();
        metrics::histogram!("checkout_duration_seconds").record(duration);
        tracing::info!(order_id = %order.id, duration, "checkout completed");

        Ok(order)
    }

    /// Sets the order's lifecycle status from its wire name.
    ///
    /// The name must match one of the canonical status names exactly;
    /// anything else is rejected before the store is touched. Any valid
    /// status is accepted regardless of the current one, and the change
    /// is announced on the bus.
    #[tracing::instrument(skip(self))]
    pub async fn update_order_status(&self, order_id: OrderId, status: &str) -> Result<Order> {
        let status: OrderStatus = status.parse()?;
        let order = self.orders.update_status(order_id, status).await?;
        tracing::info!(%order_id, status = %order.status, "order status updated");
        self.publish_status(&order);
        Ok(order)
    }

    /// Sets the order's payment status from its wire name.
    ///
    /// Payment status changes are not announced on the bus.
    #[tracing::instrument(skip(self))]
    pub async fn update_payment_status(
        &self,
        order_id: OrderId,
        payment_status: &str,
    ) -> Result<Order> {
        let payment_status: PaymentStatus = payment_status.parse()?;
        let order = self
            .orders
            .update_payment_status(order_id, payment_status)
            .await?;
        tracing::info!(
            %order_id,
            payment_status = %order.payment_status,
            "payment status updated"
        );
        Ok(order)
    }

    /// Cancels the order.
    ///
    /// Cancellation is a status change, not a deletion, and is announced
    /// like any other status change.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<Order> {
        let order = self
            .orders
            .update_status(order_id, OrderStatus::Cancelled)
            .await?;
        tracing::info!(%order_id, "order cancelled");
        self.publish_status(&order);
        Ok(order)
    }

    /// Loads an order by ID.
    pub async fn get_order(&self, order_id: OrderId) -> Result<Option<Order>> {
        Ok(self.orders.get(order_id).await?)
    }

    /// Lists a user's orders with the query's filters and sort applied.
    pub async fn orders_for_user(&self, query: OrderQuery) -> Result<Vec<Order>> {
        Ok(self.orders.query(query).await?)
    }

    /// Publishes the order's status snapshot without blocking the caller.
    /// Publish failures are logged and swallowed.
    fn publish_status(&self, order: &Order) {
        let event = OrderStatusEvent::from_order(order);
        let payload = match serde_json::to_value(&event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(order_id = %order.id, error = %e, "order status event serialization failed");
                return;
            }
        };

        let bus = self.notifications.clone();
        let order_id = order.id;
        tokio::spawn(async move {
            if let Err(e) = bus.publish(ORDER_STATUS_TOPIC, payload).await {
                tracing::warn!(%order_id, error = %e, "order status publish failed");
            }
        });
    }
}
