use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::OrderId;
use domain::{Order, OrderStatus, PaymentStatus};

use crate::{
    OrderStoreError, Result,
    query::{OrderQuery, SortDirection, SortField},
    repository::OrderRepository,
};

/// In-memory order repository for testing and default wiring.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty in-memory order repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    async fn update<F>(&self, order_id: OrderId, mutate: F) -> Result<Order>
    where
        F: FnOnce(&mut Order),
    {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&order_id)
            .ok_or(OrderStoreError::NotFound(order_id))?;
        mutate(order);
        Ok(order.clone())
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id))]
    async fn insert(&self, order: &Order) -> Result<()> {
        self.orders.write().await.insert(order.id, order.clone());
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, order_id: OrderId) -> Result<Option<Order>> {
        Ok(self.orders.read().await.get(&order_id).cloned())
    }

    #[tracing::instrument(skip(self))]
    async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> Result<Order> {
        self.update(order_id, |order| order.set_status(status)).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_payment_status(
        &self,
        order_id: OrderId,
        payment_status: PaymentStatus,
    ) -> Result<Order> {
        self.update(order_id, |order| order.set_payment_status(payment_status))
            .await
    }

    #[tracing::instrument(skip(self, link))]
    async fn set_payment_link(&self, order_id: OrderId, link: &str) -> Result<Order> {
        self.update(order_id, |order| order.set_payment_link(link.to_string()))
            .await
    }

    #[tracing::instrument(skip(self, query), fields(user_id = %query.user_id))]
    async fn query(&self, query: OrderQuery) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut matched: Vec<Order> = orders
            .values()
            .filter(|order| {
                if order.user_id != query.user_id {
                    return false;
                }
                if let Some(status) = query.status
                    && order.status != status
                {
                    return false;
                }
                if let Some(payment_status) = query.payment_status
                    && order.payment_status != payment_status
                {
                    return false;
                }
                true
            })
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            let ordering = match query.sort_field {
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                SortField::TotalAmount => a.total_amount.cmp(&b.total_amount),
                SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            };
            match query.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        Ok(matched)
    }
}
