use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use common::{AddressId, Money, OrderId, ProductId, UserId};
use domain::{Order, OrderItem, OrderStatus, PaymentStatus};

use crate::{
    OrderStoreError, Result,
    query::OrderQuery,
    repository::OrderRepository,
};

/// PostgreSQL-backed order repository.
///
/// Orders and their items live in two tables and are written inside one
/// transaction; reads always rejoin the items.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new PostgreSQL order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_order(row: PgRow, items: Vec<OrderItem>) -> Result<Order> {
        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            user_id: UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            items,
            total_amount: Money::from_cents(row.try_get("total_cents")?),
            status: row.try_get::<String, _>("status")?.parse::<OrderStatus>()?,
            payment_status: row
                .try_get::<String, _>("payment_status")?
                .parse::<PaymentStatus>()?,
            address_id: AddressId::from_uuid(row.try_get::<Uuid, _>("address_id")?),
            payment_method: row.try_get("payment_method")?,
            payment_link: row.try_get("payment_link")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_item(row: &PgRow) -> Result<OrderItem> {
        Ok(OrderItem {
            order_id: OrderId::from_uuid(row.try_get::<Uuid, _>("order_id")?),
            product_id: ProductId::new(row.try_get::<String, _>("product_id")?),
            product_name: row.try_get("product_name")?,
            unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
            quantity: row.try_get::<i32, _>("quantity")? as u32,
            subtotal: Money::from_cents(row.try_get("subtotal_cents")?),
        })
    }

    async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItem>> {
        let rows = sqlx::query(
            r#"
            SELECT order_id, product_id, product_name, unit_price_cents, quantity, subtotal_cents
            FROM order_items
            WHERE order_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(order_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_item).collect()
    }

    /// Overwrites one order column plus updated_at, returning the updated
    /// order. The column name is a compile-time constant, never caller
    /// input.
    async fn update_column(
        &self,
        order_id: OrderId,
        column: &'static str,
        value: &str,
    ) -> Result<Order> {
        let sql = format!(
            "UPDATE orders SET {column} = $2, updated_at = $3 WHERE id = $1 \
             RETURNING id, user_id, total_cents, status, payment_status, address_id, \
             payment_method, payment_link, created_at, updated_at"
        );

        let row = sqlx::query(&sql)
            .bind(order_id.as_uuid())
            .bind(value)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Err(OrderStoreError::NotFound(order_id));
        };

        let items = self.items_for(order_id).await?;
        Self::row_to_order(row, items)
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id))]
    async fn insert(&self, order: &Order) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, total_cents, status, payment_status, address_id,
                                payment_method, payment_link, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(order.total_amount.cents())
        .bind(order.status.as_str())
        .bind(order.payment_status.as_str())
        .bind(order.address_id.as_uuid())
        .bind(&order.payment_method)
        .bind(&order.payment_link)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in order.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, position, product_id, product_name,
                                         unit_price_cents, quantity, subtotal_cents)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(item.order_id.as_uuid())
            .bind(position as i32)
            .bind(item.product_id.as_str())
            .bind(&item.product_name)
            .bind(item.unit_price.cents())
            .bind(item.quantity as i32)
            .bind(item.subtotal.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, order_id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, total_cents, status, payment_status, address_id,
                   payment_method, payment_link, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(order_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.items_for(order_id).await?;
                Ok(Some(Self::row_to_order(row, items)?))
            }
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> Result<Order> {
        self.update_column(order_id, "status", status.as_str()).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_payment_status(
        &self,
        order_id: OrderId,
        payment_status: PaymentStatus,
    ) -> Result<Order> {
        self.update_column(order_id, "payment_status", payment_status.as_str())
            .await
    }

    #[tracing::instrument(skip(self, link))]
    async fn set_payment_link(&self, order_id: OrderId, link: &str) -> Result<Order> {
        self.update_column(order_id, "payment_link", link).await
    }

    #[tracing::instrument(skip(self, query), fields(user_id = %query.user_id))]
    async fn query(&self, query: OrderQuery) -> Result<Vec<Order>> {
        let mut sql = String::from(
            "SELECT id, user_id, total_cents, status, payment_status, address_id, \
             payment_method, payment_link, created_at, updated_at \
             FROM orders WHERE user_id = $1",
        );
        let mut param_count = 1;

        // Build dynamic query
        if query.status.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND status = ${param_count}"));
        }
        if query.payment_status.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND payment_status = ${param_count}"));
        }

        sql.push_str(&format!(
            " ORDER BY {} {}",
            query.sort_field.as_column(),
            query.direction.as_sql()
        ));

        let mut sqlx_query = sqlx::query(&sql).bind(query.user_id.as_uuid());
        if let Some(status) = query.status {
            sqlx_query = sqlx_query.bind(status.as_str());
        }
        if let Some(payment_status) = query.payment_status {
            sqlx_query = sqlx_query.bind(payment_status.as_str());
        }

        let rows = sqlx_query.fetch_all(&self.pool).await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // One items query for the whole page, grouped back per order.
        let ids = rows
            .iter()
            .map(|row| row.try_get::<Uuid, _>("id"))
            .collect::<std::result::Result<Vec<Uuid>, sqlx::Error>>()?;

        let item_rows = sqlx::query(
            r#"
            SELECT order_id, product_id, product_name, unit_price_cents, quantity, subtotal_cents
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY position ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for row in &item_rows {
            let item = Self::row_to_item(row)?;
            items_by_order
                .entry(item.order_id.as_uuid())
                .or_default()
                .push(item);
        }

        rows.into_iter()
            .map(|row| {
                let id: Uuid = row.try_get("id")?;
                let items = items_by_order.remove(&id).unwrap_or_default();
                Self::row_to_order(row, items)
            })
            .collect()
    }
}
