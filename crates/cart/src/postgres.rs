use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use common::{Money, ProductId, UserId};
use domain::CartItem;

use crate::{Result, repository::CartRepository};

/// PostgreSQL-backed cart repository.
#[derive(Clone)]
pub struct PostgresCartRepository {
    pool: PgPool,
}

impl PostgresCartRepository {
    /// Creates a new PostgreSQL cart repository.
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

    fn row_to_item(row: PgRow) -> Result<CartItem> {
        Ok(CartItem {
            user_id: UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            product_id: ProductId::new(row.try_get::<String, _>("product_id")?),
            product_name: row.try_get("product_name")?,
            unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
            quantity: row.try_get::<i32, _>("quantity")? as u32,
        })
    }
}

#[async_trait]
impl CartRepository for PostgresCartRepository {
    async fn find(&self, user_id: UserId, product_id: &ProductId) -> Result<Option<CartItem>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, product_id, product_name, unit_price_cents, quantity
            FROM cart_items
            WHERE user_id = $1 AND product_id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(product_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_item).transpose()
    }

    async fn list(&self, user_id: UserId) -> Result<Vec<CartItem>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, product_id, product_name, unit_price_cents, quantity
            FROM cart_items
            WHERE user_id = $1
            ORDER BY product_id ASC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_item).collect()
    }

    async fn upsert(&self, item: &CartItem) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO cart_items (user_id, product_id, product_name, unit_price_cents, quantity)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, product_id) DO UPDATE SET
                product_name = EXCLUDED.product_name,
                unit_price_cents = EXCLUDED.unit_price_cents,
                quantity = EXCLUDED.quantity
            "#,
        )
        .bind(item.user_id.as_uuid())
        .bind(item.product_id.as_str())
        .bind(&item.product_name)
        .bind(item.unit_price.cents())
        .bind(item.quantity as i32)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, user_id: UserId, product_id: &ProductId) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM cart_items
            WHERE user_id = $1 AND product_id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(product_id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self, user_id: UserId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
