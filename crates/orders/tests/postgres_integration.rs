//! PostgreSQL integration tests for the order repository.
//!
//! These tests share one PostgreSQL container and need a running Docker
//! daemon, so they are ignored by default. Run with:
//!
//! ```bash
//! cargo test -p orders --test postgres_integration -- --ignored --test-threads=1
//! ```

use std::sync::Arc;

use common::{AddressId, Money, UserId};
use domain::{CartItem, CartSnapshot, Order, OrderStatus, PaymentStatus};
use orders::{OrderQuery, OrderRepository, OrderStoreError, PostgresOrderRepository, SortDirection, SortField};
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/002_create_orders_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh repository with its own pool and cleared tables
async fn get_test_repository() -> PostgresOrderRepository {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE order_items, orders")
        .execute(&pool)
        .await
        .unwrap();

    PostgresOrderRepository::new(pool)
}

fn order_for(user_id: UserId, cents: i64) -> Order {
    let items = vec![
        CartItem::new(user_id, "SKU-001", "Widget", Money::from_cents(cents), 1).unwrap(),
        CartItem::new(user_id, "SKU-002", "Gadget", Money::from_cents(250), 2).unwrap(),
    ];
    let cart = CartSnapshot::new(user_id, items);
    Order::from_cart(user_id, AddressId::new(), Some("card".to_string()), &cart).unwrap()
}

#[tokio::test]
#[ignore = "requires a running Docker daemon"]
async fn insert_and_get_roundtrip_with_items() {
    let repo = get_test_repository().await;
    let order = order_for(UserId::new(), 1000);

    repo.insert(&order).await.unwrap();

    let loaded = repo.get(order.id).await.unwrap().unwrap();
    assert_eq!(loaded.id, order.id);
    assert_eq!(loaded.total_amount, order.total_amount);
    assert_eq!(loaded.status, OrderStatus::Created);
    assert_eq!(loaded.payment_status, PaymentStatus::Pending);
    assert_eq!(loaded.payment_method.as_deref(), Some("card"));
    assert_eq!(loaded.items.len(), 2);
    assert_eq!(loaded.items[0].product_id.as_str(), "SKU-001");
    assert_eq!(loaded.items[1].subtotal, Money::from_cents(500));
}

#[tokio::test]
#[ignore = "requires a running Docker daemon"]
async fn get_missing_returns_none() {
    let repo = get_test_repository().await;
    let missing = repo.get(common::OrderId::new()).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
#[ignore = "requires a running Docker daemon"]
async fn update_status_persists_and_bumps_updated_at() {
    let repo = get_test_repository().await;
    let order = order_for(UserId::new(), 1000);
    repo.insert(&order).await.unwrap();

    let updated = repo
        .update_status(order.id, OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Shipped);
    assert!(updated.updated_at > order.updated_at);
    assert_eq!(updated.items.len(), 2);
}

#[tokio::test]
#[ignore = "requires a running Docker daemon"]
async fn update_missing_order_is_not_found() {
    let repo = get_test_repository().await;

    let err = repo
        .update_status(common::OrderId::new(), OrderStatus::Shipped)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderStoreError::NotFound(_)));
}

#[tokio::test]
#[ignore = "requires a running Docker daemon"]
async fn set_payment_link_persists() {
    let repo = get_test_repository().await;
    let order = order_for(UserId::new(), 1000);
    repo.insert(&order).await.unwrap();

    let updated = repo
        .set_payment_link(order.id, "https://pay.example/x")
        .await
        .unwrap();
    assert_eq!(updated.payment_link.as_deref(), Some("https://pay.example/x"));
}

#[tokio::test]
#[ignore = "requires a running Docker daemon"]
async fn query_filters_and_sorts() {
    let repo = get_test_repository().await;
    let user_id = UserId::new();

    let cheap = order_for(user_id, 100);
    let pricey = order_for(user_id, 9000);
    let other = order_for(UserId::new(), 500);
    for order in [&cheap, &pricey, &other] {
        repo.insert(order).await.unwrap();
    }
    repo.update_status(pricey.id, OrderStatus::PaymentPending)
        .await
        .unwrap();
    repo.update_payment_status(pricey.id, PaymentStatus::Processing)
        .await
        .unwrap();

    let all = repo
        .query(
            OrderQuery::for_user(user_id)
                .sort_field(SortField::TotalAmount)
                .direction(SortDirection::Ascending),
        )
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, cheap.id);
    assert_eq!(all[1].id, pricey.id);
    assert_eq!(all[0].items.len(), 2);

    let filtered = repo
        .query(
            OrderQuery::for_user(user_id)
                .status(OrderStatus::PaymentPending)
                .payment_status(PaymentStatus::Processing),
        )
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, pricey.id);
}
