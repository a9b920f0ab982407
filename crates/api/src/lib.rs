//! HTTP API server with observability for the order checkout system.
//!
//! Provides REST endpoints for cart management and order checkout,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch, post};
use cart::{CartRepository, CartStore, InMemoryCartRepository};
use metrics_exporter_prometheus::PrometheusHandle;
use orders::{InMemoryOrderRepository, OrderRepository};
use saga::{
    InMemoryNotificationBus, InMemoryPaymentGateway, InMemoryProfileProvider, OrderOrchestrator,
    UserProfile,
};
use stock::InMemoryStockOracle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state accessible from all handlers.
///
/// Generic over the cart and order persistence backends. The outboard
/// services (stock, payments, profiles, notifications) are the in-memory
/// doubles, kept as public handles so tests and the demo binary can seed
/// levels and toggle failures.
pub struct AppState<C, O>
where
    C: CartRepository + Clone + 'static,
    O: OrderRepository,
{
    pub carts: CartStore<C, InMemoryStockOracle>,
    pub orchestrator: OrderOrchestrator<
        C,
        O,
        InMemoryStockOracle,
        InMemoryPaymentGateway,
        InMemoryProfileProvider,
        InMemoryNotificationBus,
    >,
    pub stock: InMemoryStockOracle,
    pub gateway: InMemoryPaymentGateway,
    pub profiles: InMemoryProfileProvider,
    pub bus: InMemoryNotificationBus,
}

/// Application state wired entirely to in-memory backends.
pub type InMemoryAppState = AppState<InMemoryCartRepository, InMemoryOrderRepository>;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C, O>(state: Arc<AppState<C, O>>, metrics_handle: PrometheusHandle) -> Router
where
    C: CartRepository + Clone + 'static,
    O: OrderRepository + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::export))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/cart", get(routes::cart::get::<C, O>))
        .route("/cart", post(routes::cart::add_item::<C, O>))
        .route("/cart", delete(routes::cart::clear::<C, O>))
        .route(
            "/cart/items/{product_id}/decrement",
            patch(routes::cart::decrement_item::<C, O>),
        )
        .route(
            "/cart/items/{product_id}",
            delete(routes::cart::remove_item::<C, O>),
        )
        .route("/orders", post(routes::orders::create::<C, O>))
        .route(
            "/orders/user/{id}",
            get(routes::orders::list_for_user::<C, O>),
        )
        .route("/orders/{id}", get(routes::orders::get::<C, O>))
        .route(
            "/orders/{id}/status",
            patch(routes::orders::update_status::<C, O>),
        )
        .route(
            "/orders/{id}/payment-status",
            patch(routes::orders::update_payment_status::<C, O>),
        )
        .route("/orders/{id}/cancel", post(routes::orders::cancel::<C, O>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state with in-memory stores and
/// service doubles. Any bearer token resolves to the demo profile.
pub fn create_default_state() -> Arc<InMemoryAppState> {
    let stock = InMemoryStockOracle::new();
    let gateway = InMemoryPaymentGateway::new();
    let profiles = InMemoryProfileProvider::with_default_profile(UserProfile {
        name: "Demo Customer".to_string(),
        email: "customer@example.com".to_string(),
        roles: vec!["user".to_string()],
    });
    let bus = InMemoryNotificationBus::new();

    // One cart store shared by the handlers and the orchestrator, so both
    // sides see the same cache.
    let carts = CartStore::new(InMemoryCartRepository::new(), stock.clone());
    let orchestrator = OrderOrchestrator::new(
        carts.clone(),
        InMemoryOrderRepository::new(),
        stock.clone(),
        gateway.clone(),
        profiles.clone(),
        bus.clone(),
    );

    Arc::new(AppState {
        carts,
        orchestrator,
        stock,
        gateway,
        profiles,
        bus,
    })
}
