//! Order checkout and lifecycle endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use cart::CartRepository;
use chrono::{DateTime, Utc};
use common::{AddressId, Money, OrderId, ProductId, UserId};
use domain::{Order, OrderStatus, PaymentStatus};
use orders::{OrderQuery, OrderRepository};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;
use crate::routes::{bearer_token, user_id_from_headers};

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub address_id: String,
    pub payment_method: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListParams {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusParams {
    pub status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusParams {
    pub payment_status: String,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItemResponse>,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub address_id: AddressId,
    pub payment_method: Option<String>,
    pub payment_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub subtotal: Money,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id,
                    product_name: item.product_name,
                    unit_price: item.unit_price,
                    quantity: item.quantity,
                    subtotal: item.subtotal,
                })
                .collect(),
            total_amount: order.total_amount,
            status: order.status,
            payment_status: order.payment_status,
            address_id: order.address_id,
            payment_method: order.payment_method,
            payment_link: order.payment_link,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

// -- Handlers --

/// POST /orders — create an order from the calling user's cart.
#[tracing::instrument(skip(state, headers, req))]
pub async fn create<C: CartRepository + Clone + 'static, O: OrderRepository>(
    State(state): State<Arc<AppState<C, O>>>,
    headers: HeaderMap,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let user_id = user_id_from_headers(&headers)?;
    let token = bearer_token(&headers)?;
    let address_id = parse_address_id(&req.address_id)?;

    let order = state
        .orchestrator
        .create_order_from_cart(user_id, token, address_id, req.payment_method)
        .await?;

    Ok(Json(order.into()))
}

/// GET /orders/{id} — fetch a single order.
#[tracing::instrument(skip(state))]
pub async fn get<C: CartRepository + Clone + 'static, O: OrderRepository>(
    State(state): State<Arc<AppState<C, O>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state
        .orchestrator
        .get_order(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(order.into()))
}

/// GET /orders/user/{id} — list a user's orders, filtered and sorted.
#[tracing::instrument(skip(state, params))]
pub async fn list_for_user<C: CartRepository + Clone + 'static, O: OrderRepository>(
    State(state): State<Arc<AppState<C, O>>>,
    Path(id): Path<String>,
    Query(params): Query<OrderListParams>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let mut query = OrderQuery::for_user(parse_user_id(&id)?);

    if let Some(raw) = &params.status {
        query = query.status(raw.parse()?);
    }
    if let Some(raw) = &params.payment_status {
        query = query.payment_status(raw.parse()?);
    }
    if let Some(raw) = &params.sort_by {
        query = query.sort_field(raw.parse()?);
    }
    if let Some(raw) = &params.sort_direction {
        query = query.direction(raw.parse()?);
    }

    let orders = state.orchestrator.orders_for_user(query).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// PATCH /orders/{id}/status?status=SHIPPED — overwrite the order status.
#[tracing::instrument(skip(state, params))]
pub async fn update_status<C: CartRepository + Clone + 'static, O: OrderRepository>(
    State(state): State<Arc<AppState<C, O>>>,
    Path(id): Path<String>,
    Query(params): Query<StatusParams>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state
        .orchestrator
        .update_order_status(order_id, &params.status)
        .await?;

    Ok(Json(order.into()))
}

/// PATCH /orders/{id}/payment-status?paymentStatus=COMPLETED — overwrite
/// the payment status.
#[tracing::instrument(skip(state, params))]
pub async fn update_payment_status<C: CartRepository + Clone + 'static, O: OrderRepository>(
    State(state): State<Arc<AppState<C, O>>>,
    Path(id): Path<String>,
    Query(params): Query<PaymentStatusParams>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state
        .orchestrator
        .update_payment_status(order_id, &params.payment_status)
        .await?;

    Ok(Json(order.into()))
}

/// POST /orders/{id}/cancel — move the order to CANCELLED.
#[tracing::instrument(skip(state))]
pub async fn cancel<C: CartRepository + Clone + 'static, O: OrderRepository>(
    State(state): State<Arc<AppState<C, O>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state.orchestrator.cancel_order(order_id).await?;

    Ok(Json(order.into()))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid order id: {id}")))?;
    Ok(OrderId::from_uuid(uuid))
}

fn parse_user_id(id: &str) -> Result<UserId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid user id: {id}")))?;
    Ok(UserId::from_uuid(uuid))
}

fn parse_address_id(id: &str) -> Result<AddressId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid address id: {id}")))?;
    Ok(AddressId::from_uuid(uuid))
}
