//! Cart endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use cart::CartRepository;
use common::{Money, ProductId, UserId};
use domain::{CartItem, CartSnapshot};
use orders::OrderRepository;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;
use crate::routes::user_id_from_headers;

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
    pub product_name: String,
    /// Unit price in cents.
    pub unit_price: Money,
    pub quantity: u32,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub user_id: UserId,
    pub items: Vec<CartItemResponse>,
    pub total: Money,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: u32,
}

impl From<CartSnapshot> for CartResponse {
    fn from(snapshot: CartSnapshot) -> Self {
        let total = snapshot.total();
        Self {
            user_id: snapshot.user_id,
            items: snapshot
                .items
                .into_iter()
                .map(|item| CartItemResponse {
                    product_id: item.product_id,
                    product_name: item.product_name,
                    unit_price: item.unit_price,
                    quantity: item.quantity,
                })
                .collect(),
            total,
        }
    }
}

// -- Handlers --

/// GET /cart — the calling user's cart.
#[tracing::instrument(skip(state, headers))]
pub async fn get<C: CartRepository + Clone + 'static, O: OrderRepository>(
    State(state): State<Arc<AppState<C, O>>>,
    headers: HeaderMap,
) -> Result<Json<CartResponse>, ApiError> {
    let user_id = user_id_from_headers(&headers)?;
    let snapshot = state.carts.get_cart(user_id).await?;
    Ok(Json(snapshot.into()))
}

/// POST /cart — add an item to the calling user's cart.
#[tracing::instrument(skip(state, headers, req))]
pub async fn add_item<C: CartRepository + Clone + 'static, O: OrderRepository>(
    State(state): State<Arc<AppState<C, O>>>,
    headers: HeaderMap,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let user_id = user_id_from_headers(&headers)?;
    let item = CartItem::new(
        user_id,
        ProductId::new(req.product_id),
        req.product_name,
        req.unit_price,
        req.quantity,
    )?;

    let snapshot = state.carts.add_item(item).await?;
    Ok(Json(snapshot.into()))
}

/// PATCH /cart/items/{product_id}/decrement — drop one unit of a line.
#[tracing::instrument(skip(state, headers))]
pub async fn decrement_item<C: CartRepository + Clone + 'static, O: OrderRepository>(
    State(state): State<Arc<AppState<C, O>>>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let user_id = user_id_from_headers(&headers)?;
    let snapshot = state
        .carts
        .decrement_item(user_id, &ProductId::new(product_id))
        .await?;
    Ok(Json(snapshot.into()))
}

/// DELETE /cart/items/{product_id} — remove a line entirely.
#[tracing::instrument(skip(state, headers))]
pub async fn remove_item<C: CartRepository + Clone + 'static, O: OrderRepository>(
    State(state): State<Arc<AppState<C, O>>>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let user_id = user_id_from_headers(&headers)?;
    let snapshot = state
        .carts
        .remove_item(user_id, &ProductId::new(product_id))
        .await?;
    Ok(Json(snapshot.into()))
}

/// DELETE /cart — empty the calling user's cart.
#[tracing::instrument(skip(state, headers))]
pub async fn clear<C: CartRepository + Clone + 'static, O: OrderRepository>(
    State(state): State<Arc<AppState<C, O>>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let user_id = user_id_from_headers(&headers)?;
    state.carts.clear_cart(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
