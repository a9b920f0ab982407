//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cart::CartError;
use chrono::Utc;
use orders::OrderStoreError;
use saga::CheckoutError;
use stock::StockError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Missing or unusable caller identity.
    Unauthorized(String),
    /// Checkout pipeline error.
    Checkout(CheckoutError),
    /// Cart storage error.
    Cart(CartError),
    /// Order storage error.
    Store(OrderStoreError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Checkout(err) => checkout_error_to_response(err),
            ApiError::Cart(err) => cart_error_to_response(err),
            ApiError::Store(err) => store_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "message": message,
            "status": status.as_u16(),
        });
        (status, axum::Json(body)).into_response()
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, String) {
    match err {
        CheckoutError::InsufficientStock { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        CheckoutError::Domain(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        CheckoutError::Cart(inner) => cart_error_to_response(inner),
        CheckoutError::Store(inner) => store_error_to_response(inner),
        CheckoutError::Stock(StockError::ProductNotFound(_)) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        CheckoutError::Stock(StockError::Upstream(_))
        | CheckoutError::Payment(_)
        | CheckoutError::Profile(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

fn cart_error_to_response(err: CartError) -> (StatusCode, String) {
    match &err {
        CartError::InsufficientStock { .. } => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        CartError::ItemNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        CartError::Domain(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        CartError::Stock(StockError::ProductNotFound(_)) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        CartError::Stock(StockError::Upstream(_))
        | CartError::Database(_)
        | CartError::Migration(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

fn store_error_to_response(err: OrderStoreError) -> (StatusCode, String) {
    match &err {
        OrderStoreError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        OrderStoreError::InvalidSortField(_) | OrderStoreError::InvalidSortDirection(_) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        OrderStoreError::Domain(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        OrderStoreError::Database(_) | OrderStoreError::Migration(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}

impl From<domain::DomainError> for ApiError {
    fn from(err: domain::DomainError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        ApiError::Cart(err)
    }
}

impl From<OrderStoreError> for ApiError {
    fn from(err: OrderStoreError) -> Self {
        ApiError::Store(err)
    }
}
