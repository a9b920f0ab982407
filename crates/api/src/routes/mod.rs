//! HTTP route handlers.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use common::UserId;
use uuid::Uuid;

use crate::error::ApiError;

pub mod cart;
pub mod health;
pub mod metrics;
pub mod orders;

/// Resolves the calling user from the `X-User-Id` header.
///
/// The gateway in front of this service authenticates the caller and
/// forwards the resolved user id in this header.
pub(crate) fn user_id_from_headers(headers: &HeaderMap) -> Result<UserId, ApiError> {
    let raw = headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing X-User-Id header".to_string()))?;

    let uuid = Uuid::parse_str(raw)
        .map_err(|_| ApiError::BadRequest(format!("Invalid user id: {raw}")))?;
    Ok(UserId::from_uuid(uuid))
}

/// Extracts the bearer token from the `Authorization` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    value.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized("Authorization header must carry a bearer token".to_string())
    })
}
