//! Request authentication.
//!
//! Token verification happens upstream; by the time a request reaches this
//! service the gateway has put the authenticated user id in `X-User-Id`.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::domain::UserId;

use super::error::ApiError;

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated user extracted from the request headers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;

        let user_id =
            UserId::new(raw).map_err(|_| ApiError::Unauthorized("Unauthorized".to_string()))?;

        Ok(AuthUser { user_id })
    }
}
