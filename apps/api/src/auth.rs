//! Caller identity extractor.
//!
//! Authentication happens upstream; the identity service forwards the
//! authenticated user id in the `X-User-Id` header. Handlers receive it as an
//! explicit [`Caller`] value and hand it to the ownership gate.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
}

impl Caller {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let user_id = Uuid::parse_str(raw.trim()).map_err(|_| {
            tracing::warn!("rejecting request with malformed caller id");
            AppError::Unauthorized
        })?;

        Ok(Caller::new(user_id))
    }
}
