//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::error;

use super::token::Payload;
use crate::common::ApiError;

/// Identity of the caller on a protected route.
///
/// Only valid behind [`require_auth`](super::middleware::require_auth), which
/// inserts the verified payload. Reaching a handler without it means the route
/// was registered outside the guarded router.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub email: String,
    pub payload: Payload,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let payload = parts.extensions.get::<Payload>().cloned().ok_or_else(|| {
            error!(
                path = %parts.uri.path(),
                "Protected handler reached without a verified token payload"
            );
            ApiError::InternalServer("missing authorization payload".to_string())
        })?;

        Ok(AuthedUser {
            email: payload.subject.clone(),
            payload,
        })
    }
}
