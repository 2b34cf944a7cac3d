// src/auth/middleware.rs
//! Bearer-token guard for protected routes
//!
//! Applied with `route_layer(middleware::from_fn(require_auth))`. On success the
//! verified [`Payload`] is stored in the request extensions, where
//! [`AuthedUser`](super::AuthedUser) picks it up. On any failure the request is
//! answered with 401 and the handler never runs.

use axum::{
    extract::{Extension, Request},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::common::{safe_email_log, safe_token_log, ApiError, AppState};

const BEARER_SCHEME: &str = "bearer";

pub async fn require_auth(
    Extension(state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();

    let token = bearer_token(header)?;

    let payload = state.tokens.verify_token(token).map_err(|e| {
        warn!(error = %e, token = %safe_token_log(token), "Token verification failed");
        ApiError::from(e)
    })?;

    debug!(
        email = %safe_email_log(&payload.subject),
        path = %req.uri().path(),
        "Request authenticated"
    );

    req.extensions_mut().insert(payload);
    Ok(next.run(req).await)
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
/// The scheme is matched case-insensitively.
pub(crate) fn bearer_token(header: &str) -> Result<&str, ApiError> {
    let header = header.trim();
    if header.is_empty() {
        warn!("Authentication failed: missing Authorization header");
        return Err(ApiError::Unauthorized(
            "authorization-header-is-not-provided".to_string(),
        ));
    }

    let mut fields = header.split_whitespace();
    let (scheme, token) = match (fields.next(), fields.next(), fields.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        _ => {
            warn!("Authentication failed: malformed Authorization header");
            return Err(ApiError::Unauthorized(
                "invalid-authorization-header-format".to_string(),
            ));
        }
    };

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        warn!(scheme = %scheme, "Authentication failed: unsupported authorization type");
        return Err(ApiError::Unauthorized(
            "unsupported-authorization-type".to_string(),
        ));
    }

    Ok(token)
}
