// src/logging_middleware.rs
//! Middleware for logging JSON request and response bodies in debug mode
//!
//! Only JSON bodies are buffered and logged; multipart uploads and everything
//! else stream through untouched. Secret fields are masked before logging.

use axum::body::to_bytes;
use axum::{
    body::Body,
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use tracing::{debug, Level};

use crate::common::helpers::redact_secrets;
use crate::common::ApiError;

/// Matches axum's default `Json` body limit
const MAX_LOGGED_BODY: usize = 2 * 1024 * 1024;

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false)
}

fn render_body(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    let mut json: Value = serde_json::from_slice(bytes).ok()?;
    redact_secrets(&mut json);
    Some(serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string()))
}

/// Middleware to log request and response bodies in debug mode
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, ApiError> {
    if !tracing::enabled!(Level::DEBUG) {
        return Ok(next.run(request).await);
    }

    let request = if is_json(request.headers()) {
        let (parts, body) = request.into_parts();
        let bytes = to_bytes(body, MAX_LOGGED_BODY)
            .await
            .map_err(|_| ApiError::BadRequest("request-body-too-large".to_string()))?;

        if let Some(body) = render_body(&bytes) {
            debug!(
                method = %parts.method,
                uri = %parts.uri,
                request_body = %body,
                "📥 Request"
            );
        }
        Request::from_parts(parts, Body::from(bytes))
    } else {
        debug!(method = %request.method(), uri = %request.uri(), "📥 Request");
        request
    };

    let response = next.run(request).await;
    if !is_json(response.headers()) {
        debug!(status = %response.status(), "📤 Response");
        return Ok(response);
    }

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|e| ApiError::InternalServer(format!("failed to buffer response: {}", e)))?;

    if let Some(body) = render_body(&bytes) {
        debug!(
            status = %parts.status,
            response_body = %body,
            "📤 Response"
        );
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}
