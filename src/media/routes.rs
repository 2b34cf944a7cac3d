use super::handlers;
use super::validators::MAX_FILE_SIZE;
use axum::{extract::DefaultBodyLimit, routing::post, Router};

/// Room for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn media_routes() -> Router {
    Router::new()
        .route(
            "/file",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(MAX_FILE_SIZE + MULTIPART_OVERHEAD)),
        )
        .route("/remote", post(handlers::upload_remote))
}
