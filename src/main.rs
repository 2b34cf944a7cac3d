// src/main.rs
use axum::{extract::Extension, middleware, Router};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::PathBuf;
use std::{str::FromStr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod categories;
mod common;
mod config;
mod db;
mod logging_middleware;
mod media;
mod services;
mod todos;
mod users;

#[cfg(test)]
mod testing;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use auth::{require_auth, TokenAuthority};
use common::AppState;
use config::AppConfig;
use db::SqliteStore;
use services::CloudinaryUploader;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = AppConfig::from_env()?;
    info!(?config, "Configuration loaded");

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = config.database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    common::migrations::run_migrations(&pool, config.reset_db).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let tokens = TokenAuthority::new(config.token_symmetric_key.as_bytes())?;
    info!("TokenAuthority initialized");

    let uploader = Arc::new(CloudinaryUploader::new(config.cloudinary.clone()));
    if config.cloudinary.is_none() {
        tracing::warn!("Cloudinary is not configured; photo uploads will fail");
    }

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let server_address = config.server_address;
    let state = Arc::new(AppState::new(
        config,
        Arc::new(SqliteStore::new(pool)),
        tokens,
        uploader,
    ));

    let app = build_router(state);

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    info!("Listening on {}", server_address);
    let listener = TcpListener::bind(server_address).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

// ============================================================================
// ROUTER COMPOSITION
// ============================================================================

pub(crate) fn build_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .merge(users::user_routes())
        .merge(categories::category_routes())
        .merge(todos::todo_routes())
        .merge(media::media_routes())
        .route_layer(middleware::from_fn(require_auth));

    let cors = {
        let origins: Vec<axum::http::HeaderValue> = state
            .config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::PATCH,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
            ])
            .allow_credentials(true)
    };

    Router::new()
        .merge(users::public_user_routes())
        .merge(protected)
        // Add request/response body logging in debug mode
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
