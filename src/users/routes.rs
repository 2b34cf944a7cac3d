use super::handlers;
use axum::{
    routing::{get, post},
    Router,
};

/// Registration and login, reachable without a token
pub fn public_user_routes() -> Router {
    Router::new()
        .route("/users/register", post(handlers::register_user))
        .route("/users/login", post(handlers::login_user))
}

pub fn user_routes() -> Router {
    Router::new().route("/users/me", get(handlers::me))
}
