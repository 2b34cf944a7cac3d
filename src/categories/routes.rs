use super::handlers;
use axum::{
    routing::{delete, post},
    Router,
};

/// Category routes. Categories are shared by every user.
pub fn category_routes() -> Router {
    Router::new()
        .route(
            "/categories",
            post(handlers::create_category)
                .get(handlers::list_categories)
                .patch(handlers::update_category),
        )
        .route("/categories/:category_id", delete(handlers::delete_category))
}
