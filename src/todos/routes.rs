use super::handlers;
use axum::{routing::get, Router};

/// To-do routes. Every id-addressed route is ownership-checked.
pub fn todo_routes() -> Router {
    Router::new()
        .route(
            "/todo",
            get(handlers::list_todos)
                .post(handlers::create_todo)
                .put(handlers::update_todo),
        )
        .route(
            "/todo/:todo_id",
            get(handlers::get_todo)
                .put(handlers::mark_todo_complete)
                .delete(handlers::delete_todo),
        )
}
