// src/auth/access.rs
//! Per-resource access checks
//!
//! Existence is always resolved before ownership, and both before any mutating
//! store call.

use tracing::warn;

use super::AuthedUser;
use crate::categories::models::Category;
use crate::common::{safe_email_log, ApiError};
use crate::db::{Store, StoreError};
use crate::todos::models::Todo;

/// A record that belongs to exactly one identity
pub trait Owned {
    fn owner(&self) -> &str;
}

pub fn ensure_owner<T: Owned>(resource: &T, authed: &AuthedUser) -> Result<(), ApiError> {
    if resource.owner() != authed.email {
        warn!(
            caller = %safe_email_log(&authed.email),
            owner = %safe_email_log(resource.owner()),
            "Rejected access to a resource owned by another user"
        );
        return Err(ApiError::Unauthorized("wrong-user".to_string()));
    }
    Ok(())
}

/// Fetch a to-do and check it belongs to the caller. `not_found` is the
/// message returned when the id resolves to nothing.
pub async fn load_owned_todo(
    store: &dyn Store,
    todo_id: i64,
    authed: &AuthedUser,
    not_found: &str,
) -> Result<Todo, ApiError> {
    let todo = store.get_todo(todo_id).await.map_err(|e| match e {
        StoreError::NotFound => ApiError::NotFound(not_found.to_string()),
        other => ApiError::DatabaseError(other),
    })?;

    ensure_owner(&todo, authed)?;
    Ok(todo)
}

pub async fn require_category(store: &dyn Store, category_id: i64) -> Result<Category, ApiError> {
    store.get_category(category_id).await.map_err(|e| match e {
        StoreError::NotFound => ApiError::NotFound("invalid-category".to_string()),
        other => ApiError::DatabaseError(other),
    })
}
