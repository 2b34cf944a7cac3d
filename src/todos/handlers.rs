use super::models::{
    CreateTodoRequest, NewTodo, Todo, TodoBucket, TodoListResponse, TodoUpdate,
    UpdateTodoRequest,
};
use super::validators::check_todo_input;
use crate::auth::{load_owned_todo, require_category, AuthedUser};
use crate::common::{
    safe_email_log, ApiError, ApiJson, ApiPath, ApiQuery, AppState, PageQuery, PageValidator,
    Validator,
};
use crate::db::StoreError;
use axum::{extract::Extension, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// A category removed between the existence check and the write surfaces as a
/// foreign-key conflict.
fn map_todo_write_error(e: StoreError) -> ApiError {
    match e {
        StoreError::Conflict => ApiError::NotFound("invalid-category".to_string()),
        other => ApiError::DatabaseError(other),
    }
}

// ============================================================================
// To-do Handlers
// ============================================================================

/// POST /todo - Create a to-do owned by the caller
pub async fn create_todo(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    ApiJson(request): ApiJson<CreateTodoRequest>,
) -> Result<Json<Todo>, ApiError> {
    check_todo_input(&request, &request.date)?;
    require_category(state.store.as_ref(), request.category_id).await?;

    let todo = state
        .store
        .create_todo(NewTodo {
            user_email: user.email.clone(),
            category_id: request.category_id,
            title: request.title,
            content: request.content,
            date: request.date,
            color: request.color,
            is_priority: request.is_priority.unwrap_or_default(),
        })
        .await
        .map_err(map_todo_write_error)?;

    info!(
        todo_id = todo.id,
        email = %safe_email_log(&user.email),
        "To-do created"
    );
    Ok(Json(todo))
}

/// GET /todo?page_id=&page_size= - The same page of each bucket of the caller's to-dos
pub async fn list_todos(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<TodoListResponse>, ApiError> {
    let validator = PageValidator {
        max_page_size: state.config.max_page_size,
    };
    let validation = validator.validate(&query);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let page = query.page();
    let today = Utc::now().date_naive();
    let mut response = TodoListResponse::default();

    for bucket in TodoBucket::ALL {
        let todos = state
            .store
            .list_todos_by_owner(&user.email, bucket, today, page)
            .await?;
        match bucket {
            TodoBucket::Today => response.today = todos,
            TodoBucket::Upcoming => response.upcoming = todos,
            TodoBucket::Done => response.done = todos,
        }
    }

    debug!(
        today = response.today.len(),
        upcoming = response.upcoming.len(),
        done = response.done.len(),
        email = %safe_email_log(&user.email),
        "Listed to-dos"
    );
    Ok(Json(response))
}

/// GET /todo/:todo_id - Fetch one of the caller's to-dos
pub async fn get_todo(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    ApiPath(todo_id): ApiPath<i64>,
) -> Result<Json<Todo>, ApiError> {
    let todo = load_owned_todo(state.store.as_ref(), todo_id, &user, "not-found").await?;
    Ok(Json(todo))
}

/// PUT /todo - Replace the editable fields of a to-do
pub async fn update_todo(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    ApiJson(request): ApiJson<UpdateTodoRequest>,
) -> Result<Json<Todo>, ApiError> {
    check_todo_input(&request, &request.date)?;
    load_owned_todo(state.store.as_ref(), request.todo_id, &user, "todo-not-found").await?;
    require_category(state.store.as_ref(), request.category_id).await?;

    let todo = state
        .store
        .update_todo(TodoUpdate {
            id: request.todo_id,
            category_id: request.category_id,
            title: request.title,
            content: request.content,
            date: request.date,
            color: request.color,
            is_priority: request.is_priority.unwrap_or_default(),
        })
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::NotFound("todo-not-found".to_string()),
            other => map_todo_write_error(other),
        })?;

    info!(
        todo_id = todo.id,
        email = %safe_email_log(&user.email),
        "To-do updated"
    );
    Ok(Json(todo))
}

/// PUT /todo/:todo_id - Mark a to-do as done
pub async fn mark_todo_complete(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    ApiPath(todo_id): ApiPath<i64>,
) -> Result<Json<Todo>, ApiError> {
    load_owned_todo(state.store.as_ref(), todo_id, &user, "todo-not-found").await?;

    let todo = state
        .store
        .mark_todo_complete(todo_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::NotFound("todo-not-found".to_string()),
            other => ApiError::DatabaseError(other),
        })?;

    info!(todo_id = todo_id, email = %safe_email_log(&user.email), "To-do completed");
    Ok(Json(todo))
}

/// DELETE /todo/:todo_id - Remove one of the caller's to-dos
pub async fn delete_todo(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    ApiPath(todo_id): ApiPath<i64>,
) -> Result<Json<&'static str>, ApiError> {
    load_owned_todo(state.store.as_ref(), todo_id, &user, "not-found").await?;

    state
        .store
        .delete_todo(todo_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::NotFound("not-found".to_string()),
            other => ApiError::DatabaseError(other),
        })?;

    info!(todo_id = todo_id, email = %safe_email_log(&user.email), "To-do deleted");
    Ok(Json("OK"))
}
