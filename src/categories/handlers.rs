use super::models::{
    Category, CategoryUpdate, CreateCategoryRequest, NewCategory, UpdateCategoryRequest,
};
use crate::auth::AuthedUser;
use crate::common::{
    safe_email_log, ApiError, ApiJson, ApiPath, ApiQuery, AppState, PageQuery, PageValidator,
    Validator,
};
use crate::db::StoreError;
use axum::{extract::Extension, Json};
use std::sync::Arc;
use tracing::{info, warn};

/// POST /categories - Create a category
pub async fn create_category(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    ApiJson(request): ApiJson<CreateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    let validation = request.validate(&request);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let category = state
        .store
        .create_category(NewCategory {
            name: request.name,
            color: request.color,
        })
        .await?;

    info!(
        category_id = category.id,
        email = %safe_email_log(&user.email),
        "Category created"
    );
    Ok(Json(category))
}

/// GET /categories?page_id=&page_size= - One page of categories
pub async fn list_categories(
    Extension(state): Extension<Arc<AppState>>,
    _user: AuthedUser,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let validator = PageValidator {
        max_page_size: state.config.max_page_size,
    };
    let validation = validator.validate(&query);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let categories = state.store.list_categories(query.page()).await?;
    Ok(Json(categories))
}

/// PATCH /categories - Rename or recolor a category
pub async fn update_category(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    ApiJson(request): ApiJson<UpdateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    let validation = request.validate(&request);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let category_id = request.category_id;
    let category = state
        .store
        .update_category(CategoryUpdate {
            id: category_id,
            name: request.name,
            color: request.color,
        })
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::NotFound("category-not-found".to_string()),
            other => ApiError::DatabaseError(other),
        })?;

    info!(
        category_id = category_id,
        email = %safe_email_log(&user.email),
        "Category updated"
    );
    Ok(Json(category))
}

/// DELETE /categories/:category_id - Remove a category no to-do refers to
pub async fn delete_category(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
    ApiPath(category_id): ApiPath<i64>,
) -> Result<Json<&'static str>, ApiError> {
    state
        .store
        .delete_category(category_id)
        .await
        .map_err(|e| match e {
            StoreError::Conflict => {
                warn!(category_id = category_id, "Refusing to delete a category still in use");
                ApiError::BadRequest("category-in-use".to_string())
            }
            other => ApiError::DatabaseError(other),
        })?;

    info!(
        category_id = category_id,
        email = %safe_email_log(&user.email),
        "Category deleted"
    );
    Ok(Json("OK"))
}
