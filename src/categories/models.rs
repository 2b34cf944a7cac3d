// src/categories/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Categories are global: every user sees and edits the same set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct CategoryUpdate {
    pub id: i64,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub category_id: i64,
    pub name: String,
    pub color: String,
}
