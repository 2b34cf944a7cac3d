//! # Persistence
//!
//! Handlers only ever talk to storage through the [`Store`] trait. Each call
//! maps to a single SQL statement (plus a read-back), so atomicity per call is
//! left to the database; nothing here spans calls with a transaction.

pub mod sqlite;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::categories::models::{Category, CategoryUpdate, NewCategory};
use crate::common::Page;
use crate::todos::models::{NewTodo, Todo, TodoBucket, TodoUpdate};
use crate::users::models::{NewUser, User};

pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("record already exists")]
    Duplicate,

    #[error("record is still referenced")]
    Conflict,

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Duplicate,
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                StoreError::Conflict
            }
            _ => StoreError::Database(e),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError>;
    async fn update_user_photo(&self, email: &str, pic: &str) -> Result<User, StoreError>;

    async fn create_category(&self, category: NewCategory) -> Result<Category, StoreError>;
    async fn get_category(&self, id: i64) -> Result<Category, StoreError>;
    async fn list_categories(&self, page: Page) -> Result<Vec<Category>, StoreError>;
    async fn update_category(&self, update: CategoryUpdate) -> Result<Category, StoreError>;
    async fn delete_category(&self, id: i64) -> Result<(), StoreError>;

    async fn create_todo(&self, todo: NewTodo) -> Result<Todo, StoreError>;
    async fn get_todo(&self, id: i64) -> Result<Todo, StoreError>;
    /// One page of `owner`'s to-dos in `bucket`, relative to `today`, by date then id.
    async fn list_todos_by_owner(
        &self,
        owner: &str,
        bucket: TodoBucket,
        today: NaiveDate,
        page: Page,
    ) -> Result<Vec<Todo>, StoreError>;
    async fn update_todo(&self, update: TodoUpdate) -> Result<Todo, StoreError>;
    async fn mark_todo_complete(&self, id: i64) -> Result<Todo, StoreError>;
    async fn delete_todo(&self, id: i64) -> Result<(), StoreError>;
}
