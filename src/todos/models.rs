// src/todos/models.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::access::Owned;
use crate::common::validation::DATE_FORMAT;

/// To-do row joined with its category name. `date` is stored as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: i64,
    pub user_email: String,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub title: String,
    pub content: String,
    pub date: String,
    pub color: String,
    pub is_priority: bool,
    pub is_done: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// The three sections of the `GET /todo` listing, each paged on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoBucket {
    /// Not done and dated on or before the reference day
    Today,
    /// Not done and dated after the reference day
    Upcoming,
    Done,
}

impl TodoBucket {
    pub const ALL: [TodoBucket; 3] = [TodoBucket::Today, TodoBucket::Upcoming, TodoBucket::Done];

    /// Stored dates are zero-padded, so text order is date order.
    pub fn contains(&self, todo: &Todo, today: NaiveDate) -> bool {
        let today = today.format(DATE_FORMAT).to_string();
        match self {
            TodoBucket::Today => !todo.is_done && todo.date <= today,
            TodoBucket::Upcoming => !todo.is_done && todo.date > today,
            TodoBucket::Done => todo.is_done,
        }
    }
}

impl Owned for Todo {
    fn owner(&self) -> &str {
        &self.user_email
    }
}

/// Insert parameters. `user_email` always comes from the verified token.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub user_email: String,
    pub category_id: i64,
    pub title: String,
    pub content: String,
    pub date: String,
    pub color: String,
    pub is_priority: bool,
}

/// Update parameters. The owner of a to-do never changes.
#[derive(Debug, Clone)]
pub struct TodoUpdate {
    pub id: i64,
    pub category_id: i64,
    pub title: String,
    pub content: String,
    pub date: String,
    pub color: String,
    pub is_priority: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub category_id: i64,
    pub title: String,
    pub content: String,
    pub date: String,
    pub color: String,
    pub is_priority: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub todo_id: i64,
    pub category_id: i64,
    pub title: String,
    pub content: String,
    pub date: String,
    pub color: String,
    pub is_priority: Option<bool>,
}

/// `GET /todo` response, the same page of each bucket
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TodoListResponse {
    pub today: Vec<Todo>,
    pub upcoming: Vec<Todo>,
    pub done: Vec<Todo>,
}
