// src/db/sqlite.rs
//! SQLite implementation of [`Store`]

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use super::{Store, StoreError};
use crate::categories::models::{Category, CategoryUpdate, NewCategory};
use crate::common::validation::DATE_FORMAT;
use crate::common::{safe_email_log, Page};
use crate::todos::models::{NewTodo, Todo, TodoBucket, TodoUpdate};
use crate::users::models::{NewUser, User};

const TODO_SELECT: &str = r#"
    SELECT t.id, t.user_email, t.category_id, c.name AS category_name, t.title, t.content,
           t.date, t.color, t.is_priority, t.is_done, t.created_at, t.updated_at
    FROM todos t
    LEFT JOIN categories c ON c.id = t.category_id
"#;

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_user_by_id(&self, id: i64) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let result = sqlx::query(
            "INSERT INTO users (email, name, address, pic, hashed_password) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.address)
        .bind(&user.pic)
        .bind(&user.hashed_password)
        .execute(&self.pool)
        .await?;

        debug!(email = %safe_email_log(&user.email), "Inserted user");
        self.fetch_user_by_id(result.last_insert_rowid()).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn update_user_photo(&self, email: &str, pic: &str) -> Result<User, StoreError> {
        let result =
            sqlx::query("UPDATE users SET pic = ?, updated_at = datetime('now') WHERE email = ?")
                .bind(pic)
                .bind(email)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        self.get_user_by_email(email).await
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category, StoreError> {
        let result = sqlx::query("INSERT INTO categories (name, color) VALUES (?, ?)")
            .bind(&category.name)
            .bind(&category.color)
            .execute(&self.pool)
            .await?;

        self.get_category(result.last_insert_rowid()).await
    }

    async fn get_category(&self, id: i64) -> Result<Category, StoreError> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn list_categories(&self, page: Page) -> Result<Vec<Category>, StoreError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY id LIMIT ? OFFSET ?")
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    async fn update_category(&self, update: CategoryUpdate) -> Result<Category, StoreError> {
        let result = sqlx::query(
            "UPDATE categories SET name = ?, color = ?, updated_at = datetime('now') WHERE id = ?",
        )
        .bind(&update.name)
        .bind(&update.color)
        .bind(update.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        self.get_category(update.id).await
    }

    async fn delete_category(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_todo(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO todos (user_email, category_id, title, content, date, color, is_priority)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&todo.user_email)
        .bind(todo.category_id)
        .bind(&todo.title)
        .bind(&todo.content)
        .bind(&todo.date)
        .bind(&todo.color)
        .bind(todo.is_priority)
        .execute(&self.pool)
        .await?;

        self.get_todo(result.last_insert_rowid()).await
    }

    async fn get_todo(&self, id: i64) -> Result<Todo, StoreError> {
        sqlx::query_as::<_, Todo>(&format!("{} WHERE t.id = ?", TODO_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn list_todos_by_owner(
        &self,
        owner: &str,
        bucket: TodoBucket,
        today: NaiveDate,
        page: Page,
    ) -> Result<Vec<Todo>, StoreError> {
        let filter = match bucket {
            TodoBucket::Today => "t.is_done = 0 AND t.date <= ?",
            TodoBucket::Upcoming => "t.is_done = 0 AND t.date > ?",
            TodoBucket::Done => "t.is_done = 1",
        };
        let sql = format!(
            "{} WHERE t.user_email = ? AND {} ORDER BY t.date, t.id LIMIT ? OFFSET ?",
            TODO_SELECT, filter
        );

        let mut query = sqlx::query_as::<_, Todo>(&sql).bind(owner);
        if bucket != TodoBucket::Done {
            query = query.bind(today.format(DATE_FORMAT).to_string());
        }
        let todos = query
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    async fn update_todo(&self, update: TodoUpdate) -> Result<Todo, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET category_id = ?,
                title = ?,
                content = ?,
                date = ?,
                color = ?,
                is_priority = ?,
                updated_at = datetime('now')
            WHERE id = ?
            "#,
        )
        .bind(update.category_id)
        .bind(&update.title)
        .bind(&update.content)
        .bind(&update.date)
        .bind(&update.color)
        .bind(update.is_priority)
        .bind(update.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        self.get_todo(update.id).await
    }

    async fn mark_todo_complete(&self, id: i64) -> Result<Todo, StoreError> {
        let result =
            sqlx::query("UPDATE todos SET is_done = 1, updated_at = datetime('now') WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        self.get_todo(id).await
    }

    async fn delete_todo(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
