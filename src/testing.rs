// src/testing.rs
//! Test doubles and request helpers for driving the real router in-process

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response, Router};
use bytes::Bytes;
use chrono::{NaiveDate, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use crate::auth::TokenAuthority;
use crate::categories::models::{Category, CategoryUpdate, NewCategory};
use crate::common::{AppState, Page};
use crate::config::AppConfig;
use crate::db::{Store, StoreError};
use crate::services::{MediaUploader, UploadError};
use crate::todos::models::{NewTodo, Todo, TodoBucket, TodoUpdate};
use crate::users::models::{NewUser, User};

pub const TEST_KEY: &str = "0123456789abcdef0123456789abcdef";

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    todos: Vec<Todo>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Mirrors the constraints of the SQLite schema: unique emails and to-dos
/// referencing existing categories. Every call is counted.
#[derive(Default)]
pub struct MockStore {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MockStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail as if the database were unreachable
    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn todo_count(&self) -> usize {
        self.lock().todos.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    fn enter(&self) -> Result<std::sync::MutexGuard<'_, Tables>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        Ok(self.lock())
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

fn page_of<T: Clone>(rows: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    rows.skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

fn with_category_name(tables: &Tables, mut todo: Todo) -> Todo {
    todo.category_name = tables
        .categories
        .iter()
        .find(|c| c.id == todo.category_id)
        .map(|c| c.name.clone());
    todo
}

#[async_trait]
impl Store for MockStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.enter()?;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate);
        }
        let row = User {
            id: tables.next_id(),
            email: user.email,
            name: user.name,
            address: user.address,
            pic: user.pic,
            hashed_password: user.hashed_password,
            created_at: now(),
            updated_at: now(),
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let tables = self.enter()?;
        tables
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_user_photo(&self, email: &str, pic: &str) -> Result<User, StoreError> {
        let mut tables = self.enter()?;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or(StoreError::NotFound)?;
        user.pic = pic.to_string();
        user.updated_at = now();
        Ok(user.clone())
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category, StoreError> {
        let mut tables = self.enter()?;
        let row = Category {
            id: tables.next_id(),
            name: category.name,
            color: category.color,
            created_at: now(),
            updated_at: now(),
        };
        tables.categories.push(row.clone());
        Ok(row)
    }

    async fn get_category(&self, id: i64) -> Result<Category, StoreError> {
        let tables = self.enter()?;
        tables
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_categories(&self, page: Page) -> Result<Vec<Category>, StoreError> {
        let tables = self.enter()?;
        Ok(page_of(tables.categories.iter().cloned(), page))
    }

    async fn update_category(&self, update: CategoryUpdate) -> Result<Category, StoreError> {
        let mut tables = self.enter()?;
        let category = tables
            .categories
            .iter_mut()
            .find(|c| c.id == update.id)
            .ok_or(StoreError::NotFound)?;
        category.name = update.name;
        category.color = update.color;
        category.updated_at = now();
        Ok(category.clone())
    }

    async fn delete_category(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.enter()?;
        if tables.todos.iter().any(|t| t.category_id == id) {
            return Err(StoreError::Conflict);
        }
        tables.categories.retain(|c| c.id != id);
        Ok(())
    }

    async fn create_todo(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let mut tables = self.enter()?;
        if !tables.categories.iter().any(|c| c.id == todo.category_id) {
            return Err(StoreError::Conflict);
        }
        let row = Todo {
            id: tables.next_id(),
            user_email: todo.user_email,
            category_id: todo.category_id,
            category_name: None,
            title: todo.title,
            content: todo.content,
            date: todo.date,
            color: todo.color,
            is_priority: todo.is_priority,
            is_done: false,
            created_at: now(),
            updated_at: now(),
        };
        tables.todos.push(row.clone());
        Ok(with_category_name(&tables, row))
    }

    async fn get_todo(&self, id: i64) -> Result<Todo, StoreError> {
        let tables = self.enter()?;
        let todo = tables
            .todos
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)?;
        Ok(with_category_name(&tables, todo))
    }

    async fn list_todos_by_owner(
        &self,
        owner: &str,
        bucket: TodoBucket,
        today: NaiveDate,
        page: Page,
    ) -> Result<Vec<Todo>, StoreError> {
        let tables = self.enter()?;
        let mut owned: Vec<Todo> = tables
            .todos
            .iter()
            .filter(|t| t.user_email == owner && bucket.contains(t, today))
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(page_of(owned.into_iter(), page)
            .into_iter()
            .map(|t| with_category_name(&tables, t))
            .collect())
    }

    async fn update_todo(&self, update: TodoUpdate) -> Result<Todo, StoreError> {
        let mut tables = self.enter()?;
        if !tables.categories.iter().any(|c| c.id == update.category_id) {
            return Err(StoreError::Conflict);
        }
        let todo = tables
            .todos
            .iter_mut()
            .find(|t| t.id == update.id)
            .ok_or(StoreError::NotFound)?;
        todo.category_id = update.category_id;
        todo.title = update.title;
        todo.content = update.content;
        todo.date = update.date;
        todo.color = update.color;
        todo.is_priority = update.is_priority;
        todo.updated_at = now();
        let todo = todo.clone();
        Ok(with_category_name(&tables, todo))
    }

    async fn mark_todo_complete(&self, id: i64) -> Result<Todo, StoreError> {
        let mut tables = self.enter()?;
        let todo = tables
            .todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;
        todo.is_done = true;
        todo.updated_at = now();
        let todo = todo.clone();
        Ok(with_category_name(&tables, todo))
    }

    async fn delete_todo(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.enter()?;
        let before = tables.todos.len();
        tables.todos.retain(|t| t.id != id);
        if tables.todos.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

// ============================================================================
// Uploader stub
// ============================================================================

#[derive(Default)]
pub struct StubUploader {
    uploads: AtomicUsize,
    failing: AtomicBool,
}

impl StubUploader {
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn record(&self) -> Result<(), UploadError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(UploadError::Rejected {
                status: 502,
                body: "bad gateway".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MediaUploader for StubUploader {
    async fn upload_file(&self, _data: Bytes, filename: &str) -> Result<String, UploadError> {
        self.record()?;
        Ok(format!("https://media.test/upload/{}", filename))
    }

    async fn upload_from_url(&self, url: &str) -> Result<String, UploadError> {
        self.record()?;
        let name = url.rsplit('/').next().unwrap_or("remote");
        Ok(format!("https://media.test/fetch/{}", name))
    }
}

// ============================================================================
// Application harness
// ============================================================================

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub store: Arc<MockStore>,
    pub uploader: Arc<StubUploader>,
}

impl TestApp {
    pub fn new() -> Self {
        let config = AppConfig::from_lookup(|key| match key {
            "TOKEN_SYMMETRIC_KEY" => Some(TEST_KEY.to_string()),
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            _ => None,
        })
        .expect("Failed to build test config");

        let store = Arc::new(MockStore::default());
        let uploader = Arc::new(StubUploader::default());
        let tokens = TokenAuthority::new(TEST_KEY.as_bytes()).expect("Failed to build tokens");

        let state = Arc::new(AppState::new(
            config,
            store.clone(),
            tokens,
            uploader.clone(),
        ));
        let router = crate::build_router(state.clone());

        Self {
            router,
            state,
            store,
            uploader,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed")
    }

    pub fn token_for(&self, email: &str) -> String {
        let (token, _) = self
            .state
            .tokens
            .create_token(email, self.state.config.access_token_duration)
            .expect("Failed to create token");
        token
    }

    /// Insert a user directly and return a valid token for them. The stored
    /// hash is not a real password hash; use the register endpoint for login
    /// tests.
    pub async fn seed_user(&self, email: &str) -> String {
        self.store
            .create_user(NewUser {
                email: email.to_string(),
                name: "Test User".to_string(),
                address: "Jl. Sudirman 1".to_string(),
                pic: String::new(),
                hashed_password: "unusable".to_string(),
            })
            .await
            .expect("Failed to seed user");
        self.token_for(email)
    }

    pub async fn seed_category(&self, name: &str) -> Category {
        self.store
            .create_category(NewCategory {
                name: name.to_string(),
                color: "#ff0000".to_string(),
            })
            .await
            .expect("Failed to seed category")
    }
}

// ============================================================================
// Request helpers
// ============================================================================

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
