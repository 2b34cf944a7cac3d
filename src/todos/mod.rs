//! # Todos Module
//!
//! Per-user to-do items. The owner is always the verified caller; every route
//! that addresses a to-do by id resolves it first and then checks ownership
//! before touching it.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;


pub use routes::todo_routes;
