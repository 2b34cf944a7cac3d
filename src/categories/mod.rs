//! # Categories Module
//!
//! Global to-do categories. Any authenticated user may create, list, edit and
//! delete them; a category still referenced by a to-do cannot be deleted.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;


pub use routes::category_routes;
