//! # Users Module
//!
//! Registration, login and the `/users/me` identity check.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;


pub use routes::{public_user_routes, user_routes};
