//! # Media Module
//!
//! Profile photo uploads, either as a multipart file or as a remote URL the
//! media host fetches itself. The photo always belongs to the caller.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;


pub use routes::media_routes;
