//! # Auth Module
//!
//! This module handles authentication and authorization:
//! - Password hashing and verification (argon2)
//! - Session token issuance and verification (AES-256-GCM)
//! - The Bearer-token middleware guarding protected routes
//! - AuthedUser extractor and ownership checks for handlers

pub mod access;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

#[cfg(test)]
mod tests;

pub use access::{ensure_owner, load_owned_todo, require_category, Owned};
pub use extractors::AuthedUser;
pub use middleware::require_auth;
pub use token::{Payload, TokenAuthority, TokenError};
