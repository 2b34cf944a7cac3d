//! Password hashing and verification
//!
//! Argon2id with the crate's default (memory-hard) parameters. Hashes are
//! stored as PHC strings, e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`, so the
//! salt and parameters travel with the hash.
//!
//! Both functions are stateless and safe to call from any number of requests
//! at once. Callers on the async path should run them via
//! `tokio::task::spawn_blocking`; see [`hash_password_blocking`].

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("failed to hash password: {0}")]
    Hashing(String),

    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("hashing task failed: {0}")]
    Task(String),
}

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| HashError::Hashing(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
///
/// A mismatch is `Ok(false)`; only an unparseable stored hash is an error.
/// The comparison itself is constant-time inside `argon2`.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, HashError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| HashError::MalformedHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn hash_password_blocking(password: String) -> Result<String, HashError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| HashError::Task(e.to_string()))?
}

pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, HashError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| HashError::Task(e.to_string()))?
}
