// src/auth/token.rs
//! Session token issuance and verification
//!
//! A token is `v1.local.` followed by the unpadded base64url encoding of
//! `nonce (12 bytes) || AES-256-GCM ciphertext+tag`. The plaintext is the JSON
//! encoded [`Payload`]; the `v1.local.` header is bound as associated data so
//! it cannot be swapped without failing authentication.
//!
//! Holders of a token cannot read or alter its payload without the server key,
//! and any modification is reported as [`TokenError::Invalid`].

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng, Payload as AeadPayload},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Required length of the symmetric key, in bytes
pub const SYMMETRIC_KEY_SIZE: usize = 32;

const TOKEN_HEADER: &str = "v1.local.";
const NONCE_SIZE: usize = 12;
const TAG_SIZE: usize = 16;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid key size: must be exactly {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("token creation failed: {0}")]
    Creation(String),

    #[error("token is invalid: {0}")]
    Invalid(String),

    #[error("token has expired")]
    Expired,
}

/// Verified contents of a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Unique per issuance, reserved for revocation
    pub id: Uuid,
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Payload {
    fn new(subject: &str, ttl: Duration, now: DateTime<Utc>) -> Result<Self, TokenError> {
        if ttl <= Duration::zero() {
            return Err(TokenError::Creation("ttl must be positive".to_string()));
        }

        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Creation("ttl overflows the clock".to_string()))?;

        Ok(Self {
            id: Uuid::new_v4(),
            subject: subject.to_string(),
            issued_at: now,
            expires_at,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

pub struct TokenAuthority {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("cipher", &"<redacted>")
            .finish()
    }
}

impl TokenAuthority {
    /// Build an authority from the raw symmetric key, which must be exactly
    /// [`SYMMETRIC_KEY_SIZE`] bytes.
    pub fn new(key: &[u8]) -> Result<Self, TokenError> {
        let invalid = || TokenError::InvalidKeyLength {
            expected: SYMMETRIC_KEY_SIZE,
            actual: key.len(),
        };

        if key.len() != SYMMETRIC_KEY_SIZE {
            return Err(invalid());
        }
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| invalid())?;

        Ok(Self { cipher })
    }

    /// Issue a token for `subject` that stays valid for `ttl`.
    pub fn create_token(&self, subject: &str, ttl: Duration) -> Result<(String, Payload), TokenError> {
        self.create_token_at(subject, ttl, Utc::now())
    }

    pub(crate) fn create_token_at(
        &self,
        subject: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<(String, Payload), TokenError> {
        let payload = Payload::new(subject, ttl, now)?;
        let plaintext =
            serde_json::to_vec(&payload).map_err(|e| TokenError::Creation(e.to_string()))?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(
                nonce,
                AeadPayload {
                    msg: &plaintext,
                    aad: TOKEN_HEADER.as_bytes(),
                },
            )
            .map_err(|e| TokenError::Creation(e.to_string()))?;

        let mut combined = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);

        let token = format!("{}{}", TOKEN_HEADER, URL_SAFE_NO_PAD.encode(combined));
        Ok((token, payload))
    }

    /// Authenticate and decode a token, rejecting it once expired.
    pub fn verify_token(&self, token: &str) -> Result<Payload, TokenError> {
        self.verify_token_at(token, Utc::now())
    }

    pub(crate) fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Payload, TokenError> {
        let body = token
            .strip_prefix(TOKEN_HEADER)
            .ok_or_else(|| TokenError::Invalid("unsupported token header".to_string()))?;

        let combined = URL_SAFE_NO_PAD
            .decode(body.as_bytes())
            .map_err(|_| TokenError::Invalid("malformed token encoding".to_string()))?;

        if combined.len() < NONCE_SIZE + TAG_SIZE {
            return Err(TokenError::Invalid("token is truncated".to_string()));
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(
                Nonce::from_slice(nonce_bytes),
                AeadPayload {
                    msg: ciphertext,
                    aad: TOKEN_HEADER.as_bytes(),
                },
            )
            .map_err(|_| TokenError::Invalid("authentication failed".to_string()))?;

        let payload: Payload = serde_json::from_slice(&plaintext)
            .map_err(|e| TokenError::Invalid(format!("undecodable payload: {}", e)))?;

        if payload.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(payload)
    }
}

/// Random alphanumeric key of [`SYMMETRIC_KEY_SIZE`] characters, suitable for
/// `TOKEN_SYMMETRIC_KEY`.
pub fn generate_symmetric_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SYMMETRIC_KEY_SIZE)
        .map(char::from)
        .collect()
}
