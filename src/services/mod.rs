// src/services/mod.rs
//
// External services used by the handlers. Each one sits behind a trait so the
// HTTP layer can be exercised without network access.

pub mod cloudinary;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use cloudinary::CloudinaryUploader;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("media storage is not configured")]
    NotConfigured,

    #[error("upload request failed: {0}")]
    Request(String),

    #[error("upload rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("unexpected upload response: {0}")]
    InvalidResponse(String),
}

/// Stores an image somewhere public and returns the URL it can be fetched from
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload_file(&self, data: Bytes, filename: &str) -> Result<String, UploadError>;

    /// Let the storage provider fetch the image itself
    async fn upload_from_url(&self, url: &str) -> Result<String, UploadError>;
}
