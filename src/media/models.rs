// src/media/models.rs

use serde::{Deserialize, Serialize};

use crate::users::models::UserResponse;

#[derive(Debug, Deserialize)]
pub struct RemoteUploadRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadData {
    pub url: String,
    pub user: UserResponse,
}

/// Envelope returned by both upload endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status_code: u16,
    pub message: String,
    pub data: UploadData,
}
