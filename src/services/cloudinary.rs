// src/services/cloudinary.rs
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info};

use super::{MediaUploader, UploadError};
use crate::config::CloudinaryConfig;

const UPLOAD_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Signed uploads to the Cloudinary image API.
///
/// With no credentials every upload fails with [`UploadError::NotConfigured`],
/// so the server still starts in environments without media storage.
#[derive(Debug)]
pub struct CloudinaryUploader {
    config: Option<CloudinaryConfig>,
    client: Client,
}

impl CloudinaryUploader {
    pub fn new(config: Option<CloudinaryConfig>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    fn config(&self) -> Result<&CloudinaryConfig, UploadError> {
        self.config.as_ref().ok_or(UploadError::NotConfigured)
    }

    async fn send(&self, file: Part) -> Result<String, UploadError> {
        let config = self.config()?;
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign_params(
            config.upload_folder.as_deref(),
            &timestamp,
            &config.api_secret,
        );

        let mut form = Form::new()
            .part("file", file)
            .text("api_key", config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature_algorithm", "sha256")
            .text("signature", signature);
        if let Some(folder) = &config.upload_folder {
            form = form.text("folder", folder.clone());
        }

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            config.cloud_name
        );
        debug!(cloud = %config.cloud_name, "Sending upload to Cloudinary");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %body, "Cloudinary upload failed");
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let uploaded = response
            .json::<UploadResponse>()
            .await
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;

        info!(url = %uploaded.secure_url, "Image uploaded to Cloudinary");
        Ok(uploaded.secure_url)
    }
}

#[async_trait]
impl MediaUploader for CloudinaryUploader {
    async fn upload_file(&self, data: Bytes, filename: &str) -> Result<String, UploadError> {
        let length = data.len() as u64;
        let part = Part::stream_with_length(data, length).file_name(filename.to_string());
        self.send(part).await
    }

    async fn upload_from_url(&self, url: &str) -> Result<String, UploadError> {
        self.send(Part::text(url.to_string())).await
    }
}

/// Cloudinary signs the alphabetically sorted upload parameters (excluding
/// `file`, `api_key` and the algorithm itself) with the API secret appended.
fn sign_params(folder: Option<&str>, timestamp: &str, api_secret: &str) -> String {
    let to_sign = match folder {
        Some(folder) => format!("folder={}&timestamp={}", folder, timestamp),
        None => format!("timestamp={}", timestamp),
    };

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}
