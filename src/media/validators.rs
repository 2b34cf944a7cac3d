use infer::Infer;
use reqwest::Url;

use super::models::RemoteUploadRequest;
use crate::common::{ValidationResult, Validator};

/// File size limit: 5MB
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

impl Validator<RemoteUploadRequest> for RemoteUploadRequest {
    fn validate(&self, data: &RemoteUploadRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.url.trim().is_empty() {
            result.add_error("url", "is required");
            return result;
        }

        match Url::parse(data.url.trim()) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {}
            _ => result.add_error("url", "must be an absolute http or https URL"),
        }

        result
    }
}

/// Sniffs the content, ignoring whatever name or content type the client sent.
pub fn is_valid_image_type(data: &[u8]) -> bool {
    let infer = Infer::new();
    if let Some(info) = infer.get(data) {
        matches!(
            info.mime_type(),
            "image/jpeg" | "image/png" | "image/gif" | "image/webp"
        )
    } else {
        false
    }
}
