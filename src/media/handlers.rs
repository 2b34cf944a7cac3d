// src/media/handlers.rs

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Extension, Multipart,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::models::{RemoteUploadRequest, UploadData, UploadResponse};
use super::validators::{is_valid_image_type, MAX_FILE_SIZE};
use crate::auth::AuthedUser;
use crate::common::{safe_email_log, ApiError, ApiJson, AppState, Validator};
use crate::db::StoreError;
use crate::services::UploadError;
use crate::users::models::UserResponse;

const FILE_FIELD: &str = "file";

/// POST /file - Upload a profile photo from a multipart form
pub async fn upload_file(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!(error = %rejection, "Rejected non-multipart upload");
        ApiError::BadRequest("select-a-file-to-upload".to_string())
    })?;

    info!(email = %safe_email_log(&authed.email), "Photo upload initiated");

    while let Some(field) = multipart.next_field().await.map_err(read_failed)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let data = field.bytes().await.map_err(read_failed)?;

        if data.is_empty() {
            break;
        }
        if data.len() > MAX_FILE_SIZE {
            return Err(ApiError::BadRequest("file-too-large".to_string()));
        }
        if !is_valid_image_type(&data) {
            return Err(ApiError::BadRequest("invalid-image-type".to_string()));
        }

        let url = state
            .uploader
            .upload_file(data, &filename)
            .await
            .map_err(upload_failed)?;

        return finish_upload(&state, &authed, url).await;
    }

    Err(ApiError::BadRequest("select-a-file-to-upload".to_string()))
}

/// POST /remote - Have the media host fetch a photo by URL
pub async fn upload_remote(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    ApiJson(request): ApiJson<RemoteUploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    let validation = request.validate(&request);
    if !validation.is_valid {
        return Err(validation.into());
    }

    info!(
        email = %safe_email_log(&authed.email),
        source = %request.url.trim(),
        "Remote photo upload initiated"
    );

    let url = state
        .uploader
        .upload_from_url(request.url.trim())
        .await
        .map_err(upload_failed)?;

    finish_upload(&state, &authed, url).await
}

/// Only the body limit counts as an oversized file; anything else is a bad form.
fn read_failed(e: MultipartError) -> ApiError {
    warn!(error = %e, "Failed to read multipart body");
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::BadRequest("file-too-large".to_string())
    } else {
        ApiError::BadRequest("select-a-file-to-upload".to_string())
    }
}

fn upload_failed(e: UploadError) -> ApiError {
    error!(error = %e, "Photo upload failed");
    ApiError::Upstream("error-uploading-file".to_string())
}

/// Point the caller's profile photo at the uploaded URL
async fn finish_upload(
    state: &AppState,
    authed: &AuthedUser,
    url: String,
) -> Result<Json<UploadResponse>, ApiError> {
    let user = state
        .store
        .update_user_photo(&authed.email, &url)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::Unauthorized("invalid-user".to_string()),
            other => ApiError::DatabaseError(other),
        })?;

    info!(email = %safe_email_log(&user.email), url = %url, "Profile photo updated");

    Ok(Json(UploadResponse {
        status_code: StatusCode::OK.as_u16(),
        message: "success".to_string(),
        data: UploadData {
            url,
            user: UserResponse::from(&user),
        },
    }))
}
