use super::models::{CreateUserRequest, LoginUserRequest, LoginUserResponse, NewUser, UserResponse};
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::{AuthedUser, Payload};
use crate::common::{safe_email_log, ApiError, ApiJson, AppState, Validator};
use crate::db::StoreError;
use axum::{extract::Extension, Json};
use std::sync::Arc;
use tracing::{error, info, warn};

/// POST /users/register - Create an account
pub async fn register_user(
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let validation = request.validate(&request);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let hashed_password = hash_password_blocking(request.password).await?;

    let user = state
        .store
        .create_user(NewUser {
            email: request.email,
            name: request.name,
            address: request.address,
            pic: request.pic,
            hashed_password,
        })
        .await
        .map_err(|e| match e {
            StoreError::Duplicate => {
                ApiError::BadRequest("email-already-exists".to_string())
            }
            other => ApiError::DatabaseError(other),
        })?;

    info!(email = %safe_email_log(&user.email), "User registered");
    Ok(Json(UserResponse::from(&user)))
}

/// POST /users/login - Exchange credentials for a session token
pub async fn login_user(
    Extension(state): Extension<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginUserRequest>,
) -> Result<Json<LoginUserResponse>, ApiError> {
    let validation = request.validate(&request);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let user = state
        .store
        .get_user_by_email(&request.email)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => {
                warn!(email = %safe_email_log(&request.email), "Login for unknown email");
                ApiError::NotFound("invalid-password".to_string())
            }
            other => ApiError::DatabaseError(other),
        })?;

    let matches = verify_password_blocking(request.password, user.hashed_password.clone())
        .await
        .map_err(|e| {
            error!(error = %e, email = %safe_email_log(&user.email), "Stored password hash is unusable");
            ApiError::from(e)
        })?;

    if !matches {
        warn!(email = %safe_email_log(&user.email), "Login with wrong password");
        return Err(ApiError::Unauthorized("invalid-password".to_string()));
    }

    let (access_token, payload) = state
        .tokens
        .create_token(&user.email, state.config.access_token_duration)?;

    info!(email = %safe_email_log(&user.email), "User logged in");
    Ok(Json(LoginUserResponse {
        access_token,
        access_token_expires_at: payload.expires_at,
        user: UserResponse::from(&user),
    }))
}

/// GET /users/me - Echo the verified token payload
pub async fn me(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthedUser,
) -> Result<Json<Payload>, ApiError> {
    match state.store.get_user_by_email(&user.email).await {
        Ok(_) => Ok(Json(user.payload)),
        Err(StoreError::NotFound) => {
            warn!(email = %safe_email_log(&user.email), "Valid token for a user that no longer exists");
            Err(ApiError::Unauthorized("invalid-user".to_string()))
        }
        Err(e) => Err(ApiError::DatabaseError(e)),
    }
}
