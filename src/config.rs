// src/config.rs
//! Application configuration
//!
//! Everything the server needs is read once at startup into [`AppConfig`] and
//! handed to each component by value or behind an `Arc`. Nothing reads the
//! environment after this point.

use chrono::Duration;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:3000,http://localhost:3001,http://localhost:5173";

/// Smallest `page_size` accepted by list endpoints
pub const MIN_PAGE_SIZE: i64 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Cloudinary credentials for the media uploader
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub upload_folder: Option<String>,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("upload_folder", &self.upload_folder)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub server_address: SocketAddr,
    pub token_symmetric_key: String,
    pub access_token_duration: Duration,
    pub max_page_size: i64,
    pub cloudinary: Option<CloudinaryConfig>,
    pub cors_origins: Vec<String>,
    pub reset_db: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url)
            .field("server_address", &self.server_address)
            .field("token_symmetric_key", &"<redacted>")
            .field("access_token_duration", &self.access_token_duration)
            .field("max_page_size", &self.max_page_size)
            .field("cloudinary", &self.cloudinary)
            .field("cors_origins", &self.cors_origins)
            .field("reset_db", &self.reset_db)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from `.env` (if present) and the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` delegates here so
    /// tests can supply values without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| "sqlite://todo_api.db".to_string());

        let server_address = get("SERVER_ADDRESS")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "SERVER_ADDRESS",
                reason: e.to_string(),
            })?;

        let token_symmetric_key =
            get("TOKEN_SYMMETRIC_KEY").ok_or(ConfigError::Missing("TOKEN_SYMMETRIC_KEY"))?;

        let access_token_duration = match get("ACCESS_TOKEN_DURATION") {
            Some(raw) => parse_duration(&raw).map_err(|reason| ConfigError::Invalid {
                key: "ACCESS_TOKEN_DURATION",
                reason,
            })?,
            None => Duration::minutes(15),
        };

        let max_page_size = match get("MAX_PAGE_SIZE") {
            Some(raw) => raw.parse::<i64>().map_err(|e| ConfigError::Invalid {
                key: "MAX_PAGE_SIZE",
                reason: e.to_string(),
            })?,
            None => 10,
        };
        if max_page_size < MIN_PAGE_SIZE {
            return Err(ConfigError::Invalid {
                key: "MAX_PAGE_SIZE",
                reason: format!("must be at least {}", MIN_PAGE_SIZE),
            });
        }

        let cloudinary = match (
            get("CLOUDINARY_CLOUD_NAME"),
            get("CLOUDINARY_API_KEY"),
            get("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
                upload_folder: get("CLOUDINARY_UPLOAD_FOLDER"),
            }),
            _ => None,
        };

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let reset_db = get("RESET_DB")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            server_address,
            token_symmetric_key,
            access_token_duration,
            max_page_size,
            cloudinary,
            cors_origins,
            reset_db,
        })
    }
}

/// Parses `90`, `30s`, `15m`, `24h` or `7d` into a positive duration.
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    let (number, unit) = match raw.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        Some((idx, _)) => raw.split_at(idx),
        None => (raw, "s"),
    };

    let amount: i64 = number
        .parse()
        .map_err(|_| format!("'{}' is not a duration", raw))?;
    if amount <= 0 {
        return Err("duration must be positive".to_string());
    }

    let duration = match unit {
        "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        other => return Err(format!("unknown duration unit '{}'", other)),
    };
    duration.ok_or_else(|| format!("'{}' is out of range", raw))
}
