//! Application configuration loaded from environment variables.
//!
//! Token secrets are fetched once at startup and kept in memory; the access
//! and refresh tokens use distinct secrets and lifetimes.

use std::env;

use crate::services::assets::AssetHostConfig;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,

    /// Access token signing secret (raw bytes)
    pub access_token_secret: Vec<u8>,
    /// Access token lifetime in seconds
    pub access_token_ttl_secs: i64,
    /// Refresh token signing secret (raw bytes)
    pub refresh_token_secret: Vec<u8>,
    /// Refresh token lifetime in seconds
    pub refresh_token_ttl_secs: i64,

    /// Asset host credentials, injected into the upload client
    pub asset_host: AssetHostConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),

            access_token_secret: env::var("ACCESS_TOKEN_SECRET")
                .map_err(|_| ConfigError::Missing("ACCESS_TOKEN_SECRET"))?
                .into_bytes(),
            access_token_ttl_secs: parse_ttl("ACCESS_TOKEN_TTL_SECS", 15 * 60)?,
            refresh_token_secret: env::var("REFRESH_TOKEN_SECRET")
                .map_err(|_| ConfigError::Missing("REFRESH_TOKEN_SECRET"))?
                .into_bytes(),
            refresh_token_ttl_secs: parse_ttl("REFRESH_TOKEN_TTL_SECS", 10 * 24 * 60 * 60)?,

            asset_host: AssetHostConfig {
                base_url: env::var("ASSET_HOST_URL")
                    .unwrap_or_else(|_| "https://api.cloudinary.com/v1_1".to_string()),
                cloud_name: env::var("ASSET_HOST_CLOUD_NAME")
                    .map_err(|_| ConfigError::Missing("ASSET_HOST_CLOUD_NAME"))?,
                api_key: env::var("ASSET_HOST_API_KEY")
                    .map_err(|_| ConfigError::Missing("ASSET_HOST_API_KEY"))?,
                api_secret: env::var("ASSET_HOST_API_SECRET")
                    .map(|v| v.trim().to_string())
                    .map_err(|_| ConfigError::Missing("ASSET_HOST_API_SECRET"))?,
            },
        })
    }

    /// Default config for tests only. Never used by the server binary.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            access_token_secret: b"test_access_key_32_bytes_minimum".to_vec(),
            access_token_ttl_secs: 15 * 60,
            refresh_token_secret: b"test_refresh_key_32_bytes_minimu".to_vec(),
            refresh_token_ttl_secs: 10 * 24 * 60 * 60,
            asset_host: AssetHostConfig {
                base_url: "https://api.cloudinary.com/v1_1".to_string(),
                cloud_name: "test-cloud".to_string(),
                api_key: "test_key".to_string(),
                api_secret: "test_secret".to_string(),
            },
        }
    }
}

fn parse_ttl(name: &'static str, default_secs: i64) -> Result<i64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default_secs),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
