//! Application configuration loaded from environment variables.
//!
//! Strava credentials are secrets and must come from the environment (or a
//! local `.env` file during development); nothing is hard-coded.

use std::env;

use crate::models::BoundingBox;

/// Default area for segment explore (south, west, north, east).
const DEFAULT_SEGMENT_BOUNDS: &str = "51.036047,-114.150184,51.054738,-114.111313";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Server port
    pub port: u16,
    /// CSV file holding cached photo metadata
    pub photo_cache_path: String,
    /// Area searched for segments at startup
    pub segment_bounds: BoundingBox,
    /// Strava explore activity type ("riding" or "running")
    pub segment_activity_type: String,
    /// Directory served under /static
    pub static_dir: String,
    /// Strava REST API base URL
    pub strava_api_url: String,
    /// Strava OAuth token endpoint
    pub strava_oauth_url: String,

    // --- Secrets ---
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Long-lived refresh token for the dashboard's athlete
    pub strava_refresh_token: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            port: 8080,
            photo_cache_path: "data/photos.csv".to_string(),
            segment_bounds: BoundingBox {
                south: 51.036047,
                west: -114.150184,
                north: 51.054738,
                east: -114.111313,
            },
            segment_activity_type: "riding".to_string(),
            static_dir: "static".to_string(),
            strava_api_url: "http://127.0.0.1:9/api/v3".to_string(),
            strava_oauth_url: "http://127.0.0.1:9/oauth/token".to_string(),
            strava_client_secret: "test_secret".to_string(),
            strava_refresh_token: "test_refresh_token".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let segment_bounds = env::var("SEGMENT_BOUNDS")
            .unwrap_or_else(|_| DEFAULT_SEGMENT_BOUNDS.to_string())
            .parse()
            .map_err(|e| ConfigError::Invalid("SEGMENT_BOUNDS", e))?;

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", format!("not a port number: {}", raw)))?,
            Err(_) => 8080,
        };

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            port,
            photo_cache_path: env::var("PHOTO_CACHE_PATH")
                .unwrap_or_else(|_| "data/photos.csv".to_string()),
            segment_bounds,
            segment_activity_type: env::var("SEGMENT_ACTIVITY_TYPE")
                .unwrap_or_else(|_| "riding".to_string()),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
            strava_api_url: env::var("STRAVA_API_URL")
                .unwrap_or_else(|_| "https://www.strava.com/api/v3".to_string()),
            strava_oauth_url: env::var("STRAVA_OAUTH_URL")
                .unwrap_or_else(|_| "https://www.strava.com/oauth/token".to_string()),

            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            strava_refresh_token: env::var("STRAVA_REFRESH_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_REFRESH_TOKEN"))?,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
