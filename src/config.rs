//! Configuration loading for the Chronicle sync.
//!
//! Credentials and endpoints are read from environment variables, optionally
//! seeded from a `.env` file in the platform data directory
//! (`chronicli/.env`). They are read exactly once at startup into an
//! explicit [`Config`] (or [`AuthConfig`] for the interactive authorization
//! flow) that is passed into the remote client; core logic never performs
//! ambient environment lookups.
//!
//! Recognized variables:
//!
//! - `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` - application credentials
//! - `SPOTIFY_REFRESH_TOKEN` - the long-lived credential the sync runs on
//! - `SPOTIFY_REDIRECT_URI` - OAuth redirect target (interactive auth only)
//! - `LAST_RUN_TIMESTAMP` - high-water mark supplied by the orchestration
//!   environment (e.g. a CI secret); optional
//! - `SERVER_ADDRESS` - bind address for the local callback server

use std::{env, path::PathBuf};

use crate::error::SyncError;

/// OAuth scope the sync needs: library reads plus playlist reads/writes.
pub const SPOTIFY_SCOPE: &str = "playlist-read-private playlist-read-collaborative \
     playlist-modify-private playlist-modify-public user-library-modify user-library-read";

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8888/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Looks for `chronicli/.env` under the platform-specific local data
/// directory (e.g. `~/.local/share/chronicli/.env` on Linux) and loads it if
/// present. Variables already set in the process environment take priority,
/// so scheduled runs that inject secrets directly are unaffected.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("chronicli/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(path).map_err(|e| e.to_string())?;
    } else {
        // No data-dir .env; fall back to one in the working directory.
        dotenv::dotenv().ok();
    }
    Ok(())
}

fn required(name: &str) -> Result<String, SyncError> {
    env::var(name).map_err(|_| SyncError::Config(format!("{} must be set", name)))
}

fn or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Everything the sync needs, constructed once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub api_url: String,
    pub token_url: String,
    /// Raw high-water mark as supplied by the environment; parsed (and
    /// validated) by the window resolver, not here.
    pub last_run: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, SyncError> {
        Ok(Config {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            refresh_token: required("SPOTIFY_REFRESH_TOKEN")?,
            api_url: or_default("SPOTIFY_API_URL", DEFAULT_API_URL),
            token_url: or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            last_run: env::var("LAST_RUN_TIMESTAMP").ok(),
        })
    }
}

/// Settings for the interactive authorization flow. The refresh token is
/// exactly what this flow produces, so it is not required here.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub server_address: String,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, SyncError> {
        Ok(AuthConfig {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: or_default("SPOTIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            auth_url: or_default("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            server_address: or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
        })
    }
}
