use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;

use crate::{config::Config, error::SyncError, types::Token};

/// Keeps a valid access token available for API calls.
///
/// The long-lived refresh token from [`Config`] is the real credential; the
/// manager exchanges it for short-lived access tokens on demand, reusing a
/// cached token from disk when one is still valid. Tokens are refreshed
/// 4 minutes before their reported expiry.
pub struct TokenManager {
    client_id: String,
    client_secret: String,
    refresh_token: String,
    token_url: String,
    token: Option<Token>,
}

impl TokenManager {
    pub fn new(cfg: &Config) -> Self {
        TokenManager {
            client_id: cfg.client_id.clone(),
            client_secret: cfg.client_secret.clone(),
            refresh_token: cfg.refresh_token.clone(),
            token_url: cfg.token_url.clone(),
            token: None,
        }
    }

    /// Like [`TokenManager::new`], but seeded with whatever token the last
    /// run left in the cache file. A missing or unreadable cache is fine;
    /// the first API call will refresh.
    pub async fn load_cached(cfg: &Config) -> Self {
        let mut mgr = Self::new(cfg);
        if let Ok(content) = async_fs::read_to_string(Self::token_path()).await {
            if let Ok(token) = serde_json::from_str::<Token>(&content) {
                mgr.token = Some(token);
            }
        }
        mgr
    }

    /// Returns an access token that is valid right now, refreshing first if
    /// the cached one is missing or about to expire.
    pub async fn get_valid_token(&mut self) -> Result<String, SyncError> {
        if self.is_expired() {
            let new_token = self.refresh().await?;
            let _ = Self::persist_token(&new_token).await;
            self.token = Some(new_token);
        }

        // is_expired() returning false guarantees a token is present.
        Ok(self
            .token
            .as_ref()
            .map(|t| t.access_token.clone())
            .unwrap_or_default())
    }

    fn is_expired(&self) -> bool {
        match &self.token {
            None => true,
            Some(token) => {
                let now = Utc::now().timestamp() as u64;
                now >= (token.obtained_at + token.expires_in).saturating_sub(240)
            }
        }
    }

    async fn refresh(&self) -> Result<Token, SyncError> {
        let client = Client::new();
        let res = client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", &self.refresh_token),
            ])
            .send()
            .await?;

        if !res.status().is_success() {
            // A rejected refresh token means no further call can succeed.
            return Err(SyncError::Auth(format!(
                "token refresh failed with status {}",
                res.status()
            )));
        }

        let json: serde_json::Value = res.json().await?;
        let access_token = json["access_token"]
            .as_str()
            .ok_or_else(|| SyncError::Auth("token response missing access_token".to_string()))?;

        Ok(Token {
            access_token: access_token.to_string(),
            // Spotify may omit the refresh token on refresh; keep ours.
            refresh_token: json["refresh_token"]
                .as_str()
                .unwrap_or(&self.refresh_token)
                .to_string(),
            scope: json["scope"].as_str().unwrap_or_default().to_string(),
            expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    /// Writes a token to the cache file, creating parent directories as
    /// needed. Also used by the interactive auth flow to store the token it
    /// just obtained.
    pub async fn persist_token(token: &Token) -> Result<(), String> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(token).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    fn token_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("chronicli/cache/token.json");
        path
    }
}
