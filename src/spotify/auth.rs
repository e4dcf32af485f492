use std::{sync::Arc, time::Duration};

use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    config::{AuthConfig, SPOTIFY_SCOPE},
    error::SyncError,
    info,
    management::TokenManager,
    server::start_api_server,
    success,
    types::{AuthFlowState, Token},
    warning,
};

/// Runs the interactive authorization-code flow against Spotify.
///
/// This is the one-time collaborator that produces the long-lived refresh
/// token the scheduled sync runs on:
///
/// 1. Starts a local callback server
/// 2. Opens the authorization URL in the user's browser (with a random
///    `state` parameter the callback handler verifies)
/// 3. Waits for the callback to exchange the authorization code for tokens
/// 4. Caches the token and prints the refresh token so it can be stored as
///    the `SPOTIFY_REFRESH_TOKEN` secret wherever the sync is scheduled
///
/// Browser launch failures degrade to printing the URL for manual
/// navigation; a missing callback within 60 seconds is fatal.
pub async fn auth(cfg: AuthConfig, shared_state: Arc<Mutex<Option<AuthFlowState>>>) {
    let state_param = generate_state_param();

    // start callback server
    let server_state = Arc::clone(&shared_state);
    let server_cfg = cfg.clone();
    tokio::spawn(async move {
        start_api_server(server_cfg, server_state).await;
    });

    let auth_url = format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&state={state}&scope={scope}",
        auth_url = &cfg.auth_url,
        client_id = &cfg.client_id,
        redirect_uri = &cfg.redirect_uri,
        state = state_param,
        scope = SPOTIFY_SCOPE.replace(' ', "%20"),
    );

    // Store the state parameter before redirecting so the callback can
    // verify it.
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(AuthFlowState {
            state_param,
            token: None,
        });
    }

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state).await;

    match token {
        Some(t) => {
            if let Err(e) = TokenManager::persist_token(&t).await {
                crate::error!("Failed to save token to cache: {}", e);
            }

            success!("Authorization successful!");
            info!(
                "Store this refresh token as SPOTIFY_REFRESH_TOKEN where the sync runs:\n{}",
                t.refresh_token
            );
        }
        None => {
            crate::error!("Authorization failed or timed out.");
        }
    }
}

/// Random value for the OAuth `state` parameter, echoed back by Spotify
/// and checked by the callback handler.
fn generate_state_param() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Polls the shared state for a completed token with a 60-second timeout,
/// running concurrently with the callback handler that populates it.
async fn wait_for_token(shared_state: Arc<Mutex<Option<AuthFlowState>>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(flow) = lock.as_ref() {
            if let Some(token) = &flow.token {
                return Some(token.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges an authorization code for a token.
///
/// Final step of the authorization-code flow: posts the code to the token
/// endpoint with the client id and secret as HTTP basic auth. The response
/// carries both the access token and the refresh token this whole flow
/// exists to obtain.
pub async fn exchange_code(cfg: &AuthConfig, code: &str) -> Result<Token, SyncError> {
    let client = Client::new();
    let res = client
        .post(&cfg.token_url)
        .basic_auth(&cfg.client_id, Some(&cfg.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &cfg.redirect_uri),
        ])
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(SyncError::Auth(format!(
            "code exchange failed with status {}",
            res.status()
        )));
    }

    let json: Value = res.json().await?;
    let access_token = json["access_token"]
        .as_str()
        .ok_or_else(|| SyncError::Auth("token response missing access_token".to_string()))?;
    let refresh_token = json["refresh_token"]
        .as_str()
        .ok_or_else(|| SyncError::Auth("token response missing refresh_token".to_string()))?;

    Ok(Token {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
        obtained_at: Utc::now().timestamp() as u64,
    })
}
