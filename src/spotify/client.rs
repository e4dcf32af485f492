use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    error::SyncError,
    management::TokenManager,
    spotify::Library,
    types::{
        AddTracksRequest, AddTracksResponse, CreatePlaylistRequest, CreatePlaylistResponse,
        CurrentUserResponse, Page, PlaylistSummary, PlaylistTracksResponse, SavedTrackItem,
        SavedTracksResponse, UserPlaylistsResponse,
    },
};

/// Per-call timeout at the remote-client boundary. Generous on purpose;
/// a timed-out call surfaces immediately instead of being retried.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Reqwest-backed [`Library`] implementation against the Spotify Web API.
///
/// Holds the one HTTP client for the invocation, the token manager that
/// keeps a valid access token available, and the current user id (fetched
/// lazily from `/me`, needed only for playlist creation).
pub struct SpotifyLibrary {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
    user_id: Mutex<Option<String>>,
}

impl SpotifyLibrary {
    pub fn new(cfg: &Config) -> Self {
        SpotifyLibrary {
            http: Self::http_client(),
            api_url: cfg.api_url.clone(),
            tokens: Mutex::new(TokenManager::new(cfg)),
            user_id: Mutex::new(None),
        }
    }

    /// Like [`SpotifyLibrary::new`], but reuses an access token cached on
    /// disk by a previous run if it is still valid.
    pub async fn with_cached_token(cfg: &Config) -> Self {
        SpotifyLibrary {
            http: Self::http_client(),
            api_url: cfg.api_url.clone(),
            tokens: Mutex::new(TokenManager::load_cached(cfg).await),
            user_id: Mutex::new(None),
        }
    }

    fn http_client() -> Client {
        Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to construct HTTP client")
    }

    async fn bearer(&self) -> Result<String, SyncError> {
        self.tokens.lock().await.get_valid_token().await
    }

    /// Issues a GET and deserializes the JSON body, classifying HTTP
    /// failures into the sync error taxonomy.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SyncError> {
        let token = self.bearer().await?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let response = Self::classify(response)?;
        Ok(response.json::<T>().await?)
    }

    fn classify(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SyncError::Auth(format!(
                "spotify rejected the request with status {}",
                status
            )));
        }
        Ok(response.error_for_status()?)
    }

    /// The current user's id, fetched once from `/me` and cached for the
    /// rest of the invocation. Only playlist creation needs it.
    async fn current_user_id(&self) -> Result<String, SyncError> {
        let mut cached = self.user_id.lock().await;
        if let Some(id) = cached.as_ref() {
            return Ok(id.clone());
        }

        let api_url = format!("{uri}/me", uri = &self.api_url);
        let user = self.get_json::<CurrentUserResponse>(&api_url).await?;
        *cached = Some(user.id.clone());
        Ok(user.id)
    }
}

#[async_trait]
impl Library for SpotifyLibrary {
    async fn list_liked(&self, limit: u32, offset: u32) -> Result<Page<SavedTrackItem>, SyncError> {
        let api_url = format!(
            "{uri}/me/tracks?limit={limit}&offset={offset}",
            uri = &self.api_url,
        );

        let json = self.get_json::<SavedTracksResponse>(&api_url).await?;
        Ok(Page {
            has_next: json.next.is_some(),
            items: json.items,
        })
    }

    async fn list_owned_playlists(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Page<PlaylistSummary>, SyncError> {
        let api_url = format!(
            "{uri}/me/playlists?limit={limit}&offset={offset}",
            uri = &self.api_url,
        );

        let json = self.get_json::<UserPlaylistsResponse>(&api_url).await?;
        Ok(Page {
            has_next: json.next.is_some(),
            items: json.items,
        })
    }

    async fn create_playlist(
        &self,
        name: &str,
        public: bool,
        description: &str,
    ) -> Result<String, SyncError> {
        let user_id = self.current_user_id().await?;
        let api_url = format!(
            "{uri}/users/{user_id}/playlists",
            uri = &self.api_url,
            user_id = user_id,
        );

        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public,
            collaborative: false,
        };

        let token = self.bearer().await?;
        let response = self
            .http
            .post(&api_url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let response = Self::classify(response)?;

        let created = response.json::<CreatePlaylistResponse>().await?;
        Ok(created.id)
    }

    async fn list_playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<String>, SyncError> {
        // Only the URIs matter for membership; trim the payload down.
        let api_url = format!(
            "{uri}/playlists/{id}/tracks?fields=items(track(uri)),next&limit={limit}&offset={offset}",
            uri = &self.api_url,
            id = playlist_id,
        );

        let json = self.get_json::<PlaylistTracksResponse>(&api_url).await?;
        Ok(Page {
            has_next: json.next.is_some(),
            items: json
                .items
                .into_iter()
                .filter_map(|item| item.track.map(|t| t.uri))
                .collect(),
        })
    }

    async fn append_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), SyncError> {
        let api_url = format!(
            "{uri}/playlists/{id}/tracks",
            uri = &self.api_url,
            id = playlist_id,
        );

        let body = AddTracksRequest {
            uris: uris.to_vec(),
        };

        let token = self.bearer().await?;
        let response = self
            .http
            .post(&api_url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let response = Self::classify(response)?;

        response.json::<AddTracksResponse>().await?;
        Ok(())
    }
}
