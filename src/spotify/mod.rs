//! # Spotify Integration Module
//!
//! The integration layer between the sync core and the Spotify Web API.
//! It has two halves:
//!
//! - [`Library`] - the abstract capability the sync core is written
//!   against: paginated liked-track listing, owned-playlist listing,
//!   playlist creation, playlist membership listing and batched track
//!   appends. Tests drive the core through an in-memory implementation of
//!   this trait; production uses [`SpotifyLibrary`].
//! - [`SpotifyLibrary`] - the reqwest-backed client implementing the
//!   capability against the Spotify Web API, plus the [`auth`] submodule
//!   implementing the interactive authorization flow that produces the
//!   refresh token the sync runs on.
//!
//! ## Endpoints covered
//!
//! - `GET /me/tracks` - liked tracks, newest first, with like timestamps
//! - `GET /me/playlists` - the current user's playlists
//! - `POST /users/{user_id}/playlists` - create a playlist
//! - `GET /playlists/{id}/tracks` - playlist membership (URIs only)
//! - `POST /playlists/{id}/tracks` - append up to 100 tracks
//! - `GET /me` - current user id, fetched once and cached
//! - `POST /api/token` - authorization-code and refresh-token grants
//!
//! ## Error handling
//!
//! Every call classifies failures into the [`crate::error::SyncError`]
//! taxonomy: 401/403 become `Auth` (the whole invocation must stop),
//! everything else becomes `Api` (transient, scoped to the operation in
//! progress). There is no internal retry or backoff; recovery is a safe
//! re-invocation of the whole run.

use async_trait::async_trait;

use crate::{
    error::SyncError,
    types::{Page, PlaylistSummary, SavedTrackItem},
};

pub mod auth;
mod client;

pub use client::SpotifyLibrary;

/// The remote library capability the sync core needs.
///
/// All listings are offset-paginated and return a [`Page`]; consumers drive
/// offsets through [`crate::sync::pages`]. Implementations perform no
/// internal retries - failures surface immediately, classified per
/// [`SyncError`].
#[async_trait]
pub trait Library: Send + Sync {
    /// One page of the user's liked tracks, newest first.
    async fn list_liked(&self, limit: u32, offset: u32) -> Result<Page<SavedTrackItem>, SyncError>;

    /// One page of the playlists owned by (or followed by) the current user.
    async fn list_owned_playlists(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Page<PlaylistSummary>, SyncError>;

    /// Creates a playlist and returns its id.
    async fn create_playlist(
        &self,
        name: &str,
        public: bool,
        description: &str,
    ) -> Result<String, SyncError>;

    /// One page of a playlist's membership, as track URIs.
    async fn list_playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<String>, SyncError>;

    /// Appends tracks to a playlist. Callers must keep `uris` within the
    /// API's 100-track per-request cap.
    async fn append_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), SyncError>;
}
