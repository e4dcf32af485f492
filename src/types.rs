use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// Shared state between the interactive auth flow and the callback server.
#[derive(Debug, Clone)]
pub struct AuthFlowState {
    pub state_param: String,
    pub token: Option<Token>,
}

/// One page of a paginated remote listing.
///
/// The uniform contract every paginated endpoint produces: the items of the
/// current page plus whether the remote reports a further page. Consumers
/// drive offsets through [`crate::sync::pages`] instead of hand-rolling
/// offset arithmetic.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next: bool,
}

/// A single like event: a track URI plus the instant it was liked, UTC.
///
/// A track liked twice produces two entries with different timestamps and
/// they are treated independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikedEntry {
    pub uri: String,
    pub added_at: DateTime<Utc>,
}

/// A UTC calendar month, the grouping key for Chronicle playlists.
///
/// Two timestamps in the same UTC calendar month always map to the same key
/// regardless of day or time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl MonthKey {
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        MonthKey {
            year: dt.year(),
            month: dt.month(),
        }
    }

    /// English month name, e.g. "January". `month` is always 1..=12 since
    /// keys are only constructed from chrono datetimes.
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// The canonical Chronicle playlist name for this month,
    /// e.g. `January 2024 - Chronicle`.
    pub fn playlist_name(&self) -> String {
        format!("{} {} - Chronicle", self.month_name(), self.year)
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// --- Spotify Web API wire types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTracksResponse {
    pub items: Vec<SavedTrackItem>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrackItem {
    pub added_at: DateTime<Utc>,
    pub track: TrackRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRef {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPlaylistsResponse {
    pub items: Vec<PlaylistSummary>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksResponse {
    pub items: Vec<PlaylistTrackItem>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrackItem {
    /// Absent for tracks the API can no longer resolve (e.g. removed
    /// local files); such rows are skipped when building membership.
    pub track: Option<TrackRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksResponse {
    pub snapshot_id: String,
}

/// One row of the per-month summary table printed after a run.
#[derive(Tabled)]
pub struct MonthTableRow {
    pub month: String,
    pub playlist: String,
    pub added: String,
    pub status: String,
}
