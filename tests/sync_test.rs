use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use chronicli::error::SyncError;
use chronicli::spotify::Library;
use chronicli::sync::{
    self, SyncMode,
    append::append_missing,
    fetch::{self, Boundary},
    resolve::resolve_playlist,
};
use chronicli::types::{MonthKey, Page, PlaylistSummary, SavedTrackItem, TrackRef};

// --- In-memory Library implementation driving the core in tests ---

struct FakePlaylist {
    id: String,
    name: String,
    tracks: Vec<String>,
}

#[derive(Default)]
struct FakeLibrary {
    liked: Vec<SavedTrackItem>,
    playlists: Mutex<Vec<FakePlaylist>>,
    liked_page_calls: Mutex<usize>,
    playlist_page_calls: Mutex<usize>,
    create_calls: Mutex<usize>,
    append_batches: Mutex<Vec<usize>>,
    // fault injection
    fail_liked_pages: bool,
    fail_create_for: Option<String>,
    fail_append_after: Option<usize>,
    auth_fail_appends: bool,
}

impl FakeLibrary {
    fn with_liked(liked: Vec<SavedTrackItem>) -> Self {
        FakeLibrary {
            liked,
            ..Default::default()
        }
    }

    /// Seeds a pre-existing playlist without counting as a create call.
    fn add_playlist(&self, name: &str, tracks: &[&str]) -> String {
        let mut playlists = self.playlists.lock().unwrap();
        let id = format!("playlist-{}", playlists.len() + 1);
        playlists.push(FakePlaylist {
            id: id.clone(),
            name: name.to_string(),
            tracks: tracks.iter().map(|t| t.to_string()).collect(),
        });
        id
    }

    fn tracks_of(&self, name: &str) -> Vec<String> {
        self.playlists
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.tracks.clone())
            .unwrap_or_default()
    }

    fn playlist_names(&self) -> Vec<String> {
        self.playlists
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }
}

fn page_of<T: Clone>(all: &[T], limit: u32, offset: u32) -> Page<T> {
    let start = (offset as usize).min(all.len());
    let end = (start + limit as usize).min(all.len());
    Page {
        items: all[start..end].to_vec(),
        has_next: end < all.len(),
    }
}

#[async_trait]
impl Library for FakeLibrary {
    async fn list_liked(&self, limit: u32, offset: u32) -> Result<Page<SavedTrackItem>, SyncError> {
        if self.fail_liked_pages {
            return Err(SyncError::Api("listing unavailable".to_string()));
        }
        *self.liked_page_calls.lock().unwrap() += 1;
        Ok(page_of(&self.liked, limit, offset))
    }

    async fn list_owned_playlists(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Page<PlaylistSummary>, SyncError> {
        *self.playlist_page_calls.lock().unwrap() += 1;
        let summaries: Vec<PlaylistSummary> = self
            .playlists
            .lock()
            .unwrap()
            .iter()
            .map(|p| PlaylistSummary {
                id: p.id.clone(),
                name: p.name.clone(),
            })
            .collect();
        Ok(page_of(&summaries, limit, offset))
    }

    async fn create_playlist(
        &self,
        name: &str,
        _public: bool,
        _description: &str,
    ) -> Result<String, SyncError> {
        if self.fail_create_for.as_deref() == Some(name) {
            return Err(SyncError::Api("create failed".to_string()));
        }
        *self.create_calls.lock().unwrap() += 1;
        Ok(self.add_playlist(name, &[]))
    }

    async fn list_playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<String>, SyncError> {
        let playlists = self.playlists.lock().unwrap();
        let playlist = playlists
            .iter()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| SyncError::Api(format!("unknown playlist {}", playlist_id)))?;
        Ok(page_of(&playlist.tracks, limit, offset))
    }

    async fn append_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), SyncError> {
        if self.auth_fail_appends {
            return Err(SyncError::Auth("access revoked".to_string()));
        }
        {
            let batches = self.append_batches.lock().unwrap();
            if self.fail_append_after == Some(batches.len()) {
                return Err(SyncError::Api("append failed".to_string()));
            }
        }

        let mut playlists = self.playlists.lock().unwrap();
        let playlist = playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| SyncError::Api(format!("unknown playlist {}", playlist_id)))?;
        playlist.tracks.extend(uris.iter().cloned());
        self.append_batches.lock().unwrap().push(uris.len());
        Ok(())
    }
}

fn saved(uri: &str, at: &str) -> SavedTrackItem {
    SavedTrackItem {
        added_at: at.parse::<DateTime<Utc>>().unwrap(),
        track: TrackRef {
            uri: uri.to_string(),
        },
    }
}

fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn uris(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}:{}", prefix, i)).collect()
}

// --- Orchestrator ---

#[tokio::test]
async fn test_end_to_end_files_tracks_under_their_months() {
    let fake = FakeLibrary::with_liked(vec![
        saved("spotify:track:x", "2024-01-15T10:00:00Z"),
        saved("spotify:track:y", "2024-02-01T00:00:00Z"),
        saved("spotify:track:z", "2024-01-20T00:00:00Z"),
    ]);

    let report = sync::run(&fake, at("2024-01-01T00:00:00Z"), SyncMode::Incremental)
        .await
        .unwrap();

    assert_eq!(report.fetched, 3);
    assert_eq!(report.total_added(), 3);
    assert!(!report.has_errors());

    let mut names = fake.playlist_names();
    names.sort();
    assert_eq!(
        names,
        vec!["February 2024 - Chronicle", "January 2024 - Chronicle"]
    );
    assert_eq!(*fake.create_calls.lock().unwrap(), 2);

    let mut january = fake.tracks_of("January 2024 - Chronicle");
    january.sort();
    assert_eq!(january, vec!["spotify:track:x", "spotify:track:z"]);
    assert_eq!(
        fake.tracks_of("February 2024 - Chronicle"),
        vec!["spotify:track:y"]
    );
}

#[tokio::test]
async fn test_second_run_issues_no_mutations() {
    let fake = FakeLibrary::with_liked(vec![
        saved("spotify:track:x", "2024-01-15T10:00:00Z"),
        saved("spotify:track:y", "2024-02-01T00:00:00Z"),
    ]);
    let start = at("2024-01-01T00:00:00Z");

    let first = sync::run(&fake, start, SyncMode::Incremental).await.unwrap();
    assert_eq!(first.total_added(), 2);
    let batches_after_first = fake.append_batches.lock().unwrap().len();

    let second = sync::run(&fake, start, SyncMode::Incremental).await.unwrap();

    assert_eq!(second.total_added(), 0);
    assert_eq!(*fake.create_calls.lock().unwrap(), 2);
    assert_eq!(fake.append_batches.lock().unwrap().len(), batches_after_first);
}

#[tokio::test]
async fn test_overlapping_backlog_run_creates_no_duplicates() {
    let fake = FakeLibrary::with_liked(vec![
        saved("spotify:track:x", "2024-01-15T10:00:00Z"),
        saved("spotify:track:z", "2024-01-20T00:00:00Z"),
    ]);
    let start = at("2024-01-01T00:00:00Z");

    sync::run(&fake, start, SyncMode::Incremental).await.unwrap();
    let report = sync::run(&fake, start, SyncMode::Backlog).await.unwrap();

    assert_eq!(report.total_added(), 0);
    let mut january = fake.tracks_of("January 2024 - Chronicle");
    january.sort();
    assert_eq!(january, vec!["spotify:track:x", "spotify:track:z"]);
}

#[tokio::test]
async fn test_month_failure_does_not_abort_sibling_months() {
    let mut fake = FakeLibrary::with_liked(vec![
        saved("spotify:track:x", "2024-01-15T10:00:00Z"),
        saved("spotify:track:y", "2024-02-01T00:00:00Z"),
    ]);
    fake.fail_create_for = Some("January 2024 - Chronicle".to_string());

    let report = sync::run(&fake, at("2024-01-01T00:00:00Z"), SyncMode::Incremental)
        .await
        .unwrap();

    assert!(report.has_errors());
    assert_eq!(report.months.len(), 2);

    let january = &report.months[0];
    assert_eq!(january.key, MonthKey { year: 2024, month: 1 });
    assert!(january.error.is_some());
    assert_eq!(january.added, 0);

    let february = &report.months[1];
    assert!(february.error.is_none());
    assert_eq!(february.added, 1);
    assert_eq!(
        fake.tracks_of("February 2024 - Chronicle"),
        vec!["spotify:track:y"]
    );
}

#[tokio::test]
async fn test_auth_failure_aborts_all_remaining_months() {
    let mut fake = FakeLibrary::with_liked(vec![
        saved("spotify:track:x", "2024-01-15T10:00:00Z"),
        saved("spotify:track:y", "2024-02-01T00:00:00Z"),
    ]);
    fake.auth_fail_appends = true;

    let err = sync::run(&fake, at("2024-01-01T00:00:00Z"), SyncMode::Incremental)
        .await
        .unwrap_err();

    assert!(err.is_auth());
    // Only the first month's playlist got as far as creation.
    assert_eq!(*fake.create_calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_fetch_failure_aborts_before_any_mutation() {
    let mut fake = FakeLibrary::with_liked(vec![saved(
        "spotify:track:x",
        "2024-01-15T10:00:00Z",
    )]);
    fake.fail_liked_pages = true;

    let err = sync::run(&fake, at("2024-01-01T00:00:00Z"), SyncMode::Incremental)
        .await
        .unwrap_err();

    assert!(!err.is_auth());
    assert!(fake.playlist_names().is_empty());
    assert!(fake.append_batches.lock().unwrap().is_empty());
}

// --- Liked-track fetcher ---

#[tokio::test]
async fn test_fetch_pages_the_whole_listing() {
    let mut liked = Vec::new();
    for i in 0..120 {
        liked.push(saved(
            &format!("spotify:track:{}", i),
            "2024-01-10T00:00:00Z",
        ));
    }
    let fake = FakeLibrary::with_liked(liked);

    let entries = fetch::fetch_liked_since(&fake, at("2024-01-01T00:00:00Z"), Boundary::Exclusive)
        .await
        .unwrap();

    assert_eq!(entries.len(), 120);
    // 120 entries at page size 50: three pages, no early stop.
    assert_eq!(*fake.liked_page_calls.lock().unwrap(), 3);
}

#[tokio::test]
async fn test_boundary_entry_is_mode_dependent() {
    let start = at("2024-01-01T00:00:00Z");
    let fake = FakeLibrary::with_liked(vec![
        saved("spotify:track:boundary", "2024-01-01T00:00:00Z"),
        saved("spotify:track:older", "2023-12-31T23:59:59Z"),
    ]);

    // Incremental (`>`): the entry liked exactly at the prior boundary was
    // already processed and must be skipped.
    let exclusive = fetch::fetch_liked_since(&fake, start, Boundary::Exclusive)
        .await
        .unwrap();
    assert!(exclusive.is_empty());

    // Backfill (`>=`): the start instant itself is covered.
    let inclusive = fetch::fetch_liked_since(&fake, start, Boundary::Inclusive)
        .await
        .unwrap();
    assert_eq!(inclusive.len(), 1);
    assert_eq!(inclusive[0].uri, "spotify:track:boundary");
}

// --- Playlist resolver ---

#[tokio::test]
async fn test_resolver_reuses_existing_playlist_without_creating() {
    let fake = FakeLibrary::default();
    let existing = fake.add_playlist("January 2024 - Chronicle", &[]);

    let resolved = resolve_playlist(&fake, MonthKey { year: 2024, month: 1 }, "desc")
        .await
        .unwrap();

    assert_eq!(resolved.id, existing);
    assert!(!resolved.created);
    assert_eq!(*fake.create_calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_resolver_stops_paging_on_first_match() {
    let fake = FakeLibrary::default();
    fake.add_playlist("January 2024 - Chronicle", &[]);
    for i in 0..70 {
        fake.add_playlist(&format!("Unrelated {}", i), &[]);
    }

    resolve_playlist(&fake, MonthKey { year: 2024, month: 1 }, "desc")
        .await
        .unwrap();

    // The match sits on the first page; the second page is never fetched.
    assert_eq!(*fake.playlist_page_calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_resolver_creates_when_no_name_matches() {
    let fake = FakeLibrary::default();
    fake.add_playlist("Workout Mix", &[]);

    let resolved = resolve_playlist(&fake, MonthKey { year: 2024, month: 3 }, "desc")
        .await
        .unwrap();

    assert!(resolved.created);
    assert_eq!(*fake.create_calls.lock().unwrap(), 1);
    assert!(
        fake.playlist_names()
            .contains(&"March 2024 - Chronicle".to_string())
    );
}

// --- Deduplicating appender ---

#[tokio::test]
async fn test_appends_in_api_bounded_batches() {
    let fake = FakeLibrary::default();
    let id = fake.add_playlist("January 2024 - Chronicle", &[]);
    let candidates = uris("spotify:track", 250);

    let added = append_missing(&fake, &id, &candidates).await.unwrap();

    assert_eq!(added, 250);
    assert_eq!(*fake.append_batches.lock().unwrap(), vec![100, 100, 50]);
}

#[tokio::test]
async fn test_partial_overlap_appends_only_missing_tracks() {
    let fake = FakeLibrary::default();
    let id = fake.add_playlist("January 2024 - Chronicle", &["a", "b"]);
    let candidates: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();

    let added = append_missing(&fake, &id, &candidates).await.unwrap();

    assert_eq!(added, 2);
    assert_eq!(
        fake.tracks_of("January 2024 - Chronicle"),
        vec!["a", "b", "c", "d"]
    );
    assert_eq!(*fake.append_batches.lock().unwrap(), vec![2]);
}

#[tokio::test]
async fn test_empty_difference_issues_no_mutation() {
    let fake = FakeLibrary::default();
    let id = fake.add_playlist("January 2024 - Chronicle", &["a", "b"]);
    let candidates: Vec<String> = ["b", "a"].iter().map(|s| s.to_string()).collect();

    let added = append_missing(&fake, &id, &candidates).await.unwrap();

    assert_eq!(added, 0);
    assert!(fake.append_batches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_mid_sequence_batch_failure_reports_committed_count() {
    let mut fake = FakeLibrary::default();
    fake.fail_append_after = Some(1);
    let id = fake.add_playlist("January 2024 - Chronicle", &[]);
    let candidates = uris("spotify:track", 150);

    let err = append_missing(&fake, &id, &candidates).await.unwrap_err();

    match err {
        SyncError::PartialAppend { appended, .. } => assert_eq!(appended, 100),
        other => panic!("expected PartialAppend, got {:?}", other),
    }
    // The first batch stays committed remotely; a retry would skip it.
    assert_eq!(fake.tracks_of("January 2024 - Chronicle").len(), 100);
}
