//! # Synchronization Core
//!
//! The incremental synchronization algorithm: given a window start and the
//! live state of the remote account, compute and issue the minimal set of
//! remote mutations (playlist creations, track appends) that files every
//! liked track under its month's Chronicle playlist, exactly once.
//!
//! The pipeline is `fetch` → `bucket` → per month: `resolve` → `append`,
//! driven sequentially by [`run`]. Sequential processing is load-bearing:
//! playlist resolution is check-then-create and is only safe when no other
//! writer can create a same-named playlist between the check and the
//! create (see [`resolve::resolve_playlist`]).
//!
//! Everything here is written against the [`Library`] capability, never a
//! concrete HTTP client, so the whole pipeline runs unchanged against the
//! in-memory fake used by the integration tests.

use std::time::Duration;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use crate::{error::SyncError, info, spotify::Library, success, types::MonthKey};

pub mod append;
pub mod bucket;
pub mod fetch;
pub mod pages;
pub mod resolve;
pub mod window;

pub use fetch::Boundary;

/// The two invocation flavors, with deliberately distinct boundary
/// semantics and playlist description templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Scheduled run from the high-water mark; strictly-newer comparison
    /// so the boundary entry is never reprocessed.
    Incremental,
    /// One-time historical backfill from a fixed start date; inclusive
    /// comparison so the start instant itself is covered.
    Backlog,
}

impl SyncMode {
    pub fn boundary(&self) -> Boundary {
        match self {
            SyncMode::Incremental => Boundary::Exclusive,
            SyncMode::Backlog => Boundary::Inclusive,
        }
    }

    /// Description stamped on playlists this mode creates.
    pub fn description(&self, key: &MonthKey) -> String {
        match self {
            SyncMode::Incremental => {
                "Monthly log of liked songs created by Chronicle".to_string()
            }
            SyncMode::Backlog => format!(
                "Backlog of liked songs for {} {} created by Chronicle Backlog",
                key.month_name(),
                key.year
            ),
        }
    }
}

/// What happened to one month's bucket.
#[derive(Debug, Clone)]
pub struct MonthOutcome {
    pub key: MonthKey,
    pub playlist_name: String,
    pub playlist_created: bool,
    pub added: usize,
    /// A transient failure scoped to this month; sibling months still ran.
    pub error: Option<String>,
}

/// Summary of a whole invocation.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Liked entries inside the window, before per-month deduplication.
    pub fetched: usize,
    pub months: Vec<MonthOutcome>,
}

impl SyncReport {
    pub fn total_added(&self) -> usize {
        self.months.iter().map(|m| m.added).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.months.iter().any(|m| m.error.is_some())
    }
}

/// Runs one full synchronization: fetch the window's liked tracks, bucket
/// them by month, and bring each month's playlist up to date.
///
/// Months are processed sequentially in chronological order. A transient
/// failure in one month is recorded in its [`MonthOutcome`] and the
/// remaining months still run; an authentication-classified failure aborts
/// everything, since no further remote call can succeed. A failure while
/// fetching aborts the run with no partial processing.
pub async fn run(
    api: &(impl Library + ?Sized),
    window_start: DateTime<Utc>,
    mode: SyncMode,
) -> Result<SyncReport, SyncError> {
    let spinner = fetch_spinner();
    let entries = match fetch::fetch_liked_since(api, window_start, mode.boundary()).await {
        Ok(entries) => {
            spinner.finish_and_clear();
            entries
        }
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e);
        }
    };

    let fetched = entries.len();
    let buckets = bucket::bucket_by_month(&entries);
    info!(
        "Found {} liked track(s) across {} month(s).",
        fetched,
        buckets.len()
    );

    let mut months = Vec::new();
    for (key, candidates) in buckets {
        let playlist_name = key.playlist_name();

        let resolved = match resolve::resolve_playlist(api, key, &mode.description(&key)).await {
            Ok(resolved) => resolved,
            Err(e) if e.is_auth() => return Err(e),
            Err(e) => {
                months.push(MonthOutcome {
                    key,
                    playlist_name,
                    playlist_created: false,
                    added: 0,
                    error: Some(e.to_string()),
                });
                continue;
            }
        };

        if resolved.created {
            info!("Created new playlist: {}", playlist_name);
        }

        match append::append_missing(api, &resolved.id, &candidates).await {
            Ok(added) => {
                if added > 0 {
                    success!("Added {} track(s) to {}.", added, playlist_name);
                }
                months.push(MonthOutcome {
                    key,
                    playlist_name,
                    playlist_created: resolved.created,
                    added,
                    error: None,
                });
            }
            Err(e) if e.is_auth() => return Err(e),
            Err(e) => {
                let added = match &e {
                    SyncError::PartialAppend { appended, .. } => *appended,
                    _ => 0,
                };
                months.push(MonthOutcome {
                    key,
                    playlist_name,
                    playlist_created: resolved.created,
                    added,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    Ok(SyncReport { fetched, months })
}

fn fetch_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching liked tracks...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
