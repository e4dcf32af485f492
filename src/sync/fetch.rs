use chrono::{DateTime, Utc};

use crate::{
    error::SyncError,
    spotify::Library,
    sync::pages,
    types::LikedEntry,
};

/// Page size for the liked-tracks listing.
pub const LIKED_PAGE_SIZE: u32 = 50;

/// How a like timestamp is compared against the window start.
///
/// Two deliberately distinct modes rather than one ambiguous comparison:
/// a historical backfill processes a fixed start date forward once and
/// includes the boundary instant; incremental runs exclude it so a track
/// liked exactly at the prior boundary is not reprocessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// `added_at >= start` - backfill semantics.
    Inclusive,
    /// `added_at > start` - incremental semantics.
    Exclusive,
}

impl Boundary {
    pub fn admits(&self, added_at: DateTime<Utc>, start: DateTime<Utc>) -> bool {
        match self {
            Boundary::Inclusive => added_at >= start,
            Boundary::Exclusive => added_at > start,
        }
    }
}

/// Fetches every liked track whose timestamp satisfies the boundary
/// comparison against `start`.
///
/// Pages the listing to exhaustion rather than stopping at the first page
/// whose oldest entry predates the window: the newest-first ordering is not
/// contractually stable, and an extra page request is cheaper than a missed
/// like. Any single page failure aborts the whole fetch; no partial result
/// is used.
pub async fn fetch_liked_since(
    api: &(impl Library + ?Sized),
    start: DateTime<Utc>,
    boundary: Boundary,
) -> Result<Vec<LikedEntry>, SyncError> {
    let items = pages::collect_pages(LIKED_PAGE_SIZE, |offset| {
        api.list_liked(LIKED_PAGE_SIZE, offset)
    })
    .await?;

    Ok(items
        .into_iter()
        .filter(|item| boundary.admits(item.added_at, start))
        .map(|item| LikedEntry {
            uri: item.track.uri,
            added_at: item.added_at,
        })
        .collect())
}
