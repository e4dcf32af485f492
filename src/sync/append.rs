use std::collections::HashSet;

use crate::{error::SyncError, spotify::Library, sync::pages};

/// Page size for reading existing playlist membership.
pub const MEMBERSHIP_PAGE_SIZE: u32 = 100;

/// Hard per-request cap of the remote append endpoint.
pub const APPEND_BATCH_SIZE: usize = 100;

/// Appends the candidates not already present in the playlist, in
/// candidate order, and returns how many were appended.
///
/// Membership is re-read from the remote every call, so retrying after any
/// failure is idempotent: tracks committed by earlier batches are skipped
/// on the next run. An empty difference issues zero remote mutations.
///
/// There is no multi-batch transaction on the remote side. If a batch
/// fails partway through, earlier batches stay committed and the error
/// reports how many tracks made it ([`SyncError::PartialAppend`]).
pub async fn append_missing(
    api: &(impl Library + ?Sized),
    playlist_id: &str,
    candidates: &[String],
) -> Result<usize, SyncError> {
    let membership: HashSet<String> = pages::collect_pages(MEMBERSHIP_PAGE_SIZE, |offset| {
        api.list_playlist_tracks(playlist_id, MEMBERSHIP_PAGE_SIZE, offset)
    })
    .await?
    .into_iter()
    .collect();

    let to_add: Vec<String> = candidates
        .iter()
        .filter(|uri| !membership.contains(*uri))
        .cloned()
        .collect();

    if to_add.is_empty() {
        return Ok(0);
    }

    let mut appended = 0;
    for batch in to_add.chunks(APPEND_BATCH_SIZE) {
        if let Err(e) = api.append_tracks(playlist_id, batch).await {
            return Err(SyncError::PartialAppend {
                appended,
                source: Box::new(e),
            });
        }
        appended += batch.len();
    }

    Ok(appended)
}
