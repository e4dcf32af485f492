use crate::{error::SyncError, spotify::Library, sync::pages, types::MonthKey};

/// Page size for the owned-playlists listing.
pub const PLAYLIST_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone)]
pub struct ResolvedPlaylist {
    pub id: String,
    /// Whether this resolution created the playlist (vs reusing one).
    pub created: bool,
}

/// Maps a month to its Chronicle playlist, creating it if absent.
///
/// Pages the current user's playlists comparing names exactly and stops at
/// the first match. Only when the listing is exhausted without a match is a
/// non-public playlist created with the given description.
///
/// Check-then-create is racy under concurrent invocation: two resolutions
/// for the same month can both miss and both create. Invocations are
/// strictly sequential (one process, months processed in order), which is
/// the only configuration this function is safe in.
pub async fn resolve_playlist(
    api: &(impl Library + ?Sized),
    key: MonthKey,
    description: &str,
) -> Result<ResolvedPlaylist, SyncError> {
    let name = key.playlist_name();

    let existing = pages::search_pages(
        PLAYLIST_PAGE_SIZE,
        |offset| api.list_owned_playlists(PLAYLIST_PAGE_SIZE, offset),
        |playlist| playlist.name == name,
    )
    .await?;

    if let Some(playlist) = existing {
        return Ok(ResolvedPlaylist {
            id: playlist.id,
            created: false,
        });
    }

    let id = api.create_playlist(&name, false, description).await?;
    Ok(ResolvedPlaylist { id, created: true })
}
