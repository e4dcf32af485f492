use std::future::Future;

use crate::{error::SyncError, types::Page};

/// Collects every item of a paginated listing.
///
/// `fetch` produces the page at a given offset; this helper owns the offset
/// arithmetic and the exhaustion check so callers never hand-roll either.
/// An empty page ends the walk even if the remote claims more, as a guard
/// against a listing that never terminates.
pub async fn collect_pages<T, F, Fut>(page_size: u32, mut fetch: F) -> Result<Vec<T>, SyncError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, SyncError>>,
{
    let mut all = Vec::new();
    let mut offset = 0;

    loop {
        let page = fetch(offset).await?;
        let exhausted = !page.has_next || page.items.is_empty();
        all.extend(page.items);
        if exhausted {
            return Ok(all);
        }
        offset += page_size;
    }
}

/// Walks a paginated listing until `matches` accepts an item, returning it
/// without fetching further pages. `None` means the listing was exhausted
/// with no match.
pub async fn search_pages<T, F, Fut, P>(
    page_size: u32,
    mut fetch: F,
    mut matches: P,
) -> Result<Option<T>, SyncError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, SyncError>>,
    P: FnMut(&T) -> bool,
{
    let mut offset = 0;

    loop {
        let page = fetch(offset).await?;
        let exhausted = !page.has_next || page.items.is_empty();
        if let Some(found) = page.items.into_iter().find(&mut matches) {
            return Ok(Some(found));
        }
        if exhausted {
            return Ok(None);
        }
        offset += page_size;
    }
}
