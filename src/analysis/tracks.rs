use crate::{
    error::AnalyzeError,
    spotify::{Catalog, playlists::MAX_PAGE_SIZE},
    types::{Credential, PlaylistItem},
};

/// Fetches every item of a playlist, page by page.
///
/// The first page is always requested. Its `total` (missing means 0) fixes
/// how many items are expected; later pages are requested at increasing
/// offsets until that many items have been collected. A page that comes back
/// empty before the total is reached ends the loop, since asking again at the
/// same offset would never make progress.
///
/// Any failing page aborts the whole fetch.
pub async fn fetch_all_tracks(
    catalog: &dyn Catalog,
    credential: &Credential,
    playlist_id: &str,
) -> Result<Vec<PlaylistItem>, AnalyzeError> {
    let first = catalog
        .playlist_tracks(credential, playlist_id, 0, MAX_PAGE_SIZE)
        .await?;

    let total = first.total.unwrap_or(0);
    let mut items = first.items;
    let mut offset = items.len() as u64;

    while offset < total {
        let page = catalog
            .playlist_tracks(credential, playlist_id, offset, MAX_PAGE_SIZE)
            .await?;

        if page.items.is_empty() {
            tracing::warn!(
                playlist_id,
                offset,
                total,
                "playlist page came back empty before reaching the reported total"
            );
            break;
        }

        offset += page.items.len() as u64;
        items.extend(page.items);
    }

    tracing::debug!(playlist_id, count = items.len(), total, "fetched playlist items");
    Ok(items)
}
