use crate::{
    error::AnalyzeError,
    spotify::SpotifyClient,
    types::{Credential, PlaylistTracksPage},
};

/// Only the fields the analysis reads; keeps pages small.
const PLAYLIST_ITEM_FIELDS: &str = "items(added_by.id,track(artists(id,name))),total";

/// Largest page the playlist items endpoint serves.
pub const MAX_PAGE_SIZE: u64 = 100;

impl SpotifyClient {
    /// Retrieves one page of a playlist's items.
    ///
    /// # Arguments
    ///
    /// * `credential` - User-scoped bearer credential
    /// * `playlist_id` - Spotify playlist id (not URI or URL)
    /// * `offset` - Index of the first item to return
    /// * `limit` - Page size, clamped to [`MAX_PAGE_SIZE`]
    ///
    /// # Returns
    ///
    /// The page with its `items` and the `total` number of items the playlist
    /// had when the page was served.
    pub async fn get_playlist_tracks(
        &self,
        credential: &Credential,
        playlist_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<PlaylistTracksPage, AnalyzeError> {
        tracing::debug!(playlist_id, offset, limit, "fetching playlist page");

        self.get_json(
            credential,
            &["playlists", playlist_id, "tracks"],
            &[
                ("offset", offset.to_string()),
                ("limit", limit.clamp(1, MAX_PAGE_SIZE).to_string()),
                ("fields", PLAYLIST_ITEM_FIELDS.to_string()),
            ],
        )
        .await
    }
}
