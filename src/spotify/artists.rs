use crate::{
    error::AnalyzeError,
    spotify::SpotifyClient,
    types::{Artist, Credential, SeveralArtistsResponse},
};

/// Most ids the several-artists endpoint accepts per call.
pub const MAX_ARTIST_IDS: usize = 50;

impl SpotifyClient {
    /// Retrieves artist records for up to [`MAX_ARTIST_IDS`] ids in one call.
    ///
    /// Spotify answers with `null` for ids it does not know; those entries are
    /// dropped, so the result can be shorter than `ids`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::Transport`] without calling out when more than
    /// [`MAX_ARTIST_IDS`] ids are passed.
    pub async fn get_several_artists(
        &self,
        credential: &Credential,
        ids: &[String],
    ) -> Result<Vec<Artist>, AnalyzeError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        if ids.len() > MAX_ARTIST_IDS {
            return Err(AnalyzeError::Transport(format!(
                "{} artist ids requested, at most {} allowed per call",
                ids.len(),
                MAX_ARTIST_IDS
            )));
        }

        tracing::debug!(count = ids.len(), "fetching artist batch");

        let response: SeveralArtistsResponse = self
            .get_json(credential, &["artists"], &[("ids", ids.join(","))])
            .await?;

        Ok(response.artists.into_iter().flatten().collect())
    }
}
