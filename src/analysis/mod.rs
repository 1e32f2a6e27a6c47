//! # Playlist Analysis
//!
//! The aggregation pipeline behind `GET /playlist/{id}/analyze` and
//! `plstats analyze`. Four stages run strictly forward:
//!
//! ```text
//! fetch_all_tracks ──► collect_artists ──► fetch_genres ──┐
//!        │                                                ├──► top_counts ──► AnalysisResult
//!        └──────────► contributors ───────────────────────┘         │
//!                                                                   └──► resolve_users
//! ```
//!
//! Track pages and artist batches are awaited one after another and any
//! failure there aborts the analysis, since partial data would skew every
//! count. Display-name lookups for the top contributors run concurrently and
//! never fail the analysis.
//!
//! ## Weighting
//!
//! Artist names are counted once per track credit. Genres are counted once
//! per distinct artist referenced by the playlist, not per track. Artists are
//! ranked by literal name, so two different artists sharing a name are
//! counted together.

mod enrich;
mod rank;
mod resolve;
mod tracks;

pub use enrich::{ArtistRefs, collect_artists, fetch_genres};
pub use rank::{DEFAULT_TOP_N, count_occurrences, top_counts};
pub use resolve::{Resolution, resolve_user, resolve_users};
pub use tracks::fetch_all_tracks;

use crate::{
    error::AnalyzeError,
    spotify::Catalog,
    types::{AnalysisResult, CountEntry, Credential, NamedCount},
};

/// Analyzes a playlist with the default ranking size of ten.
pub async fn analyze(
    catalog: &dyn Catalog,
    playlist_id: &str,
    credential: &Credential,
) -> Result<AnalysisResult, AnalyzeError> {
    analyze_top(catalog, playlist_id, credential, DEFAULT_TOP_N).await
}

/// Analyzes a playlist, keeping the `top_n` highest entries of each ranking.
///
/// `top_n` is capped at [`DEFAULT_TOP_N`].
pub async fn analyze_top(
    catalog: &dyn Catalog,
    playlist_id: &str,
    credential: &Credential,
    top_n: usize,
) -> Result<AnalysisResult, AnalyzeError> {
    let top_n = top_n.min(DEFAULT_TOP_N);
    let items = fetch_all_tracks(catalog, credential, playlist_id).await?;

    let contributors: Vec<String> = items
        .iter()
        .map(|item| item.contributor().to_string())
        .collect();
    let artists = collect_artists(&items);
    let genres = fetch_genres(catalog, credential, &artists.ids).await?;

    let top_artists = named(top_counts(artists.names, top_n));
    let top_genres = named(top_counts(genres, top_n));
    let top_users = resolve_users(catalog, credential, top_counts(contributors, top_n)).await;

    tracing::info!(
        playlist_id,
        items = items.len(),
        distinct_artists = artists.ids.len(),
        "playlist analyzed"
    );

    Ok(AnalysisResult {
        top_artists,
        top_genres,
        top_users,
    })
}

fn named(entries: Vec<CountEntry<String>>) -> Vec<NamedCount> {
    entries.into_iter().map(NamedCount::from).collect()
}
