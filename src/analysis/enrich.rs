use std::collections::HashSet;

use crate::{
    error::AnalyzeError,
    spotify::{Catalog, artists::MAX_ARTIST_IDS},
    types::{Credential, PlaylistItem},
};

/// Artist references gathered from a playlist in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistRefs {
    /// One name per track credit, duplicates kept, in encounter order.
    pub names: Vec<String>,
    /// Every distinct artist id, in encounter order.
    pub ids: Vec<String>,
}

/// Walks every item's artist credits once.
///
/// Names are counted per credit, so an artist on five tracks contributes five
/// names. Ids are deduplicated. Items without a track and artists without an
/// id (local files) still contribute what they have.
pub fn collect_artists(items: &[PlaylistItem]) -> ArtistRefs {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut refs = ArtistRefs::default();

    for artist in items
        .iter()
        .filter_map(|item| item.track.as_ref())
        .flat_map(|track| track.artists.iter())
    {
        refs.names.push(artist.name.clone());
        if let Some(id) = artist.id.as_deref().filter(|id| !id.is_empty()) {
            if seen.insert(id) {
                refs.ids.push(id.to_string());
            }
        }
    }

    refs
}

/// Looks up artist records in batches of at most 50 ids and flattens their genres.
///
/// Each distinct artist adds its genre tags once, however many tracks credit
/// it. Batches run one after another; the first failing batch aborts.
pub async fn fetch_genres(
    catalog: &dyn Catalog,
    credential: &Credential,
    artist_ids: &[String],
) -> Result<Vec<String>, AnalyzeError> {
    let mut genres = Vec::new();

    for batch in artist_ids.chunks(MAX_ARTIST_IDS) {
        let artists = catalog.several_artists(credential, batch).await?;
        genres.extend(artists.into_iter().flat_map(|a| a.genres));
    }

    Ok(genres)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlaylistTrack, TrackArtist};

    fn item(artists: &[(Option<&str>, &str)]) -> PlaylistItem {
        PlaylistItem {
            added_by: None,
            track: Some(PlaylistTrack {
                artists: artists
                    .iter()
                    .map(|(id, name)| TrackArtist {
                        id: id.map(str::to_string),
                        name: name.to_string(),
                    })
                    .collect(),
            }),
        }
    }

    #[test]
    fn names_are_per_credit_and_ids_are_unique() {
        let items = vec![
            item(&[(Some("A1"), "One"), (Some("A2"), "Two")]),
            item(&[(Some("A1"), "One")]),
        ];

        let refs = collect_artists(&items);

        assert_eq!(refs.names, vec!["One", "Two", "One"]);
        assert_eq!(refs.ids, vec!["A1", "A2"]);
    }

    #[test]
    fn same_name_with_different_ids_is_not_merged_by_id() {
        let items = vec![item(&[(Some("A1"), "Twin")]), item(&[(Some("A2"), "Twin")])];

        let refs = collect_artists(&items);

        assert_eq!(refs.names, vec!["Twin", "Twin"]);
        assert_eq!(refs.ids, vec!["A1", "A2"]);
    }

    #[test]
    fn missing_tracks_and_ids_are_tolerated() {
        let items = vec![
            PlaylistItem {
                added_by: None,
                track: None,
            },
            item(&[(None, "Local Artist")]),
        ];

        let refs = collect_artists(&items);

        assert_eq!(refs.names, vec!["Local Artist"]);
        assert!(refs.ids.is_empty());
    }
}
