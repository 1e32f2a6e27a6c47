#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use plstats::{
    error::AnalyzeError,
    spotify::Catalog,
    types::{
        AddedBy, Artist, Credential, PlaylistItem, PlaylistTrack, PlaylistTracksPage, TrackArtist,
        UserProfile,
    },
};
use tokio::sync::Barrier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Tracks { offset: u64, limit: u64 },
    Artists(Vec<String>),
    User(String),
}

/// In-memory catalog that serves a fixed playlist and records every call.
#[derive(Default)]
pub struct FakeCatalog {
    pub items: Vec<PlaylistItem>,
    pub total: Option<u64>,
    pub artists: HashMap<String, Artist>,
    pub users: HashMap<String, String>,
    pub failing_users: HashSet<String>,
    pub tracks_error: Option<(u64, u16, String)>,
    pub artists_error: Option<(u16, String)>,
    pub transport_error: bool,
    pub user_barrier: Option<Arc<Barrier>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeCatalog {
    pub fn with_items(items: Vec<PlaylistItem>) -> Self {
        Self {
            total: Some(items.len() as u64),
            items,
            ..Default::default()
        }
    }

    pub fn artist(mut self, id: &str, name: &str, genres: &[&str]) -> Self {
        self.artists.insert(
            id.to_string(),
            Artist {
                id: id.to_string(),
                name: name.to_string(),
                genres: genres.iter().map(|g| g.to_string()).collect(),
            },
        );
        self
    }

    pub fn user(mut self, id: &str, display_name: &str) -> Self {
        self.users.insert(id.to_string(), display_name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn track_offsets(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Tracks { offset, .. } => Some(offset),
                _ => None,
            })
            .collect()
    }

    pub fn artist_batches(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Artists(ids) => Some(ids),
                _ => None,
            })
            .collect()
    }

    pub fn user_lookups(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::User(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn playlist_tracks(
        &self,
        _credential: &Credential,
        _playlist_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<PlaylistTracksPage, AnalyzeError> {
        self.record(Call::Tracks { offset, limit });

        if self.transport_error {
            return Err(AnalyzeError::Transport("connection reset".to_string()));
        }
        if let Some((at, status, message)) = &self.tracks_error {
            if *at == offset {
                return Err(AnalyzeError::Upstream {
                    status: *status,
                    message: message.clone(),
                });
            }
        }

        let start = (offset as usize).min(self.items.len());
        let end = (start + limit as usize).min(self.items.len());
        Ok(PlaylistTracksPage {
            items: self.items[start..end].to_vec(),
            total: self.total,
        })
    }

    async fn several_artists(
        &self,
        _credential: &Credential,
        ids: &[String],
    ) -> Result<Vec<Artist>, AnalyzeError> {
        self.record(Call::Artists(ids.to_vec()));

        if let Some((status, message)) = &self.artists_error {
            return Err(AnalyzeError::Upstream {
                status: *status,
                message: message.clone(),
            });
        }

        Ok(ids
            .iter()
            .filter_map(|id| self.artists.get(id).cloned())
            .collect())
    }

    async fn user_profile(
        &self,
        _credential: &Credential,
        user_id: &str,
    ) -> Result<UserProfile, AnalyzeError> {
        self.record(Call::User(user_id.to_string()));

        if let Some(barrier) = &self.user_barrier {
            barrier.wait().await;
        }

        if self.failing_users.contains(user_id) {
            return Err(AnalyzeError::Upstream {
                status: 404,
                message: "No such user".to_string(),
            });
        }

        Ok(UserProfile {
            id: user_id.to_string(),
            display_name: self.users.get(user_id).cloned(),
        })
    }
}

pub fn credential() -> Credential {
    Credential::new("test-token")
}

/// Playlist entry added by `user` crediting `artists` as `(id, name)` pairs.
pub fn item(user: Option<&str>, artists: &[(&str, &str)]) -> PlaylistItem {
    PlaylistItem {
        added_by: user.map(|id| AddedBy {
            id: Some(id.to_string()),
        }),
        track: Some(PlaylistTrack {
            artists: artists
                .iter()
                .map(|(id, name)| TrackArtist {
                    id: Some(id.to_string()),
                    name: name.to_string(),
                })
                .collect(),
        }),
    }
}
