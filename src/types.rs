use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Placeholder contributor for playlist entries without an `added_by` user.
pub const UNKNOWN_USER: &str = "unknown";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// Payload of the token endpoint for the client-credentials grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppTokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: u64,
}

/// Opaque bearer credential for user-scoped catalog requests.
///
/// The token never shows up in `Debug` output so that it can be logged
/// alongside requests without leaking.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksPage {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub added_by: Option<AddedBy>,
    pub track: Option<PlaylistTrack>,
}

impl PlaylistItem {
    /// Id of the contributing user, or [`UNKNOWN_USER`] when absent.
    pub fn contributor(&self) -> &str {
        self.added_by
            .as_ref()
            .and_then(|a| a.id.as_deref())
            .filter(|id| !id.is_empty())
            .unwrap_or(UNKNOWN_USER)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddedBy {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrack {
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeveralArtistsResponse {
    pub artists: Vec<Option<Artist>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
}

/// Error body the Web API sends with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountEntry<K> {
    pub key: K,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCount {
    pub name: String,
    pub count: u64,
}

impl From<CountEntry<String>> for NamedCount {
    fn from(entry: CountEntry<String>) -> Self {
        Self {
            name: entry.key,
            count: entry.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub display_name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub top_artists: Vec<NamedCount>,
    pub top_genres: Vec<NamedCount>,
    pub top_users: Vec<UserSummary>,
}

#[derive(Tabled)]
pub struct CountTableRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    pub name: String,
    pub count: u64,
}

#[derive(Tabled)]
pub struct UserTableRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    pub name: String,
    pub id: String,
    pub tracks: u64,
}
