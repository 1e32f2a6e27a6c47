//! # Spotify Integration Module
//!
//! This module is the integration layer between the analyzer and the Spotify Web
//! API. It owns all HTTP communication with the catalog service, decodes its
//! error envelope and applies the limits configured for outbound calls.
//!
//! ## Architecture
//!
//! ```text
//! Analysis pipeline (analysis::analyze)
//!          ↓
//!     Catalog trait
//!          ↓
//! SpotifyClient
//!     ├── Playlists (paged track listing)
//!     ├── Artists   (batched artist metadata)
//!     ├── Users     (public profiles)
//!     └── Auth      (PKCE login, refresh, client credentials)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! The pipeline only ever talks to the [`Catalog`] trait, so the whole
//! aggregation can run against an in-memory catalog in tests.
//!
//! ## Error Handling
//!
//! - Non-2xx responses carrying Spotify's `{error: {status, message}}` body
//!   become [`AnalyzeError::Upstream`] with status and message unchanged.
//! - Network errors, timeouts and bodies of unexpected shape become
//!   [`AnalyzeError::Transport`].
//! - `429 Too Many Requests` is retried a bounded number of times, honoring
//!   the `Retry-After` header. No other status is retried.
//!
//! ## API Coverage
//!
//! - `GET /playlists/{id}/tracks` - Playlist items, paginated by offset
//! - `GET /artists?ids=` - Up to 50 artists per call
//! - `GET /users/{id}` - Public profile of a user
//! - `POST /api/token` - Code exchange, refresh and client-credentials grants

pub mod artists;
pub mod auth;
pub mod playlists;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url, header::HeaderMap};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    config,
    error::AnalyzeError,
    types::{ApiErrorEnvelope, Artist, Credential, PlaylistTracksPage, UserProfile},
};

/// Upper bound for a `Retry-After` we are willing to sleep through.
const MAX_RETRY_AFTER_SECS: u64 = 120;
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Read-only view of the catalog service used by the analysis pipeline.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// One page of a playlist's items starting at `offset`.
    async fn playlist_tracks(
        &self,
        credential: &Credential,
        playlist_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<PlaylistTracksPage, AnalyzeError>;

    /// Artist records for at most 50 ids. Unknown ids are left out.
    async fn several_artists(
        &self,
        credential: &Credential,
        ids: &[String],
    ) -> Result<Vec<Artist>, AnalyzeError>;

    /// Public profile of one user. Used to turn contributor ids into
    /// display names.
    async fn user_profile(
        &self,
        credential: &Credential,
        user_id: &str,
    ) -> Result<UserProfile, AnalyzeError>;
}

/// Spotify Web API client.
///
/// Holds one `reqwest::Client` so connections are pooled across every
/// request of every analysis. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    base_url: Url,
    rate_limit_retries: u32,
}

impl SpotifyClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        rate_limit_retries: u32,
    ) -> Result<Self, AnalyzeError> {
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            AnalyzeError::Transport(format!("invalid API base url {base_url}: {e}"))
        })?;
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            rate_limit_retries,
        })
    }

    /// Builds a client from `SPOTIFY_API_URL`, `REQUEST_TIMEOUT_SECS` and
    /// `RATE_LIMIT_RETRIES`.
    pub fn from_env() -> Result<Self, AnalyzeError> {
        Self::new(
            &config::spotify_apiurl(),
            config::request_timeout(),
            config::rate_limit_retries(),
        )
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, AnalyzeError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AnalyzeError::Transport(format!("cannot-be-a-base url {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issues an authorized GET and decodes a JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, AnalyzeError> {
        let url = self.endpoint(segments)?;
        let mut attempt = 0;

        loop {
            let response = self
                .http
                .get(url.clone())
                .query(query)
                .bearer_auth(credential.as_str())
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                return response.json::<T>().await.map_err(|e| {
                    AnalyzeError::Transport(format!("unexpected response from {url}: {e}"))
                });
            }

            if status == StatusCode::TOO_MANY_REQUESTS && attempt < self.rate_limit_retries {
                if let Some(wait) = retry_after(response.headers()) {
                    attempt += 1;
                    tracing::warn!(
                        url = %url,
                        attempt,
                        wait_secs = wait.as_secs(),
                        "rate limited by Spotify, retrying"
                    );
                    sleep(wait).await;
                    continue;
                }
            }

            return Err(upstream_error(status, response).await);
        }
    }
}

/// Wait time requested by a 429 response, `None` when it is unreasonably long.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let secs = headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

    if secs > MAX_RETRY_AFTER_SECS {
        tracing::warn!(
            retry_after = secs,
            "Retry-After is abnormally high, giving up on this request"
        );
        return None;
    }
    Some(Duration::from_secs(secs))
}

async fn upstream_error(status: StatusCode, response: reqwest::Response) -> AnalyzeError {
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiErrorEnvelope>(&body) {
        Ok(envelope) => AnalyzeError::Upstream {
            status: envelope.error.status,
            message: envelope.error.message,
        },
        Err(_) => AnalyzeError::Transport(format!("HTTP {status} with unexpected body: {body}")),
    }
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn playlist_tracks(
        &self,
        credential: &Credential,
        playlist_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<PlaylistTracksPage, AnalyzeError> {
        self.get_playlist_tracks(credential, playlist_id, offset, limit)
            .await
    }

    async fn several_artists(
        &self,
        credential: &Credential,
        ids: &[String],
    ) -> Result<Vec<Artist>, AnalyzeError> {
        self.get_several_artists(credential, ids).await
    }

    async fn user_profile(
        &self,
        credential: &Credential,
        user_id: &str,
    ) -> Result<UserProfile, AnalyzeError> {
        self.get_user(credential, user_id).await
    }
}
