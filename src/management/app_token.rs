use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Client;

use crate::{
    config,
    error::{AnalyzeError, ConfigError},
    management::CredentialProvider,
    spotify,
    types::{AppTokenResponse, Credential},
};

/// Safety margin subtracted from the lifetime the token endpoint reports.
const EXPIRY_MARGIN_SECS: i64 = 5;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Issues fresh app-level tokens.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch(&self) -> Result<AppTokenResponse, AnalyzeError>;
}

/// Client-credentials grant against the Spotify accounts service.
pub struct ClientCredentials {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    pub fn new(
        http: Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn from_env(http: Client) -> Result<Self, ConfigError> {
        Ok(Self::new(
            http,
            config::spotify_apitoken_url(),
            config::spotify_client_id()?,
            config::spotify_client_secret()?,
        ))
    }
}

#[async_trait]
impl TokenSource for ClientCredentials {
    async fn fetch(&self) -> Result<AppTokenResponse, AnalyzeError> {
        spotify::auth::request_app_token(
            &self.http,
            &self.token_url,
            &self.client_id,
            &self.client_secret,
        )
        .await
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// App-level access token cached until shortly before it expires.
///
/// The lock only guards reads and writes of the cached value and is never
/// held across the token request, so two callers racing on an expired token
/// may both fetch one. The last one written wins.
pub struct AppTokenCache<S, C = SystemClock> {
    source: S,
    clock: C,
    cached: Mutex<Option<CachedToken>>,
}

impl<S: TokenSource, C: Clock> AppTokenCache<S, C> {
    pub fn new(source: S, clock: C) -> Self {
        Self {
            source,
            clock,
            cached: Mutex::new(None),
        }
    }

    pub async fn get_valid_token(&self) -> Result<String, AnalyzeError> {
        if let Some(token) = self.current() {
            return Ok(token);
        }

        let requested_at = self.clock.now();
        let issued = self.source.fetch().await?;
        let lifetime = TimeDelta::seconds(issued.expires_in as i64 - EXPIRY_MARGIN_SECS);

        tracing::debug!(expires_in = issued.expires_in, "app token refreshed");

        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        *cached = Some(CachedToken {
            access_token: issued.access_token.clone(),
            expires_at: requested_at + lifetime,
        });
        Ok(issued.access_token)
    }

    fn current(&self) -> Option<String> {
        let now = self.clock.now();
        let cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        cached
            .as_ref()
            .filter(|t| now < t.expires_at)
            .map(|t| t.access_token.clone())
    }
}

#[async_trait]
impl<S: TokenSource, C: Clock> CredentialProvider for AppTokenCache<S, C> {
    async fn bearer(&self) -> Result<Credential, AnalyzeError> {
        self.get_valid_token().await.map(Credential::new)
    }
}
