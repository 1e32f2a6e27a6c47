use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    error::AnalyzeError,
    management::CredentialProvider,
    spotify,
    types::{Credential, Token},
};

/// Seconds before expiry at which a user token is refreshed.
const REFRESH_MARGIN_SECS: u64 = 240;

/// Persisted user token obtained through `plstats auth`.
pub struct TokenManager {
    token: Mutex<Token>,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager {
            token: Mutex::new(token),
        }
    }

    pub async fn load() -> Result<Self, String> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self::new(token))
    }

    pub async fn persist(&self) -> Result<(), String> {
        let token = self.token.lock().await.clone();
        Self::write(&token).await
    }

    async fn write(token: &Token) -> Result<(), String> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(token).map_err(|e| e.to_string())?;
        async_fs::write(&path, json)
            .await
            .map_err(|e| e.to_string())
    }

    /// Returns an access token, refreshing and persisting it first when it is
    /// about to expire.
    pub async fn get_valid_token(&self) -> Result<String, String> {
        let mut token = self.token.lock().await;
        if is_expired(&token, Utc::now().timestamp() as u64) {
            if token.refresh_token.is_empty() {
                return Err("Stored token expired. Please run plstats auth".to_string());
            }
            let refreshed = spotify::auth::refresh_token(&token.refresh_token).await?;
            *token = refreshed;
            if let Err(e) = Self::write(&token).await {
                tracing::warn!(error = %e, "failed to persist refreshed token");
            }
        }

        Ok(token.access_token.clone())
    }

    fn token_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("plstats/cache/token.json");
        path
    }
}

fn is_expired(token: &Token, now: u64) -> bool {
    now + REFRESH_MARGIN_SECS >= token.obtained_at + token.expires_in
}

#[async_trait]
impl CredentialProvider for TokenManager {
    async fn bearer(&self) -> Result<Credential, AnalyzeError> {
        match self.get_valid_token().await {
            Ok(token) if !token.is_empty() => Ok(Credential::new(token)),
            Ok(_) => Err(AnalyzeError::AuthMissing),
            Err(e) => {
                tracing::warn!(error = %e, "no usable user token");
                Err(AnalyzeError::AuthMissing)
            }
        }
    }
}
