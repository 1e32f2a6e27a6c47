mod app_token;
mod auth;

pub use app_token::{AppTokenCache, ClientCredentials, Clock, SystemClock, TokenSource};
pub use auth::TokenManager;

use async_trait::async_trait;

use crate::{error::AnalyzeError, types::Credential};

/// Supplies the bearer credential an analysis runs with.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn bearer(&self) -> Result<Credential, AnalyzeError>;
}
