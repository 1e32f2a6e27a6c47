//! Error taxonomy of the analysis pipeline.
//!
//! Every failure that can end an analysis is an [`AnalyzeError`]. Callers of
//! the HTTP surface always receive the `{error: {status, message}}` envelope,
//! which keeps failures structurally distinct from a successful
//! `{topArtists, topGenres, topUsers}` body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

pub const AUTH_MISSING_MESSAGE: &str =
    "Not authenticated. Provide a Spotify access token as a Bearer credential.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// No credential was available; nothing was sent upstream.
    #[error("{}", AUTH_MISSING_MESSAGE)]
    AuthMissing,

    /// The catalog service answered with a structured error.
    #[error("Spotify API error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The caller's request could not be understood.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Network failure, timeout or a response of unexpected shape.
    #[error("transport error: {0}")]
    Transport(String),
}

impl AnalyzeError {
    pub fn status(&self) -> StatusCode {
        match self {
            AnalyzeError::AuthMissing => StatusCode::UNAUTHORIZED,
            AnalyzeError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AnalyzeError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AnalyzeError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to callers. Transport details stay in the operator log.
    pub fn public_message(&self) -> String {
        match self {
            AnalyzeError::AuthMissing => AUTH_MISSING_MESSAGE.to_string(),
            AnalyzeError::Upstream { message, .. } => message.clone(),
            AnalyzeError::BadRequest(message) => message.clone(),
            AnalyzeError::Transport(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AnalyzeError::Upstream { status: 429, .. })
    }
}

impl From<reqwest::Error> for AnalyzeError {
    fn from(err: reqwest::Error) -> Self {
        AnalyzeError::Transport(err.to_string())
    }
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        if let AnalyzeError::Transport(ref cause) = self {
            tracing::error!(error = %cause, "analysis failed");
        }

        let status = self.status();
        let body = Json(json!({
            "error": {
                "status": status.as_u16(),
                "message": self.public_message(),
            }
        }));

        (status, body).into_response()
    }
}

/// Raised when a required configuration value is missing.
#[derive(Debug, Error)]
#[error("missing configuration: {0} must be set")]
pub struct ConfigError(pub &'static str);
