//! # API Module
//!
//! HTTP endpoints served by `plstats`.
//!
//! - [`analyze`] - `GET /playlist/{id}/analyze`, the playlist analysis. Answers
//!   `{topArtists, topGenres, topUsers}` on success and
//!   `{error: {status, message}}` otherwise.
//! - [`health`] - `GET /health`, status and version for monitoring.
//! - [`callback`] - `GET /callback`, the redirect target of the PKCE login
//!   started by `plstats auth`. Only mounted on the temporary login server.

mod analyze;
mod callback;
mod health;

pub use analyze::{AnalyzeParams, MAX_TOP_N, analyze};
pub use callback::callback;
pub use health::health;
