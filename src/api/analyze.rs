use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{HeaderMap, header::AUTHORIZATION},
};
use serde::Deserialize;

use crate::{
    analysis::{self, DEFAULT_TOP_N},
    error::AnalyzeError,
    server::AppState,
    types::{AnalysisResult, Credential},
};

/// Largest ranking a caller may ask for. Rankings never grow past the default.
pub const MAX_TOP_N: usize = DEFAULT_TOP_N;

#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    pub top: Option<usize>,
}

/// `GET /playlist/{id}/analyze`
///
/// The caller's Spotify token travels in the `Authorization: Bearer` header.
/// Without it the request is rejected with 401 before anything is sent to
/// Spotify.
///
/// `?top=` shortens the rankings; values outside `1..=10` are clamped and a
/// malformed value is answered with a 400 error envelope.
pub async fn analyze(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    params: Result<Query<AnalyzeParams>, QueryRejection>,
    headers: HeaderMap,
) -> Result<Json<AnalysisResult>, AnalyzeError> {
    let credential = bearer_credential(&headers).ok_or(AnalyzeError::AuthMissing)?;
    let Query(params) = params.map_err(|e| AnalyzeError::BadRequest(e.body_text()))?;
    let top_n = params.top.unwrap_or(DEFAULT_TOP_N).clamp(1, MAX_TOP_N);

    let result =
        analysis::analyze_top(state.catalog.as_ref(), &playlist_id, &credential, top_n).await?;
    Ok(Json(result))
}

fn bearer_credential(headers: &HeaderMap) -> Option<Credential> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(Credential::new(token))
}
