use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use reqwest::Url;
use sha2::{Digest, Sha256};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Extracts a playlist id from the forms users tend to paste.
///
/// Accepts a bare id, a `spotify:playlist:<id>` URI or an
/// `https://open.spotify.com/playlist/<id>` share link (query string and
/// locale prefixes such as `/intl-de/` are ignored).
pub fn parse_playlist_ref(input: &str) -> Result<String, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Playlist reference is empty".to_string());
    }

    let id = if let Some(rest) = input.strip_prefix("spotify:playlist:") {
        rest.to_string()
    } else if input.starts_with("http://") || input.starts_with("https://") {
        let url = Url::parse(input).map_err(|e| format!("Invalid playlist URL: {}", e))?;
        let mut segments = url
            .path_segments()
            .ok_or_else(|| format!("Invalid playlist URL: {}", input))?;
        segments
            .by_ref()
            .find(|s| *s == "playlist")
            .ok_or_else(|| format!("Not a playlist URL: {}", input))?;
        segments.next().unwrap_or_default().to_string()
    } else {
        input.to_string()
    };

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!("Invalid playlist id: {:?}", id));
    }
    Ok(id)
}
