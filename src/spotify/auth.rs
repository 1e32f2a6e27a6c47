use std::{sync::Arc, time::Duration};

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::{sync::Mutex, time::Instant};

use crate::{
    config,
    error::AnalyzeError,
    server::start_callback_server,
    types::{AppTokenResponse, PkceToken, Token},
    utils, warning,
};

const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Token endpoint payload shared by the code-exchange and refresh grants.
#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
    refresh_token: Option<String>,
    scope: Option<String>,
    expires_in: Option<u64>,
}

/// OAuth error body of the accounts service.
#[derive(Debug, Deserialize)]
struct OAuthError {
    error: String,
    error_description: Option<String>,
}

/// Runs the authorization-code flow with PKCE and returns the issued token.
///
/// Starts the local callback server, opens the consent page in the default
/// browser and waits for the callback handler to complete the code exchange.
///
/// # Errors
///
/// Fails when the client id is not configured, the authorize URL cannot be
/// built, or no token arrives within two minutes.
pub async fn authorize(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Result<Token, String> {
    let client_id = config::spotify_client_id().map_err(|e| e.to_string())?;

    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let auth_url = Url::parse_with_params(
        &config::spotify_apiauth_url(),
        &[
            ("client_id", client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config::spotify_redirect_uri().as_str()),
            ("code_challenge", code_challenge.as_str()),
            ("code_challenge_method", "S256"),
            ("scope", config::spotify_scope().as_str()),
        ],
    )
    .map_err(|e| format!("Invalid authorization URL: {}", e))?;

    // verifier must be in place before the callback can possibly arrive
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    let server_state = Arc::clone(&shared_state);
    let server = tokio::spawn(async move {
        if let Err(e) = start_callback_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state).await;
    server.abort();

    token.ok_or_else(|| "Authentication failed or timed out.".to_string())
}

async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    let start = Instant::now();

    while start.elapsed() < LOGIN_TIMEOUT {
        {
            let lock = shared_state.lock().await;
            if let Some(token) = lock.as_ref().and_then(|p| p.token.clone()) {
                return Some(token);
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges an authorization code and its PKCE verifier for a user token.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Result<Token, String> {
    let client_id = config::spotify_client_id().map_err(|e| e.to_string())?;
    let redirect_uri = config::spotify_redirect_uri();

    let grant = post_token_form(
        &Client::new(),
        &config::spotify_apitoken_url(),
        &[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ],
        None,
    )
    .await
    .map_err(|e| e.to_string())?;

    Ok(into_token(grant, None))
}

/// Trades a refresh token for a fresh access token.
///
/// Spotify may omit a new refresh token; the previous one is kept then.
pub async fn refresh_token(refresh_token: &str) -> Result<Token, String> {
    let client_id = config::spotify_client_id().map_err(|e| e.to_string())?;

    let grant = post_token_form(
        &Client::new(),
        &config::spotify_apitoken_url(),
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id.as_str()),
        ],
        None,
    )
    .await
    .map_err(|e| e.to_string())?;

    Ok(into_token(grant, Some(refresh_token)))
}

/// Requests an app-level token with the client-credentials grant.
pub async fn request_app_token(
    http: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<AppTokenResponse, AnalyzeError> {
    let basic = STANDARD.encode(format!("{}:{}", client_id, client_secret));
    post_token_form(
        http,
        token_url,
        &[("grant_type", "client_credentials")],
        Some(&format!("Basic {}", basic)),
    )
    .await
}

async fn post_token_form<T: serde::de::DeserializeOwned>(
    http: &Client,
    token_url: &str,
    form: &[(&str, &str)],
    authorization: Option<&str>,
) -> Result<T, AnalyzeError> {
    let mut request = http.post(token_url).form(form);
    if let Some(value) = authorization {
        request = request.header(reqwest::header::AUTHORIZATION, value);
    }

    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| AnalyzeError::Transport(format!("unexpected token response: {}", e)));
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<OAuthError>(&body) {
        Ok(err) => err.error_description.unwrap_or(err.error),
        Err(_) => body,
    };
    Err(AnalyzeError::Upstream {
        status: status.as_u16(),
        message,
    })
}

fn into_token(grant: TokenGrant, previous_refresh: Option<&str>) -> Token {
    Token {
        access_token: grant.access_token,
        refresh_token: grant
            .refresh_token
            .or_else(|| previous_refresh.map(str::to_string))
            .unwrap_or_default(),
        scope: grant.scope.unwrap_or_default(),
        expires_in: grant.expires_in.unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    }
}
