use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use tabled::Table;

use crate::{
    analysis, error,
    error::AnalyzeError,
    info,
    management::{AppTokenCache, ClientCredentials, CredentialProvider, SystemClock, TokenManager},
    spotify::SpotifyClient,
    success,
    types::{AnalysisResult, CountTableRow, NamedCount, UserTableRow},
    utils, warning,
};

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub playlist: String,
    pub app_token: bool,
    pub json: bool,
    pub top: usize,
}

/// Runs the analysis for one playlist and prints the rankings.
///
/// The credential comes from the token stored by `plstats auth`, or from the
/// client-credentials grant with `--app-token` (public playlists only). With
/// `--json` the same envelope the HTTP API answers with is printed instead of
/// tables, including on failure.
pub async fn analyze(opts: AnalyzeOptions) {
    let playlist_id = match utils::parse_playlist_ref(&opts.playlist) {
        Ok(id) => id,
        Err(e) => error!("{}", e),
    };

    let client = match SpotifyClient::from_env() {
        Ok(client) => client,
        Err(e) => error!("Cannot create Spotify client: {}", e),
    };

    let provider: Box<dyn CredentialProvider> = if opts.app_token {
        match ClientCredentials::from_env(client.http().clone()) {
            Ok(source) => Box::new(AppTokenCache::new(source, SystemClock)),
            Err(e) => error!("{}", e),
        }
    } else {
        match TokenManager::load().await {
            Ok(manager) => Box::new(manager),
            Err(e) => error!(
                "Failed to load token. Please run plstats auth\n Error: {}",
                e
            ),
        }
    };

    let credential = match provider.bearer().await {
        Ok(credential) => credential,
        Err(e) => fail(opts.json, e),
    };

    if !opts.json {
        info!("Analyzing playlist {}", playlist_id);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching playlist and artist metadata...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let result = analysis::analyze_top(&client, &playlist_id, &credential, opts.top).await;
    pb.finish_and_clear();

    match result {
        Ok(result) if opts.json => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Cannot serialize result: {}", e),
        },
        Ok(result) => render(&result),
        Err(e) => fail(opts.json, e),
    }
}

fn fail(as_json: bool, err: AnalyzeError) -> ! {
    if as_json {
        let envelope = json!({
            "error": {
                "status": err.status().as_u16(),
                "message": err.public_message(),
            }
        });
        println!("{}", envelope);
        std::process::exit(1);
    }
    error!("Analysis failed: {}", err)
}

fn render(result: &AnalysisResult) {
    if result.top_artists.is_empty() && result.top_users.is_empty() {
        warning!("Playlist is empty, nothing to rank.");
        return;
    }

    success!("Top artists");
    println!("{}", Table::new(count_rows(&result.top_artists)));

    if result.top_genres.is_empty() {
        warning!("Spotify reported no genres for these artists.");
    } else {
        success!("Top genres");
        println!("{}", Table::new(count_rows(&result.top_genres)));
    }

    success!("Top contributors");
    let users: Vec<UserTableRow> = result
        .top_users
        .iter()
        .enumerate()
        .map(|(i, u)| UserTableRow {
            rank: i + 1,
            name: u.display_name.clone(),
            id: u.id.clone(),
            tracks: u.count,
        })
        .collect();
    println!("{}", Table::new(users));
}

fn count_rows(entries: &[NamedCount]) -> Vec<CountTableRow> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| CountTableRow {
            rank: i + 1,
            name: e.name.clone(),
            count: e.count,
        })
        .collect()
}
