use std::sync::Arc;

use crate::{
    error,
    server::{AppState, start_api_server},
    spotify::SpotifyClient,
};

pub async fn serve() {
    let client = match SpotifyClient::from_env() {
        Ok(client) => client,
        Err(e) => error!("Cannot create Spotify client: {}", e),
    };

    if let Err(e) = start_api_server(AppState::new(Arc::new(client))).await {
        error!("Server stopped: {}", e);
    }
}
