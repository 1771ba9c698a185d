use std::sync::Arc;

use crate::{
    api::{ApiState, UploadLimits},
    config::Config,
    error,
    server::start_api_server,
    spotify::SpotifyClient,
};

pub async fn serve(address: &str, column: &str) {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };

    let client = match SpotifyClient::new(config) {
        Ok(client) => client,
        Err(e) => error!("Cannot build HTTP client. Err: {}", e),
    };

    let state = Arc::new(ApiState {
        client,
        column: column.to_string(),
        limits: UploadLimits::default(),
    });

    if let Err(e) = start_api_server(address, state).await {
        error!("API server stopped. Err: {}", e);
    }
}
