//! # Spotify Integration Module
//!
//! This module is the HTTP layer between artistscope and Spotify. Every
//! request goes through a [`SpotifyClient`], which owns one pooled
//! `reqwest::Client` and the immutable [`Config`] that names the endpoints.
//!
//! ## Architecture
//!
//! ```text
//! Pipeline (resolve → list → fan-out)
//!          ↓
//! SpotifyClient
//!     ├── auth     (application token, session token)
//!     ├── artists  (identity search)
//!     └── tracks   (top tracks, track details, audio features)
//!          ↓
//! reqwest + serde_json
//! ```
//!
//! ## Credentials
//!
//! Two independent bearer tokens are used:
//! - **Application token** from the client-credentials exchange. Authorizes
//!   `GET /search`, `GET /tracks/{id}` and `GET /audio-features/{id}`.
//! - **Session token** scraped from the public web player page. Authorizes the
//!   catalog-graph (`pathfinder`) query that lists an artist's top tracks.
//!
//! ## Error Handling
//!
//! Functions here make exactly one attempt and return `Result`; a non-2xx
//! status becomes a `reqwest::Error` through `error_for_status`. Deciding
//! which failures are fatal is left to [`crate::pipeline`], which absorbs
//! everything except authentication failures.

pub mod artists;
pub mod auth;
pub mod tracks;

use std::sync::Arc;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::Config;

pub use auth::{AuthError, extract_access_token};

/// Shared handle to the Spotify endpoints.
///
/// Cloning is cheap: the HTTP connection pool and the config are shared.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    config: Arc<Config>,
}

impl SpotifyClient {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sends `request` and decodes a successful body as `T`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, reqwest::Error> {
        let response = request.send().await?.error_for_status()?;
        response.json::<T>().await
    }
}
