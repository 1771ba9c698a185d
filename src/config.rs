//! Configuration management for artistscope.
//!
//! This module handles loading configuration values from environment variables
//! and `.env` files and turns them into a single immutable [`Config`] value.
//! The config is built once at startup and handed to every component that
//! needs an endpoint address or a credential, so nothing reads the process
//! environment after that point.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the working directory
//! 4. Application defaults (everything except the client credentials)

use std::{env, fmt, path::PathBuf, time::Duration};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_PARTNER_API_URL: &str = "https://api-partner.spotify.com/pathfinder/v1/query";
pub const DEFAULT_WEB_PLAYER_URL: &str = "https://open.spotify.com/";
pub const DEFAULT_TOP_TRACKS_OPERATION: &str = "queryArtistOverview";
pub const DEFAULT_TOP_TRACKS_HASH: &str =
    "da986392124383827dc03cbb3d66c1de81225244b6e20f8d78f9f802cc43df6e";
pub const DEFAULT_TOKEN_MARKER: &str = "\"accessToken\":\"";
pub const DEFAULT_TOP_TRACKS_LIMIT: usize = 5;
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";

pub const ENV_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
pub const ENV_API_URL: &str = "SPOTIFY_API_URL";
pub const ENV_TOKEN_URL: &str = "SPOTIFY_API_TOKEN_URL";
pub const ENV_PARTNER_API_URL: &str = "SPOTIFY_PARTNER_API_URL";
pub const ENV_WEB_PLAYER_URL: &str = "SPOTIFY_WEB_PLAYER_URL";
pub const ENV_TOP_TRACKS_HASH: &str = "SPOTIFY_TOP_TRACKS_HASH";
pub const ENV_SERVER_ADDRESS: &str = "SERVER_ADDRESS";

#[derive(Debug)]
pub enum ConfigError {
    MissingVar(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar(name) => write!(f, "{} must be set", name),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Immutable runtime configuration.
///
/// Holds the client credentials, every upstream endpoint address and the
/// constants of the catalog-graph query. Build it with [`Config::from_env`]
/// in the binary, or with [`Config::new`] plus struct update syntax when the
/// endpoints need to point somewhere else:
///
/// ```ignore
/// let config = Config {
///     api_url: "http://127.0.0.1:8080/v1".to_string(),
///     ..Config::new("id", "secret")
/// };
/// ```
#[derive(Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    /// Base URL of the Web API (search, tracks, audio features).
    pub api_url: String,
    /// Client-credentials token exchange endpoint.
    pub token_url: String,
    /// Catalog-graph query endpoint used for top tracks.
    pub partner_api_url: String,
    /// Web page that embeds the anonymous session token.
    pub web_player_url: String,
    pub top_tracks_operation: String,
    pub top_tracks_hash: String,
    pub top_tracks_limit: usize,
    /// Substring that immediately precedes the session token in the web page.
    pub token_marker: String,
    pub http_timeout: Duration,
}

impl Config {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_url: DEFAULT_API_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            partner_api_url: DEFAULT_PARTNER_API_URL.to_string(),
            web_player_url: DEFAULT_WEB_PLAYER_URL.to_string(),
            top_tracks_operation: DEFAULT_TOP_TRACKS_OPERATION.to_string(),
            top_tracks_hash: DEFAULT_TOP_TRACKS_HASH.to_string(),
            top_tracks_limit: DEFAULT_TOP_TRACKS_LIMIT,
            token_marker: DEFAULT_TOKEN_MARKER.to_string(),
            http_timeout: Duration::from_secs(30),
        }
    }

    /// Builds the configuration from the process environment.
    ///
    /// `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET` are required; the
    /// endpoint variables are optional overrides of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] if a required variable is unset or
    /// empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id = read(ENV_CLIENT_ID)
            .ok_or_else(|| ConfigError::MissingVar(ENV_CLIENT_ID.to_string()))?;
        let client_secret = read(ENV_CLIENT_SECRET)
            .ok_or_else(|| ConfigError::MissingVar(ENV_CLIENT_SECRET.to_string()))?;

        let mut config = Config::new(client_id, client_secret);
        if let Some(url) = read(ENV_API_URL) {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = read(ENV_TOKEN_URL) {
            config.token_url = url;
        }
        if let Some(url) = read(ENV_PARTNER_API_URL) {
            config.partner_api_url = url;
        }
        if let Some(url) = read(ENV_WEB_PLAYER_URL) {
            config.web_player_url = url;
        }
        if let Some(hash) = read(ENV_TOP_TRACKS_HASH) {
            config.top_tracks_hash = hash;
        }

        Ok(config)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("api_url", &self.api_url)
            .field("token_url", &self.token_url)
            .field("partner_api_url", &self.partner_api_url)
            .field("web_player_url", &self.web_player_url)
            .field("top_tracks_operation", &self.top_tracks_operation)
            .field("top_tracks_hash", &self.top_tracks_hash)
            .field("top_tracks_limit", &self.top_tracks_limit)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

/// Loads environment variables from `.env` files.
///
/// Looks for `artistscope/.env` in the platform-specific local data directory
/// first, then for a `.env` in the working directory. Variables that are
/// already set in the process environment are never overwritten, and a
/// missing file is not an error.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/artistscope/.env`
/// - macOS: `~/Library/Application Support/artistscope/.env`
/// - Windows: `%LOCALAPPDATA%/artistscope/.env`
///
/// # Errors
///
/// Returns an error string if an existing `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("artistscope/.env");

    if async_fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }

    match dotenv::dotenv() {
        Ok(_) | Err(dotenv::Error::Io(_)) => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

/// Returns the bind address for `artistscope serve`.
///
/// Reads `SERVER_ADDRESS`, falling back to `127.0.0.1:5000`.
pub fn server_addr() -> String {
    env::var(ENV_SERVER_ADDRESS).unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string())
}
