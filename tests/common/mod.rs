//! Common test infrastructure
//!
//! Spawns an in-process stand-in for the Spotify endpoints the pipeline
//! talks to. Every test builds its own [`FakeCatalog`], spawns a
//! [`FakeSpotify`] on a random port and points a [`Config`] at it.
//!
//! ```no_run
//! mod common;
//! use common::{FakeCatalog, FakeSpotify};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let spotify = FakeSpotify::spawn(FakeCatalog::new().with_artist("Artist A", "a1", &["pop"], 3)).await;
//!     let client = spotify.client();
//! }
//! ```

#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use artistscope::{
    config::{Config, DEFAULT_TOP_TRACKS_HASH},
    spotify::SpotifyClient,
};
use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";
pub const APP_TOKEN: &str = "app-token-123";
pub const SESSION_TOKEN: &str = "session-token-456";

/// Upstream data served by a [`FakeSpotify`].
#[derive(Clone)]
pub struct FakeCatalog {
    /// search query -> first search hit
    pub search_items: HashMap<String, Value>,
    /// artist id -> `topTracks.items`
    pub top_tracks: HashMap<String, Value>,
    /// track id -> popularity, absent ids answer 404
    pub popularity: HashMap<String, Value>,
    /// track id -> audio features body, absent ids answer 404
    pub features: HashMap<String, Value>,
    pub failing_search: HashSet<String>,
    pub failing_top_tracks: HashSet<String>,
    pub token_status: StatusCode,
    pub player_page: String,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self {
            search_items: HashMap::new(),
            top_tracks: HashMap::new(),
            popularity: HashMap::new(),
            features: HashMap::new(),
            failing_search: HashSet::new(),
            failing_top_tracks: HashSet::new(),
            token_status: StatusCode::OK,
            player_page: player_page(SESSION_TOKEN),
        }
    }

    /// Registers an artist with `track_count` top tracks.
    ///
    /// Track ids are `{id}-track-{n}` (n from 1), names `{name} Song {n}`,
    /// play counts `1000000 - n * 1000` as strings, popularity `90 - n`,
    /// danceability `n / 10`, energy `0.6`, acousticness `0.1`.
    pub fn with_artist(
        mut self,
        name: &str,
        id: &str,
        genres: &[&str],
        track_count: usize,
    ) -> Self {
        self.search_items.insert(
            name.to_string(),
            json!({
                "id": id,
                "name": name,
                "type": "artist",
                "followers": { "href": null, "total": 12345 },
                "popularity": 77,
                "genres": genres,
            }),
        );

        let items: Vec<Value> = (1..=track_count)
            .map(|n| {
                let track_id = track_id(id, n);
                self.popularity.insert(
                    track_id.clone(),
                    json!({ "id": track_id, "popularity": 90 - n }),
                );
                self.features.insert(
                    track_id.clone(),
                    json!({
                        "id": track_id,
                        "danceability": n as f64 / 10.0,
                        "energy": 0.6,
                        "acousticness": 0.1,
                        "tempo": 120.0,
                    }),
                );
                json!({
                    "uid": format!("uid-{}", n),
                    "track": {
                        "id": track_id,
                        "uri": format!("spotify:track:{}", track_id),
                        "name": format!("{} Song {}", name, n),
                        "playcount": (1_000_000 - n * 1000).to_string(),
                    }
                })
            })
            .collect();
        self.top_tracks.insert(id.to_string(), Value::Array(items));
        self
    }

    pub fn with_search_item(mut self, query: &str, item: Value) -> Self {
        self.search_items.insert(query.to_string(), item);
        self
    }

    pub fn with_top_tracks(mut self, artist_id: &str, items: Value) -> Self {
        self.top_tracks.insert(artist_id.to_string(), items);
        self
    }

    pub fn with_features(mut self, track_id: &str, body: Value) -> Self {
        self.features.insert(track_id.to_string(), body);
        self
    }

    pub fn without_popularity(mut self, track_id: &str) -> Self {
        self.popularity.remove(track_id);
        self
    }

    pub fn without_features(mut self, track_id: &str) -> Self {
        self.features.remove(track_id);
        self
    }

    pub fn with_failing_search(mut self, query: &str) -> Self {
        self.failing_search.insert(query.to_string());
        self
    }

    pub fn with_failing_top_tracks(mut self, artist_id: &str) -> Self {
        self.failing_top_tracks.insert(artist_id.to_string());
        self
    }

    pub fn with_token_status(mut self, status: StatusCode) -> Self {
        self.token_status = status;
        self
    }

    pub fn with_player_page(mut self, page: impl Into<String>) -> Self {
        self.player_page = page.into();
        self
    }
}

pub fn track_id(artist_id: &str, n: usize) -> String {
    format!("{}-track-{}", artist_id, n)
}

pub fn player_page(token: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><script src="/app.js"></script>
<script id="session" type="application/json">{{"accessToken":"{}","accessTokenExpirationTimestampMs":1700000000000,"isAnonymous":true}}</script>
</head><body></body></html>"#,
        token
    )
}

struct FakeState {
    catalog: FakeCatalog,
    requests: Mutex<Vec<String>>,
}

impl FakeState {
    fn record(&self, path: String) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(path);
        }
    }
}

/// A running fake Spotify. Shuts down when dropped.
pub struct FakeSpotify {
    pub base_url: String,
    state: Arc<FakeState>,
    _shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

impl FakeSpotify {
    pub async fn spawn(catalog: FakeCatalog) -> Self {
        let state = Arc::new(FakeState {
            catalog,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/token", post(token))
            .route("/", get(web_player))
            .route("/v1/search", get(search))
            .route("/v1/tracks/{id}", get(track_details))
            .route("/v1/audio-features/{id}", get(audio_features))
            .route("/pathfinder/v1/query", get(pathfinder))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Fake Spotify failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
            _shutdown_tx: shutdown_tx,
        }
    }

    pub fn config(&self) -> Config {
        Config {
            api_url: format!("{}/v1", self.base_url),
            token_url: format!("{}/api/token", self.base_url),
            partner_api_url: format!("{}/pathfinder/v1/query", self.base_url),
            web_player_url: format!("{}/", self.base_url),
            http_timeout: Duration::from_secs(5),
            ..Config::new(CLIENT_ID, CLIENT_SECRET)
        }
    }

    pub fn client(&self) -> SpotifyClient {
        SpotifyClient::new(self.config()).expect("Failed to build client")
    }

    /// Paths requested so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.state
            .requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn count_requests(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|path| path.starts_with(prefix))
            .count()
    }
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": { "status": 401, "message": "Invalid access token" } })),
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": { "status": 404, "message": "Resource not found" } })),
    )
        .into_response()
}

async fn token(
    State(state): State<Arc<FakeState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.record("/api/token".to_string());

    let valid = form.get("grant_type").map(String::as_str) == Some("client_credentials")
        && form.get("client_id").map(String::as_str) == Some(CLIENT_ID)
        && form.get("client_secret").map(String::as_str) == Some(CLIENT_SECRET);
    if !valid {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_client" })),
        )
            .into_response();
    }

    if state.catalog.token_status != StatusCode::OK {
        return (
            state.catalog.token_status,
            Json(json!({ "error": "server_error" })),
        )
            .into_response();
    }

    Json(json!({
        "access_token": APP_TOKEN,
        "token_type": "Bearer",
        "expires_in": 3600,
    }))
    .into_response()
}

async fn web_player(State(state): State<Arc<FakeState>>) -> Html<String> {
    state.record("/".to_string());
    Html(state.catalog.player_page.clone())
}

async fn search(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.record("/v1/search".to_string());
    if bearer(&headers) != Some(APP_TOKEN) {
        return unauthorized();
    }

    let query = params.get("q").cloned().unwrap_or_default();
    if params.get("type").map(String::as_str) != Some("artist")
        || params.get("limit").map(String::as_str) != Some("1")
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "bad search" })),
        )
            .into_response();
    }
    if state.catalog.failing_search.contains(&query) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }

    let items: Vec<Value> = state
        .catalog
        .search_items
        .get(&query)
        .cloned()
        .into_iter()
        .collect();

    Json(json!({
        "artists": {
            "href": "https://api.spotify.com/v1/search",
            "limit": 1,
            "total": items.len(),
            "items": items,
        }
    }))
    .into_response()
}

async fn pathfinder(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.record("/pathfinder/v1/query".to_string());
    if bearer(&headers) != Some(SESSION_TOKEN) {
        return unauthorized();
    }

    let variables: Value = params
        .get("variables")
        .and_then(|v| serde_json::from_str(v).ok())
        .unwrap_or(Value::Null);
    let extensions: Value = params
        .get("extensions")
        .and_then(|v| serde_json::from_str(v).ok())
        .unwrap_or(Value::Null);

    let operation = params.get("operationName").map(String::as_str);
    let well_formed = operation == Some("queryArtistOverview")
        && variables["locale"] == json!("")
        && variables["includePrerelease"] == json!(true)
        && extensions["persistedQuery"]["version"] == json!(1)
        && extensions["persistedQuery"]["sha256Hash"] == json!(DEFAULT_TOP_TRACKS_HASH);
    let artist_id = variables["uri"]
        .as_str()
        .and_then(|uri| uri.strip_prefix("spotify:artist:"))
        .map(str::to_string);

    let Some(artist_id) = artist_id.filter(|_| well_formed) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": ["bad query"] })),
        )
            .into_response();
    };

    if state.catalog.failing_top_tracks.contains(&artist_id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }

    let items = state
        .catalog
        .top_tracks
        .get(&artist_id)
        .cloned()
        .unwrap_or_else(|| json!([]));

    Json(json!({
        "data": {
            "artistUnion": {
                "__typename": "Artist",
                "discography": {
                    "topTracks": { "items": items }
                }
            }
        },
        "extensions": {}
    }))
    .into_response()
}

async fn track_details(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    state.record(format!("/v1/tracks/{}", id));
    if bearer(&headers) != Some(APP_TOKEN) {
        return unauthorized();
    }

    match state.catalog.popularity.get(&id) {
        Some(body) => Json(body.clone()).into_response(),
        None => not_found(),
    }
}

async fn audio_features(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    state.record(format!("/v1/audio-features/{}", id));
    if bearer(&headers) != Some(APP_TOKEN) {
        return unauthorized();
    }

    match state.catalog.features.get(&id) {
        Some(body) => Json(body.clone()).into_response(),
        None => not_found(),
    }
}
