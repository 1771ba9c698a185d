//! The per-artist enrichment pipeline.
//!
//! For every input name the pipeline chains three dependent stages:
//!
//! ```text
//! name ──search──▶ ArtistIdentity ──graph query──▶ [TopTrackEntry; ≤5]
//!                                                     │ per track, concurrently
//!                                                     ├── track details  → popularity
//!                                                     └── audio features → danceability, energy, acousticness
//!                                                     ▼
//!                                                ArtistRecord
//! ```
//!
//! Failures are absorbed at the smallest scope that contains them:
//!
//! | Failure                 | Effect                                   |
//! |-------------------------|------------------------------------------|
//! | token acquisition       | run aborts, `Err(AuthError)`             |
//! | search failed / no hit  | artist skipped                           |
//! | track listing failed    | artist kept with an empty track list     |
//! | details/features failed | only that track's fields default to zero |

use futures::stream::{StreamExt, iter};

use crate::{
    spotify::{AuthError, SpotifyClient},
    types::{
        ArtistIdentity, ArtistRecord, AudioFeatures, Credentials, Token, TopTrackEntry,
        TrackRecord,
    },
    warning,
};

/// Lifecycle of one [`Pipeline::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    Authenticated,
    /// Index of the input name currently being processed.
    Processing(usize),
    Done,
    AuthenticationFailed,
}

pub struct Pipeline {
    client: SpotifyClient,
    state: RunState,
}

impl Pipeline {
    pub fn new(client: SpotifyClient) -> Self {
        Self {
            client,
            state: RunState::Init,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub async fn run(&mut self, names: &[String]) -> Result<Vec<ArtistRecord>, AuthError> {
        self.run_with_progress(names, |_, _, _| {}).await
    }

    /// Authenticates, then enriches `names` in input order.
    ///
    /// `on_artist(index, total, name)` is called before each artist is
    /// processed. The returned records are in input order and contain only
    /// the names that resolved.
    ///
    /// # Errors
    ///
    /// Returns the [`AuthError`] of the first credential that could not be
    /// obtained. No artist is processed in that case.
    pub async fn run_with_progress<F>(
        &mut self,
        names: &[String],
        mut on_artist: F,
    ) -> Result<Vec<ArtistRecord>, AuthError>
    where
        F: FnMut(usize, usize, &str),
    {
        self.state = RunState::Init;

        let credentials = match self.client.authenticate().await {
            Ok(credentials) => credentials,
            Err(e) => {
                self.state = RunState::AuthenticationFailed;
                return Err(e);
            }
        };
        self.state = RunState::Authenticated;

        let mut records = Vec::new();
        for (index, name) in names.iter().enumerate() {
            self.state = RunState::Processing(index);
            on_artist(index, names.len(), name);

            if let Some(record) = enrich_artist(&self.client, name, &credentials).await {
                records.push(record);
            }
        }

        self.state = RunState::Done;
        Ok(records)
    }
}

/// Resolves `name` and assembles its record, or `None` if it did not resolve.
pub async fn enrich_artist(
    client: &SpotifyClient,
    name: &str,
    credentials: &Credentials,
) -> Option<ArtistRecord> {
    let identity = resolve_identity(client, name, &credentials.app).await?;
    let entries = list_top_tracks(client, name, &identity.id, &credentials.session).await;

    // buffered yields results in listing order
    let track_futures: Vec<_> = entries
        .iter()
        .map(|entry| fetch_track_record(client, entry, &credentials.app))
        .collect();
    let tracks = iter(track_futures)
        .buffered(client.config().top_tracks_limit.max(1))
        .collect::<Vec<_>>()
        .await;

    Some(ArtistRecord {
        name: name.to_string(),
        followers: identity.followers,
        popularity: identity.popularity,
        genres: identity.genres,
        tracks,
    })
}

/// Search failures and empty results both yield `None`; only the log line
/// tells them apart.
pub async fn resolve_identity(
    client: &SpotifyClient,
    name: &str,
    token: &Token,
) -> Option<ArtistIdentity> {
    match client.search_artist(name, token).await {
        Ok(Some(identity)) => Some(identity),
        Ok(None) => {
            warning!(
                "Artist '{}' not found or missing necessary information.",
                name
            );
            None
        }
        Err(e) => {
            warning!("Failed to fetch data for artist '{}'. Err: {}", name, e);
            None
        }
    }
}

pub async fn list_top_tracks(
    client: &SpotifyClient,
    name: &str,
    artist_id: &str,
    token: &Token,
) -> Vec<TopTrackEntry> {
    match client.top_tracks(artist_id, token).await {
        Ok(tracks) => tracks,
        Err(e) => {
            warning!(
                "Failed to fetch top tracks for artist '{}'. Err: {}",
                name,
                e
            );
            Vec::new()
        }
    }
}

/// Fetches popularity and audio features for one track and merges them with
/// the listing entry.
///
/// The two requests run concurrently and fail independently: each failure
/// only zeroes its own fields. An entry without a track id skips both
/// requests.
pub async fn fetch_track_record(
    client: &SpotifyClient,
    entry: &TopTrackEntry,
    token: &Token,
) -> TrackRecord {
    let track_name = entry.name.clone().unwrap_or_default();

    let Some(track_id) = entry.id.as_deref().filter(|id| !id.is_empty()) else {
        warning!("Track '{}' has no id, using default values.", track_name);
        return TrackRecord {
            track_name,
            track_number: entry.playcount,
            ..TrackRecord::default()
        };
    };

    let (popularity, features) = tokio::join!(
        client.track_popularity(track_id, token),
        client.audio_features(track_id, token),
    );

    let popularity = popularity.unwrap_or_else(|e| {
        warning!(
            "Failed to fetch popularity for track '{}'. Err: {}",
            track_name,
            e
        );
        0
    });
    let features = features.unwrap_or_else(|e| {
        warning!(
            "Failed to fetch audio features for track '{}'. Err: {}",
            track_name,
            e
        );
        AudioFeatures::default()
    });

    TrackRecord {
        track_name,
        popularity,
        track_number: entry.playcount,
        danceability: features.danceability,
        energy: features.energy,
        acousticness: features.acousticness,
    }
}
