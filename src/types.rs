use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tabled::Tabled;

/// Opaque bearer credential.
///
/// The secret value is only reachable through [`Token::secret`]; `Debug`
/// output is redacted so a token never ends up in a log line.
#[derive(Clone)]
pub struct Token {
    access_token: String,
    pub expires_in: Option<u64>,
    pub obtained_at: DateTime<Utc>,
}

impl Token {
    pub fn new(access_token: impl Into<String>, expires_in: Option<u64>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_in,
            obtained_at: Utc::now(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.access_token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_in
            .and_then(|secs| i64::try_from(secs).ok())
            .map(|secs| self.obtained_at + Duration::seconds(secs))
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"***")
            .field("expires_in", &self.expires_in)
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

/// The two credentials a run needs.
///
/// `app` authorizes search, track details and audio features; `session`
/// authorizes the catalog-graph query.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub app: Token,
    pub session: Token,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientCredentialsResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    pub artists: Option<SearchArtists>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchArtists {
    pub items: Option<Vec<SearchArtist>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchArtist {
    pub id: Option<String>,
    pub followers: Option<Followers>,
    pub popularity: Option<u32>,
    pub genres: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Followers {
    pub total: Option<u64>,
}

impl SearchResponse {
    /// Takes the first artist of the response, filling absent fields with
    /// their defaults. An artist without an id cannot be resolved further and
    /// counts as no match.
    pub fn into_first_identity(self) -> Option<ArtistIdentity> {
        let artist = self.artists?.items?.into_iter().next()?;
        let id = artist.id.filter(|id| !id.is_empty())?;

        Some(ArtistIdentity {
            id,
            followers: artist.followers.and_then(|f| f.total).unwrap_or(0),
            popularity: artist.popularity.unwrap_or(0),
            genres: artist.genres.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtistOverviewResponse {
    pub data: Option<ArtistOverviewData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistOverviewData {
    #[serde(rename = "artistUnion")]
    pub artist_union: Option<ArtistUnion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistUnion {
    pub discography: Option<Discography>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Discography {
    #[serde(rename = "topTracks")]
    pub top_tracks: Option<TopTracks>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopTracks {
    pub items: Option<Vec<TopTrackItem>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopTrackItem {
    pub track: Option<TopTrackData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopTrackData {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_playcount")]
    pub playcount: Option<u64>,
}

impl ArtistOverviewResponse {
    /// Flattens `data.artistUnion.discography.topTracks.items` into entries,
    /// keeping the upstream order. Any missing level yields an empty list.
    pub fn into_top_tracks(self) -> Vec<TopTrackEntry> {
        self.data
            .and_then(|d| d.artist_union)
            .and_then(|a| a.discography)
            .and_then(|d| d.top_tracks)
            .and_then(|t| t.items)
            .unwrap_or_default()
            .into_iter()
            .map(|item| match item.track {
                Some(track) => TopTrackEntry {
                    id: track.id,
                    name: track.name,
                    playcount: track.playcount,
                },
                None => TopTrackEntry::default(),
            })
            .collect()
    }
}

// upstream sends the play count as a decimal string
fn deserialize_playcount<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackDetailsResponse {
    pub popularity: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AudioFeaturesResponse {
    pub danceability: Option<f64>,
    pub energy: Option<f64>,
    pub acousticness: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AudioFeatures {
    pub danceability: f64,
    pub energy: f64,
    pub acousticness: f64,
}

impl From<AudioFeaturesResponse> for AudioFeatures {
    fn from(res: AudioFeaturesResponse) -> Self {
        Self {
            danceability: res.danceability.unwrap_or(0.0),
            energy: res.energy.unwrap_or(0.0),
            acousticness: res.acousticness.unwrap_or(0.0),
        }
    }
}

/// Best search match for an artist name.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistIdentity {
    pub id: String,
    pub followers: u64,
    pub popularity: u32,
    pub genres: Vec<String>,
}

/// One entry of an artist's top tracks as returned by the catalog graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopTrackEntry {
    pub id: Option<String>,
    pub name: Option<String>,
    pub playcount: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub track_name: String,
    pub popularity: u32,
    /// Play count reported by the catalog graph.
    pub track_number: Option<u64>,
    pub danceability: f64,
    pub energy: f64,
    pub acousticness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistRecord {
    pub name: String,
    pub followers: u64,
    pub popularity: u32,
    pub genres: Vec<String>,
    pub tracks: Vec<TrackRecord>,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub name: String,
    pub followers: u64,
    pub popularity: u32,
    pub genres: String,
    pub tracks: usize,
}

impl From<&ArtistRecord> for ArtistTableRow {
    fn from(record: &ArtistRecord) -> Self {
        Self {
            name: record.name.clone(),
            followers: record.followers,
            popularity: record.popularity,
            genres: record
                .genres
                .iter()
                .take(3)
                .cloned()
                .collect::<Vec<_>>()
                .join(","),
            tracks: record.tracks.len(),
        }
    }
}
