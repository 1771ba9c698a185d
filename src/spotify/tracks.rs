use serde_json::json;

use crate::{
    spotify::SpotifyClient,
    types::{
        ArtistOverviewResponse, AudioFeatures, AudioFeaturesResponse, Token, TopTrackEntry,
        TrackDetailsResponse,
    },
};

impl SpotifyClient {
    /// Lists an artist's top tracks through the catalog-graph endpoint.
    ///
    /// Sends the persisted `queryArtistOverview` operation with the session
    /// token. The variables payload carries the artist URI, an empty locale
    /// and `includePrerelease: true`; the extensions payload carries the
    /// persisted-query hash from the config.
    ///
    /// The list keeps the upstream order and is cut to
    /// `Config::top_tracks_limit` entries. A response that lacks any level of
    /// `data.artistUnion.discography.topTracks.items` gives an empty list.
    pub async fn top_tracks(
        &self,
        artist_id: &str,
        token: &Token,
    ) -> Result<Vec<TopTrackEntry>, reqwest::Error> {
        let variables = json!({
            "uri": format!("spotify:artist:{}", artist_id),
            "locale": "",
            "includePrerelease": true,
        })
        .to_string();
        let extensions = json!({
            "persistedQuery": {
                "version": 1,
                "sha256Hash": &self.config.top_tracks_hash,
            }
        })
        .to_string();

        let request = self
            .http
            .get(&self.config.partner_api_url)
            .bearer_auth(token.secret())
            .query(&[
                ("operationName", self.config.top_tracks_operation.as_str()),
                ("variables", variables.as_str()),
                ("extensions", extensions.as_str()),
            ]);

        let res = self.get_json::<ArtistOverviewResponse>(request).await?;
        let mut tracks = res.into_top_tracks();
        tracks.truncate(self.config.top_tracks_limit);

        Ok(tracks)
    }

    /// Current popularity (0-100) of a track, `0` if the response omits it.
    pub async fn track_popularity(
        &self,
        track_id: &str,
        token: &Token,
    ) -> Result<u32, reqwest::Error> {
        let api_url = format!(
            "{uri}/tracks/{id}",
            uri = &self.config.api_url,
            id = track_id
        );
        let request = self.http.get(&api_url).bearer_auth(token.secret());

        let res = self.get_json::<TrackDetailsResponse>(request).await?;
        Ok(res.popularity.unwrap_or(0))
    }

    /// Audio features of a track.
    ///
    /// A `null` body or missing fields give zeroes; only transport errors,
    /// non-2xx statuses and undecodable bodies are errors.
    pub async fn audio_features(
        &self,
        track_id: &str,
        token: &Token,
    ) -> Result<AudioFeatures, reqwest::Error> {
        let api_url = format!(
            "{uri}/audio-features/{id}",
            uri = &self.config.api_url,
            id = track_id
        );
        let request = self.http.get(&api_url).bearer_auth(token.secret());

        let res = self
            .get_json::<Option<AudioFeaturesResponse>>(request)
            .await?;
        Ok(res.map(AudioFeatures::from).unwrap_or_default())
    }
}
