use crate::{
    spotify::SpotifyClient,
    types::{ArtistIdentity, SearchResponse, Token},
};

impl SpotifyClient {
    /// Searches the catalog for `name` and returns the best match.
    ///
    /// Issues `GET /search?q={name}&type=artist&limit=1` with the application
    /// token. Followers, popularity and genres fall back to `0`, `0` and an
    /// empty list when the response omits them.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(identity))` - the first search hit
    /// - `Ok(None)` - the search succeeded but matched nothing usable
    /// - `Err(reqwest::Error)` - transport error, non-2xx status, or a body
    ///   that is not a search response
    ///
    /// # Example
    ///
    /// ```ignore
    /// if let Some(artist) = client.search_artist("Tove Lo", &app_token).await? {
    ///     println!("{} followers", artist.followers);
    /// }
    /// ```
    pub async fn search_artist(
        &self,
        name: &str,
        token: &Token,
    ) -> Result<Option<ArtistIdentity>, reqwest::Error> {
        let api_url = format!("{uri}/search", uri = &self.config.api_url);
        let request = self.http.get(&api_url).bearer_auth(token.secret()).query(&[
            ("q", name),
            ("type", "artist"),
            ("limit", "1"),
        ]);

        let res = self.get_json::<SearchResponse>(request).await?;
        Ok(res.into_first_identity())
    }
}
