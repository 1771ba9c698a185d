use std::fmt;

use crate::{
    spotify::SpotifyClient,
    types::{ClientCredentialsResponse, Credentials, Token},
};

#[derive(Debug)]
pub enum AuthError {
    Request(reqwest::Error),
    MissingAccessToken,
    TokenMarkerMissing(String),
    MalformedToken,
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Request(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Request(e) => write!(f, "token request failed: {}", e),
            AuthError::MissingAccessToken => write!(f, "token response has no access_token"),
            AuthError::TokenMarkerMissing(marker) => {
                write!(f, "marker {} not found in page source", marker)
            }
            AuthError::MalformedToken => write!(f, "access token in page source is malformed"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Request(e) => Some(e),
            _ => None,
        }
    }
}

impl SpotifyClient {
    /// Exchanges the configured client id and secret for an application token.
    ///
    /// Uses the OAuth 2.0 client-credentials grant against
    /// `Config::token_url`. The token carries no user scope and is enough for
    /// search, track details and audio features.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Request`] on transport failure or a non-2xx status
    /// - [`AuthError::MissingAccessToken`] if the body has no usable token
    pub async fn app_token(&self) -> Result<Token, AuthError> {
        let res = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let json = res.json::<ClientCredentialsResponse>().await?;

        match json.access_token.filter(|t| !t.is_empty()) {
            Some(access_token) => Ok(Token::new(access_token, json.expires_in)),
            None => Err(AuthError::MissingAccessToken),
        }
    }

    /// Fetches the web player page and extracts the anonymous session token
    /// embedded in its inline script.
    ///
    /// The page layout is not under our control; see
    /// [`extract_access_token`] for the exact marker contract.
    pub async fn session_token(&self) -> Result<Token, AuthError> {
        let page = self
            .http
            .get(&self.config.web_player_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let access_token = extract_access_token(&page, &self.config.token_marker)?;
        Ok(Token::new(access_token, None))
    }

    /// Obtains both credentials, application token first.
    pub async fn authenticate(&self) -> Result<Credentials, AuthError> {
        let app = self.app_token().await?;
        let session = self.session_token().await?;
        Ok(Credentials { app, session })
    }
}

/// Extracts an access token from a semi-structured document.
///
/// Contract: the token is the run of characters that starts right after the
/// first occurrence of `marker` and ends before the next `"`. The marker
/// therefore has to include the opening quote of the value, e.g.
/// `"accessToken":"`.
///
/// # Errors
///
/// - [`AuthError::TokenMarkerMissing`] if `marker` is empty or absent
/// - [`AuthError::MalformedToken`] if the value is unterminated or empty
///
/// # Example
///
/// ```ignore
/// let page = r#"<script>{"accessToken":"BQD123","isAnonymous":true}</script>"#;
/// assert_eq!(extract_access_token(page, "\"accessToken\":\"")?, "BQD123");
/// ```
pub fn extract_access_token(document: &str, marker: &str) -> Result<String, AuthError> {
    if marker.is_empty() {
        return Err(AuthError::TokenMarkerMissing(marker.to_string()));
    }

    let start = document
        .find(marker)
        .ok_or_else(|| AuthError::TokenMarkerMissing(marker.to_string()))?
        + marker.len();

    let rest = &document[start..];
    let end = rest.find('"').ok_or(AuthError::MalformedToken)?;
    let token = &rest[..end];

    if token.is_empty() {
        return Err(AuthError::MalformedToken);
    }

    Ok(token.to_string())
}
