//! Authorize-URL construction.

use crate::error::AuthError;
use url::Url;

/// Default authorize endpoint.
pub const AUTHORIZE_ENDPOINT: &str = "https://accounts.spotify.com/authorize";

/// Scopes the streaming backend needs: playback SDK streaming plus the
/// read/modify playback-state pair the Web API play request requires.
pub const DEFAULT_SCOPES: &str =
    "streaming user-read-email user-read-private user-read-playback-state user-modify-playback-state";

/// Implicit-grant configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Application client id.
    pub client_id: String,
    /// Redirect URI registered with the provider; must be HTTPS in
    /// production because the SDK requires a secure context.
    pub redirect_uri: String,
    /// Space-separated scope list.
    pub scopes: String,
    /// Authorize endpoint; overridable for tests.
    pub authorize_endpoint: String,
}

impl AuthConfig {
    /// Config with the default endpoint and scope set.
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            scopes: DEFAULT_SCOPES.to_string(),
            authorize_endpoint: AUTHORIZE_ENDPOINT.to_string(),
        }
    }

    /// Overrides the scope list.
    pub fn with_scopes(mut self, scopes: impl Into<String>) -> Self {
        self.scopes = scopes.into();
        self
    }

    /// Builds the URL the host should navigate to for `response_type=token`.
    pub fn authorize_url(&self) -> Result<String, AuthError> {
        let mut url = Url::parse(&self.authorize_endpoint)
            .map_err(|e| AuthError::InvalidConfig(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "token")
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", &self.scopes);
        Ok(url.into())
    }
}
