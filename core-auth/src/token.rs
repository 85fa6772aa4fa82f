//! The in-memory access token.

use std::fmt;

/// A bearer token received from the implicit-grant redirect.
///
/// Holds the secret in memory only. `Debug` prints `[REDACTED]` in place of
/// the value; there is deliberately no `Serialize` impl.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    token_type: String,
    expires_in_secs: Option<u64>,
}

impl AccessToken {
    /// Wraps a raw token string.
    pub fn new(value: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            token_type: token_type.into(),
            expires_in_secs: None,
        }
    }

    /// Attaches the advertised lifetime.
    pub fn with_expires_in(mut self, secs: u64) -> Self {
        self.expires_in_secs = Some(secs);
        self
    }

    /// The raw secret. Handle with care; never log it.
    pub fn secret(&self) -> &str {
        &self.value
    }

    /// Token type as reported by the provider (normally "Bearer").
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Advertised lifetime in seconds, when the provider sent one.
    pub fn expires_in_secs(&self) -> Option<u64> {
        self.expires_in_secs
    }

    /// The `Authorization` header value for Web API requests.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in_secs", &self.expires_in_secs)
            .finish()
    }
}
