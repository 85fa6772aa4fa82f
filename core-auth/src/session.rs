//! In-memory auth session.

use crate::fragment::extract_token_from_fragment;
use crate::token::AccessToken;
use core_runtime::{AuthEvent, EventBus, JukeboxEvent};
use std::sync::Mutex;
use tracing::{debug, info};

/// Holds the current access token in memory.
///
/// Losing the session (restart, `clear`) means the user must re-authenticate;
/// there is no refresh flow in the implicit grant and the token is never
/// persisted anywhere.
pub struct AuthSession {
    token: Mutex<Option<AccessToken>>,
    bus: EventBus,
}

impl AuthSession {
    /// Creates an empty session.
    pub fn new(bus: EventBus) -> Self {
        Self {
            token: Mutex::new(None),
            bus,
        }
    }

    /// Adopts a token extracted from a redirect fragment, if one is present.
    ///
    /// Returns true when a token was adopted. The caller scrubs the
    /// fragment from the visible URL either way.
    pub fn adopt_from_fragment(&self, fragment: &str) -> bool {
        match extract_token_from_fragment(fragment) {
            Some(token) => {
                let expires = token.expires_in_secs();
                *self.token.lock().expect("session lock poisoned") = Some(token);
                info!(expires_in_secs = ?expires, "access token acquired");
                self.bus
                    .emit(JukeboxEvent::Auth(AuthEvent::TokenAcquired {
                        expires_in_secs: expires,
                    }))
                    .ok();
                true
            }
            None => {
                debug!("redirect fragment carried no token");
                false
            }
        }
    }

    /// Replaces the session token directly (tests, native hosts).
    pub fn set_token(&self, token: AccessToken) {
        let expires = token.expires_in_secs();
        *self.token.lock().expect("session lock poisoned") = Some(token);
        self.bus
            .emit(JukeboxEvent::Auth(AuthEvent::TokenAcquired {
                expires_in_secs: expires,
            }))
            .ok();
    }

    /// Snapshot of the current token.
    pub fn token(&self) -> Option<AccessToken> {
        self.token.lock().expect("session lock poisoned").clone()
    }

    /// Whether a token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.token.lock().expect("session lock poisoned").is_some()
    }

    /// Drops the token; streaming requires re-authentication afterwards.
    pub fn clear(&self) {
        let had = self
            .token
            .lock()
            .expect("session lock poisoned")
            .take()
            .is_some();
        if had {
            info!("auth session cleared");
            self.bus
                .emit(JukeboxEvent::Auth(AuthEvent::SessionCleared))
                .ok();
        }
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("is_authenticated", &self.is_authenticated())
            .finish()
    }
}
