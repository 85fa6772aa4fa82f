//! Authentication error type.

use thiserror::Error;

/// Errors from the implicit-grant helper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The authorize URL could not be assembled from the config.
    #[error("invalid authorize endpoint or redirect URI: {0}")]
    InvalidConfig(String),
}
