//! Validation error type.

use thiserror::Error;

/// Errors produced when external input fails a boundary check.
///
/// Every variant means "the input was rejected before touching state";
/// none of them is recoverable by retrying with the same input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Input is not one of the accepted video URL forms.
    #[error("not a recognized video URL or id: {0}")]
    InvalidVideoUrl(String),

    /// Extracted id is not 11 characters of `[A-Za-z0-9_-]`.
    #[error("invalid video id: {0}")]
    InvalidVideoId(String),

    /// A required text field was empty after trimming and sanitization.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Which field was empty ("title", "artist"...).
        field: &'static str,
    },

    /// Cover URL did not resolve to a trusted host.
    #[error("cover URL host is not trusted: {0}")]
    UntrustedCoverUrl(String),
}
