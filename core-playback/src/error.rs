//! Error types for the playback layer.

use core_validate::ValidationError;
use thiserror::Error;

/// Errors surfaced by the playback backends and the router.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The backend has not finished its asynchronous initialization.
    ///
    /// The embedded player swallows this internally by deferring the play
    /// intent; the streaming backend surfaces it loudly because issuing a
    /// web API call without a device would fail anyway.
    #[error("{backend} backend is not ready")]
    BackendNotReady {
        /// Which backend rejected the command.
        backend: &'static str,
    },

    /// The song cannot be played on the requested backend.
    #[error("track is not available on the {backend} backend: {reason}")]
    TrackUnavailable {
        backend: &'static str,
        reason: String,
    },

    /// No streaming token is held; the user must authenticate first.
    #[error("streaming session is not authenticated")]
    NotAuthenticated,

    /// The streaming web API rejected the play request.
    #[error("streaming play request failed with status {status}")]
    PlayRequestFailed { status: u16 },

    /// A platform bridge call failed.
    #[error(transparent)]
    Bridge(#[from] bridge_traits::BridgeError),
}

/// Errors returned by the add-song surface.
///
/// Rejections happen before any state mutation: a failed add leaves the
/// playlist exactly as it was.
#[derive(Debug, Error)]
pub enum AddSongError {
    /// The sliding-window rate limit for additions is exhausted.
    #[error("too many songs added recently, try again in a minute")]
    RateLimited,

    /// The submitted url or text fields failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
