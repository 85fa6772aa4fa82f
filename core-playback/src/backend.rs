//! Common surface implemented by every playback backend.

use crate::error::PlaybackError;
use async_trait::async_trait;
use core_library::Song;
use std::time::Duration;

/// Identifies which backend is driving the audio right now.
///
/// Exactly one backend is authoritative at any time; the router switches
/// between them based on cast connectivity and track availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveBackend {
    /// The embedded video player.
    Local,
    /// The streaming SDK playing through the web API.
    Streaming,
    /// A cast receiver showing the visualization page.
    Cast,
}

impl ActiveBackend {
    /// Stable label used in events and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveBackend::Local => "local",
            ActiveBackend::Streaming => "streaming",
            ActiveBackend::Cast => "cast",
        }
    }
}

/// Transport-level commands shared by the local and streaming backends.
///
/// Casting does not fit this shape (it is fire-and-forget with a boolean
/// outcome), so the cast backend exposes its own surface instead.
#[async_trait]
pub trait PlaybackBackend: Send + Sync {
    /// Which backend this is, for routing and event labels.
    fn kind(&self) -> ActiveBackend;

    /// Whether the backend has completed initialization and can accept
    /// transport commands.
    fn is_ready(&self) -> bool;

    /// Makes the given song the backend's current track.
    async fn load_track(&self, song: &Song) -> Result<(), PlaybackError>;

    /// Starts or resumes playback of the loaded track.
    async fn play(&self) -> Result<(), PlaybackError>;

    /// Pauses playback.
    async fn pause(&self) -> Result<(), PlaybackError>;

    /// Seeks to the given position in the current track.
    async fn seek(&self, position: Duration) -> Result<(), PlaybackError>;

    /// Sets the output volume. Values are clamped to `0.0..=1.0`.
    async fn set_volume(&self, volume: f32) -> Result<(), PlaybackError>;
}
