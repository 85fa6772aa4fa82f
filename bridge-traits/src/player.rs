//! Playback SDK surfaces for the two local audio backends.
//!
//! These traits model exactly the contract the core needs from the embedded
//! video player and the streaming playback SDK, not the full vendor APIs.
//! Both runtimes initialize asynchronously and push state through callbacks;
//! hosts translate those callbacks into broadcast events here.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::Result;

/// Player states reported by the embedded video SDK.
///
/// Mirrors the iframe API's numeric state codes (-1, 0, 1, 2, 3, 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedPlayerState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

/// Events emitted by an [`EmbedPlayerSdk`] host.
#[derive(Debug, Clone)]
pub enum EmbedSdkEvent {
    /// The SDK script finished loading and the player is usable.
    ///
    /// Fired exactly once per page lifetime; hosts must register the
    /// underlying global ready hook only once no matter how many times
    /// loading is requested.
    Ready,
    /// The player moved to a new state.
    StateChanged(EmbedPlayerState),
    /// The player reported an error code (bad video id, embed forbidden...).
    Error { code: i32 },
}

/// Embedded video player surface.
///
/// The SDK script loads asynchronously and possibly after the core is
/// constructed. Commands issued before [`EmbedSdkEvent::Ready`] has fired are
/// host errors; the core's adapter defers them itself.
#[async_trait]
pub trait EmbedPlayerSdk: Send + Sync {
    /// Request the SDK script. Idempotent; completion is signaled by the
    /// `Ready` event on the subscription channel, not by this call returning.
    async fn ensure_loaded(&self) -> Result<()>;

    /// Load a video by its validated 11-character id without starting it.
    async fn cue_video(&self, video_id: &str) -> Result<()>;

    /// Start or resume playback of the cued video.
    async fn play(&self) -> Result<()>;

    /// Pause playback.
    async fn pause(&self) -> Result<()>;

    /// Seek to an absolute position.
    async fn seek(&self, position: Duration) -> Result<()>;

    /// Set volume, normalized to `0.0..=1.0`.
    async fn set_volume(&self, volume: f32) -> Result<()>;

    /// Subscribe to player events.
    fn subscribe(&self) -> broadcast::Receiver<EmbedSdkEvent>;
}

/// Events emitted by a [`StreamingPlayerSdk`] host.
#[derive(Debug, Clone)]
pub enum StreamingSdkEvent {
    /// The SDK registered a playback device. This is the readiness signal;
    /// nothing can play before a device id exists.
    Ready { device_id: String },
    /// The device went away (token expired, transfer elsewhere).
    NotReady { device_id: String },
    /// Playback state pushed by the SDK.
    StateChanged { paused: bool, position_ms: u64 },
    /// The SDK failed to initialize at all.
    InitializationError { message: String },
    /// The supplied token was rejected.
    AuthenticationError { message: String },
    /// A track failed to play.
    PlaybackError { message: String },
}

/// Streaming playback SDK surface.
///
/// The token is supplied per connection and never stored by the core beyond
/// the in-memory auth session; losing it means reconnecting.
#[async_trait]
pub trait StreamingPlayerSdk: Send + Sync {
    /// Load the SDK if needed and connect a player with the given token.
    /// Readiness arrives later as [`StreamingSdkEvent::Ready`].
    async fn connect(&self, access_token: &str) -> Result<()>;

    /// Pause playback on the local device.
    async fn pause(&self) -> Result<()>;

    /// Resume playback on the local device.
    async fn resume(&self) -> Result<()>;

    /// Seek to an absolute position.
    async fn seek(&self, position: Duration) -> Result<()>;

    /// Set volume, normalized to `0.0..=1.0`.
    async fn set_volume(&self, volume: f32) -> Result<()>;

    /// Disconnect the player and drop the device registration.
    async fn disconnect(&self) -> Result<()>;

    /// Subscribe to player events.
    fn subscribe(&self) -> broadcast::Receiver<StreamingSdkEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_state_is_copy() {
        let state = EmbedPlayerState::Playing;
        let copied = state;
        assert_eq!(state, copied);
    }

    #[test]
    fn streaming_events_clone() {
        let event = StreamingSdkEvent::Ready {
            device_id: "device-1".to_string(),
        };
        let cloned = event.clone();
        assert!(matches!(cloned, StreamingSdkEvent::Ready { device_id } if device_id == "device-1"));
    }
}
