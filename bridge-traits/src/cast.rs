//! Cast receiver SDK surface.
//!
//! Models a session-based remote-rendering framework: initialize once,
//! negotiate a session with a device, then load media into the receiver.
//! The framework pushes connection-state changes; the core subscribes to
//! them instead of polling.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::Result;

/// Connection state of the cast framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastState {
    /// No castable devices on the network.
    NoDevicesAvailable,
    /// Devices exist but no session is active.
    NotConnected,
    /// Session negotiation in progress.
    Connecting,
    /// An active session is rendering our media.
    Connected,
}

impl CastState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CastState::NoDevicesAvailable => "NO_DEVICES_AVAILABLE",
            CastState::NotConnected => "NOT_CONNECTED",
            CastState::Connecting => "CONNECTING",
            CastState::Connected => "CONNECTED",
        }
    }
}

/// Events pushed by the cast framework.
#[derive(Debug, Clone)]
pub enum CastSdkEvent {
    /// The framework's connection state changed.
    StateChanged(CastState),
    /// The active session ended (receiver stopped, user disconnected).
    SessionEnded,
}

/// Media payload for the receiver.
///
/// The jukebox never sends raw audio to the receiver; it sends a
/// self-contained visualization document while audio stays local.
#[derive(Debug, Clone)]
pub struct CastMediaRequest {
    /// URL of the content to render (typically a `data:` URL).
    pub content_url: String,
    /// MIME type of the content.
    pub content_type: String,
    /// Title shown in the receiver's media metadata.
    pub title: String,
    /// Subtitle (artist) shown in the receiver's media metadata.
    pub subtitle: String,
    /// Artwork for the media metadata.
    pub image_url: Option<String>,
    /// Start rendering immediately.
    pub autoplay: bool,
}

/// Cast framework surface.
#[async_trait]
pub trait CastSdk: Send + Sync {
    /// Initialize the framework. Returns `Ok(false)` when the cast runtime
    /// is not available on this host (no script, unsupported browser);
    /// that is an answer, not an error.
    async fn initialize(&self) -> Result<bool>;

    /// Current connection state.
    fn cast_state(&self) -> CastState;

    /// Whether an active session exists right now.
    fn has_session(&self) -> bool;

    /// Prompt for / establish a session with a device.
    async fn request_session(&self) -> Result<()>;

    /// Load media into the active session's receiver.
    async fn load_media(&self, request: CastMediaRequest) -> Result<()>;

    /// Resume the receiver's media.
    async fn media_play(&self) -> Result<()>;

    /// Pause the receiver's media.
    async fn media_pause(&self) -> Result<()>;

    /// Tear down the active session.
    async fn end_session(&self) -> Result<()>;

    /// Subscribe to framework events.
    fn subscribe(&self) -> broadcast::Receiver<CastSdkEvent>;
}
