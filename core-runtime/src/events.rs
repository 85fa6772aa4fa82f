//! # Event Bus
//!
//! Typed broadcast channel connecting the jukebox modules. The orchestrator,
//! the backend adapters, the auth session, and the persistence task all
//! publish [`JukeboxEvent`]s; hosts subscribe to re-render, and internal
//! tasks (autosave, routing) subscribe to react.
//!
//! Built on `tokio::sync::broadcast`: many publishers via `Clone`, many
//! independent subscribers, and lag detection instead of back-pressure. A
//! subscriber that falls behind receives `RecvError::Lagged(n)` and keeps
//! going; `RecvError::Closed` means every sender is gone and the task should
//! exit.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum JukeboxEvent {
    /// Playback state transitions and backend signals
    Playback(PlaybackEvent),
    /// Playlist content changes and persistence outcomes
    Playlist(PlaylistEvent),
    /// Streaming-service authentication changes
    Auth(AuthEvent),
    /// Cast framework and receiver signals
    Cast(CastEvent),
}

impl JukeboxEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            JukeboxEvent::Playback(e) => e.description(),
            JukeboxEvent::Playlist(e) => e.description(),
            JukeboxEvent::Auth(e) => e.description(),
            JukeboxEvent::Cast(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            JukeboxEvent::Playback(PlaybackEvent::BackendError { .. }) => EventSeverity::Error,
            JukeboxEvent::Playlist(PlaylistEvent::SaveFailed { .. }) => EventSeverity::Warning,
            JukeboxEvent::Cast(CastEvent::CastFailed { .. }) => EventSeverity::Warning,
            JukeboxEvent::Playback(PlaybackEvent::SongSelected { .. }) => EventSeverity::Info,
            JukeboxEvent::Playlist(PlaylistEvent::Loaded { .. }) => EventSeverity::Info,
            JukeboxEvent::Auth(AuthEvent::TokenAcquired { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

/// Events describing playback state and backend signals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// The orchestrator made a song current and marked it playing.
    SongSelected {
        /// The selected song's id.
        song_id: String,
        /// Display title.
        title: String,
    },
    /// Playback paused (user intent or backend confirmation).
    Paused {
        /// The current song's id.
        song_id: String,
    },
    /// Playback resumed.
    Resumed {
        /// The current song's id.
        song_id: String,
    },
    /// The current track finished naturally.
    Completed {
        /// The song that finished.
        song_id: String,
    },
    /// Advisory position update for display.
    ProgressChanged {
        /// The current song's id.
        song_id: String,
        /// Position in whole seconds.
        position_secs: u64,
        /// Duration in whole seconds.
        duration_secs: u64,
    },
    /// A backend finished its asynchronous initialization.
    BackendReady {
        /// Which backend ("local", "streaming", "cast").
        backend: String,
    },
    /// A backend reported a failure.
    BackendError {
        /// Which backend.
        backend: String,
        /// Human-readable error message.
        message: String,
        /// Whether retrying may help.
        recoverable: bool,
    },
    /// Mobile autoplay policy blocked playback; a user gesture is needed.
    TapToPlayRequired {
        /// The song waiting on the gesture.
        song_id: String,
    },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::SongSelected { .. } => "Song selected for playback",
            PlaybackEvent::Paused { .. } => "Playback paused",
            PlaybackEvent::Resumed { .. } => "Playback resumed",
            PlaybackEvent::Completed { .. } => "Track completed",
            PlaybackEvent::ProgressChanged { .. } => "Playback position changed",
            PlaybackEvent::BackendReady { .. } => "Backend ready",
            PlaybackEvent::BackendError { .. } => "Backend error",
            PlaybackEvent::TapToPlayRequired { .. } => "User gesture required",
        }
    }
}

/// Events describing playlist content and persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaylistEvent {
    /// The playlist was loaded from storage (or from bundled defaults).
    Loaded {
        /// Number of songs loaded.
        count: u64,
        /// True when the bundled defaults were used.
        from_defaults: bool,
    },
    /// A song was appended through the add-song surface.
    SongAdded {
        /// The new song's id.
        song_id: String,
        /// Sanitized title.
        title: String,
        /// Sanitized artist.
        artist: String,
    },
    /// The playlist was persisted.
    Saved {
        /// Number of songs written.
        count: u64,
    },
    /// Persisting failed and the fallback path ran.
    SaveFailed {
        /// What went wrong.
        message: String,
    },
}

impl PlaylistEvent {
    fn description(&self) -> &str {
        match self {
            PlaylistEvent::Loaded { .. } => "Playlist loaded",
            PlaylistEvent::SongAdded { .. } => "Song added to playlist",
            PlaylistEvent::Saved { .. } => "Playlist saved",
            PlaylistEvent::SaveFailed { .. } => "Playlist save failed",
        }
    }
}

/// Events describing the streaming-service auth session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum AuthEvent {
    /// A token was extracted from the redirect fragment and adopted.
    TokenAcquired {
        /// Advertised lifetime, when the provider sent one.
        expires_in_secs: Option<u64>,
    },
    /// The session was cleared; re-authentication is required to stream.
    SessionCleared,
}

impl AuthEvent {
    fn description(&self) -> &str {
        match self {
            AuthEvent::TokenAcquired { .. } => "Access token acquired",
            AuthEvent::SessionCleared => "Auth session cleared",
        }
    }
}

/// Events describing the cast framework and receiver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum CastEvent {
    /// The framework's connection state changed.
    StateChanged {
        /// New state string ("CONNECTED", "NOT_CONNECTED"...).
        state: String,
    },
    /// A session was established with a device.
    SessionStarted,
    /// The receiver accepted a visualization for a song.
    CastStarted {
        /// The song being visualized.
        song_id: String,
        /// Display title.
        title: String,
    },
    /// Casting failed; local playback remains authoritative.
    CastFailed {
        /// What went wrong.
        message: String,
    },
    /// The session ended.
    SessionEnded,
}

impl CastEvent {
    fn description(&self) -> &str {
        match self {
            CastEvent::StateChanged { .. } => "Cast state changed",
            CastEvent::SessionStarted => "Cast session started",
            CastEvent::CastStarted { .. } => "Casting started",
            CastEvent::CastFailed { .. } => "Casting failed",
            CastEvent::SessionEnded => "Cast session ended",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to [`JukeboxEvent`]s.
///
/// Cloning the bus clones the sender; every `subscribe()` creates an
/// independent receiver that sees all events emitted afterwards.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<JukeboxEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received it, or an error when
    /// nobody is listening. Publishers that don't care use `.ok()`.
    pub fn emit(&self, event: JukeboxEvent) -> Result<usize, SendError<JukeboxEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<JukeboxEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
