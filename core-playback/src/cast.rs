//! Cast backend.
//!
//! Casting hands the receiver a visualization page rather than a raw media
//! stream, so this backend does not implement the transport trait. Its
//! main surface is a single best-effort operation: [`CastBackend::cast_song`]
//! returns `true` when the receiver accepted the load and `false` on any
//! failure, letting the router fall back to local playback without
//! propagating an error through the play path.

use crate::error::PlaybackError;
use crate::visualization;
use bridge_traits::{CastSdk, CastSdkEvent, CastState};
use core_library::Song;
use core_runtime::{CastEvent, EventBus, JukeboxEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

/// Receiver visualization through the cast framework bridge.
pub struct CastBackend {
    sdk: Arc<dyn CastSdk>,
    bus: EventBus,
    initialized: AtomicBool,
    /// Whether the framework reported at least one reachable device.
    available: AtomicBool,
}

impl CastBackend {
    pub fn new(sdk: Arc<dyn CastSdk>, bus: EventBus) -> Arc<Self> {
        Arc::new(Self {
            sdk,
            bus,
            initialized: AtomicBool::new(false),
            available: AtomicBool::new(false),
        })
    }

    /// Initializes the framework once and starts the event pump.
    ///
    /// Returns whether any cast devices are available. Repeated calls skip
    /// the SDK round-trip and return the cached availability.
    pub async fn initialize(self: &Arc<Self>) -> Result<bool, PlaybackError> {
        if self.initialized.load(Ordering::Acquire) {
            return Ok(self.available.load(Ordering::Acquire));
        }
        let mut events = self.sdk.subscribe();
        let available = self.sdk.initialize().await?;
        self.available.store(available, Ordering::Release);
        self.initialized.store(true, Ordering::Release);

        let backend = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => backend.handle_sdk_event(event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "cast event stream lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        Ok(available)
    }

    fn handle_sdk_event(&self, event: CastSdkEvent) {
        match event {
            CastSdkEvent::StateChanged(state) => {
                self.available
                    .store(state != CastState::NoDevicesAvailable, Ordering::Release);
                let emitted = match state {
                    CastState::Connected => CastEvent::SessionStarted,
                    _ => CastEvent::StateChanged {
                        state: state.as_str().to_string(),
                    },
                };
                let _ = self.bus.emit(JukeboxEvent::Cast(emitted));
            }
            CastSdkEvent::SessionEnded => {
                let _ = self.bus.emit(JukeboxEvent::Cast(CastEvent::SessionEnded));
            }
        }
    }

    /// Whether a receiver session is live right now.
    pub fn is_connected(&self) -> bool {
        self.initialized.load(Ordering::Acquire) && self.sdk.has_session()
    }

    /// Sends a song's visualization to the receiver.
    ///
    /// Best effort: initialization, session establishment and the
    /// media load can each fail, and every failure path emits a
    /// [`CastEvent::CastFailed`] and returns `false` so the caller keeps
    /// playing locally.
    pub async fn cast_song(self: &Arc<Self>, song: &Song) -> bool {
        match self.initialize().await {
            Ok(true) => {}
            Ok(false) => {
                self.fail("no cast devices available");
                return false;
            }
            Err(error) => {
                self.fail(&format!("cast framework failed to initialize: {error}"));
                return false;
            }
        }

        if !self.sdk.has_session() {
            if let Err(error) = self.sdk.request_session().await {
                self.fail(&format!("cast session request failed: {error}"));
                return false;
            }
        }

        let request = visualization::media_request_for(song);
        if let Err(error) = self.sdk.load_media(request).await {
            self.fail(&format!("receiver rejected media load: {error}"));
            return false;
        }

        info!(song_id = %song.id, title = %song.title, "casting visualization");
        let _ = self.bus.emit(JukeboxEvent::Cast(CastEvent::CastStarted {
            song_id: song.id.to_string(),
            title: song.title.clone(),
        }));
        true
    }

    /// Resumes the receiver's media session.
    pub async fn play(&self) -> Result<(), PlaybackError> {
        Ok(self.sdk.media_play().await?)
    }

    /// Pauses the receiver's media session.
    pub async fn pause(&self) -> Result<(), PlaybackError> {
        Ok(self.sdk.media_pause().await?)
    }

    /// Tears down the receiver session.
    pub async fn end_session(&self) -> Result<(), PlaybackError> {
        Ok(self.sdk.end_session().await?)
    }

    fn fail(&self, message: &str) {
        warn!(message, "cast attempt failed");
        let _ = self.bus.emit(JukeboxEvent::Cast(CastEvent::CastFailed {
            message: message.to_string(),
        }));
    }
}

impl std::fmt::Debug for CastBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CastBackend")
            .field("initialized", &self.initialized.load(Ordering::Acquire))
            .field("available", &self.available.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}
