//! Backend routing.
//!
//! [`PlayerRouter`] sits between user intents and the backends. The
//! orchestrator owns the state transition; the router decides which backend
//! receives the corresponding transport commands:
//!
//! - A live cast session takes priority: the receiver gets the song's
//!   visualization and owns the transport. A failed cast attempt falls
//!   back to plain local playback without surfacing an error.
//! - Otherwise a track carrying a streaming id plays through the streaming
//!   backend when its device is ready.
//! - Everything else plays on the embedded player.
//!
//! On mobile hosts, autoplay is blocked until the first user gesture. The
//! router parks the requested song and emits
//! [`PlaybackEvent::TapToPlayRequired`]; [`PlayerRouter::mark_user_gesture`]
//! unlocks the session and replays the parked request.

use crate::backend::{ActiveBackend, PlaybackBackend};
use crate::cast::CastBackend;
use crate::embed::EmbedBackend;
use crate::error::PlaybackError;
use crate::jukebox::Jukebox;
use crate::streaming::StreamingBackend;
use core_library::Song;
use core_runtime::{EventBus, JukeboxEvent, JukeboxLimits, PlaybackEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Routes transport commands to whichever backend should handle them.
pub struct PlayerRouter {
    jukebox: Arc<Jukebox>,
    bus: EventBus,
    local: Option<Arc<EmbedBackend>>,
    streaming: Option<Arc<StreamingBackend>>,
    cast: Option<Arc<CastBackend>>,
    mobile: bool,
    gesture_unlocked: AtomicBool,
    parked: Mutex<Option<Song>>,
    active: Mutex<ActiveBackend>,
    autoplay_retries: u32,
    autoplay_retry_delay: Duration,
}

impl PlayerRouter {
    pub fn new(jukebox: Arc<Jukebox>, bus: EventBus, limits: &JukeboxLimits) -> Self {
        Self {
            jukebox,
            bus,
            local: None,
            streaming: None,
            cast: None,
            mobile: false,
            gesture_unlocked: AtomicBool::new(true),
            parked: Mutex::new(None),
            active: Mutex::new(ActiveBackend::Local),
            autoplay_retries: limits.autoplay_retries,
            autoplay_retry_delay: limits.autoplay_retry_delay,
        }
    }

    pub fn with_local(mut self, backend: Arc<EmbedBackend>) -> Self {
        self.local = Some(backend);
        self
    }

    pub fn with_streaming(mut self, backend: Arc<StreamingBackend>) -> Self {
        self.streaming = Some(backend);
        self
    }

    pub fn with_cast(mut self, backend: Arc<CastBackend>) -> Self {
        self.cast = Some(backend);
        self
    }

    /// Marks this host as mobile. Playback stays gated behind the first
    /// user gesture.
    pub fn mobile(mut self, mobile: bool) -> Self {
        self.mobile = mobile;
        if mobile {
            self.gesture_unlocked = AtomicBool::new(false);
        }
        self
    }

    /// Which backend currently receives transport commands.
    pub fn active(&self) -> ActiveBackend {
        *self.active.lock().expect("active backend poisoned")
    }

    /// Plays a song: records the state transition, then dispatches to the
    /// chosen backend.
    pub async fn play(self: &Arc<Self>, song: Song) -> Result<(), PlaybackError> {
        if self.gate_on_gesture(&song) {
            return Ok(());
        }
        self.jukebox.play_song(song.clone());
        self.dispatch_play(song).await
    }

    /// Unlocks gated playback after the first user gesture and replays the
    /// parked song, if one was waiting. Idempotent past the first call.
    pub async fn mark_user_gesture(self: &Arc<Self>) -> Result<(), PlaybackError> {
        if self.gesture_unlocked.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let parked = self.parked.lock().expect("parked song poisoned").take();
        match parked {
            Some(song) => {
                info!(song_id = %song.id, "gesture received, starting parked song");
                self.jukebox.play_song(song.clone());
                self.dispatch_play(song).await
            }
            None => Ok(()),
        }
    }

    /// Flips play/pause and forwards it to the active backend.
    pub async fn toggle_play(&self) -> Result<(), PlaybackError> {
        let Some(playing) = self.jukebox.toggle_play() else {
            return Ok(());
        };
        match self.active() {
            ActiveBackend::Local => {
                if let Some(local) = &self.local {
                    if playing {
                        local.play().await?;
                    } else {
                        local.pause().await?;
                    }
                }
            }
            ActiveBackend::Streaming => {
                if let Some(streaming) = &self.streaming {
                    if playing {
                        streaming.play().await?;
                    } else {
                        streaming.pause().await?;
                    }
                }
            }
            ActiveBackend::Cast => {
                if let Some(cast) = &self.cast {
                    let result = if playing { cast.play().await } else { cast.pause().await };
                    if let Err(error) = result {
                        warn!(%error, "cast media command failed");
                    }
                }
            }
        }
        Ok(())
    }

    /// Skips forward and dispatches the new track.
    pub async fn next(self: &Arc<Self>) -> Result<(), PlaybackError> {
        match self.jukebox.next_song() {
            Some(song) => self.dispatch_play(song).await,
            None => Ok(()),
        }
    }

    /// Steps back and dispatches the new track.
    pub async fn previous(self: &Arc<Self>) -> Result<(), PlaybackError> {
        match self.jukebox.previous_song() {
            Some(song) => self.dispatch_play(song).await,
            None => Ok(()),
        }
    }

    /// Reacts to the current track finishing and starts whatever follows.
    pub async fn on_track_ended(self: &Arc<Self>) -> Result<(), PlaybackError> {
        match self.jukebox.handle_ended() {
            Some(song) => self.dispatch_play(song).await,
            None => Ok(()),
        }
    }

    /// Seeks within the current track on the audio backend.
    pub async fn seek(&self, position: Duration) -> Result<(), PlaybackError> {
        match self.active() {
            ActiveBackend::Streaming => {
                if let Some(streaming) = &self.streaming {
                    streaming.seek(position).await?;
                }
            }
            ActiveBackend::Local => {
                if let Some(local) = &self.local {
                    local.seek(position).await?;
                }
            }
            // The receiver's media session exposes no seek.
            ActiveBackend::Cast => {}
        }
        Ok(())
    }

    /// Stores the clamped volume and applies it to the audio backend.
    pub async fn set_volume(&self, volume: f32) -> Result<(), PlaybackError> {
        let clamped = self.jukebox.set_volume(volume);
        match self.active() {
            ActiveBackend::Streaming => {
                if let Some(streaming) = &self.streaming {
                    streaming.set_volume(clamped).await?;
                }
            }
            ActiveBackend::Local => {
                if let Some(local) = &self.local {
                    local.set_volume(clamped).await?;
                }
            }
            // Receiver volume stays under the cast device's own control.
            ActiveBackend::Cast => {}
        }
        Ok(())
    }

    /// Parks the song and signals the ui when the mobile gesture gate is
    /// still closed. Returns `true` when playback was gated.
    fn gate_on_gesture(&self, song: &Song) -> bool {
        if !self.mobile || self.gesture_unlocked.load(Ordering::Acquire) {
            return false;
        }
        debug!(song_id = %song.id, "playback gated until user gesture");
        *self.parked.lock().expect("parked song poisoned") = Some(song.clone());
        let _ = self.bus.emit(JukeboxEvent::Playback(PlaybackEvent::TapToPlayRequired {
            song_id: song.id.to_string(),
        }));
        true
    }

    /// Sends the transport commands for a freshly selected song.
    async fn dispatch_play(self: &Arc<Self>, song: Song) -> Result<(), PlaybackError> {
        // A live receiver session takes the song; failure falls back to
        // plain local playback.
        if let Some(cast) = &self.cast {
            if cast.is_connected() && cast.cast_song(&song).await {
                *self.active.lock().expect("active backend poisoned") = ActiveBackend::Cast;
                return Ok(());
            }
        }

        if let (Some(streaming), Some(_)) = (&self.streaming, song.spotify_uri()) {
            if streaming.is_ready() {
                streaming.load_track(&song).await?;
                *self.active.lock().expect("active backend poisoned") =
                    ActiveBackend::Streaming;
                return Ok(());
            }
        }

        *self.active.lock().expect("active backend poisoned") = ActiveBackend::Local;

        let Some(local) = &self.local else {
            return Err(PlaybackError::BackendNotReady { backend: "local" });
        };
        local.load_track(&song).await?;
        local.play().await?;
        self.spawn_play_retries(song);
        Ok(())
    }

    /// Retries the play command a bounded number of times. Host autoplay
    /// policies sometimes ignore the first programmatic play even after the
    /// SDK reports ready; a retry or two papers over that without looping
    /// forever.
    fn spawn_play_retries(self: &Arc<Self>, song: Song) {
        if self.autoplay_retries == 0 {
            return;
        }
        let router = Arc::clone(self);
        tokio::spawn(async move {
            for attempt in 1..=router.autoplay_retries {
                tokio::time::sleep(router.autoplay_retry_delay * attempt).await;
                let still_current = router
                    .jukebox
                    .current_song()
                    .map(|current| current.id == song.id)
                    .unwrap_or(false);
                if !still_current || !router.jukebox.is_playing() {
                    return;
                }
                if let Some(local) = &router.local {
                    if let Err(error) = local.play().await {
                        warn!(attempt, %error, "autoplay retry failed");
                    }
                }
            }
        });
    }
}

impl std::fmt::Debug for PlayerRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerRouter")
            .field("active", &self.active())
            .field("mobile", &self.mobile)
            .field("has_local", &self.local.is_some())
            .field("has_streaming", &self.streaming.is_some())
            .field("has_cast", &self.cast.is_some())
            .finish()
    }
}
