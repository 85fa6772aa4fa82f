//! Embedded video player backend.
//!
//! Wraps the host's [`EmbedPlayerSdk`] bridge and papers over its two
//! awkward properties: the SDK loads asynchronously (commands issued before
//! the `Ready` callback would be lost), and load requests can resolve out of
//! order when the user skips quickly.
//!
//! A `play()` issued before the player is ready is remembered and replayed
//! once `Ready` arrives, so callers never need to poll readiness. Each
//! `load_track` bumps a monotonic sequence number; a cue that completes
//! after its load has been superseded re-cues the newer track instead of
//! leaving the stale one loaded.

use crate::backend::{ActiveBackend, PlaybackBackend};
use crate::error::PlaybackError;
use async_trait::async_trait;
use bridge_traits::{EmbedPlayerSdk, EmbedPlayerState, EmbedSdkEvent};
use core_library::{Song, SongId};
use core_runtime::{EventBus, JukeboxEvent, PlaybackEvent};
use core_validate::VideoId;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

struct EmbedInner {
    ready: bool,
    initializing: bool,
    /// A play intent recorded before the SDK was ready.
    play_when_ready: bool,
    /// Monotonic counter; each `load_track` takes the next value.
    load_seq: u64,
    /// The most recent load: its sequence number, song id and video id.
    current: Option<(u64, SongId, VideoId)>,
}

/// Local playback through the embedded player bridge.
pub struct EmbedBackend {
    sdk: Arc<dyn EmbedPlayerSdk>,
    bus: EventBus,
    inner: Mutex<EmbedInner>,
}

impl EmbedBackend {
    pub fn new(sdk: Arc<dyn EmbedPlayerSdk>, bus: EventBus) -> Arc<Self> {
        Arc::new(Self {
            sdk,
            bus,
            inner: Mutex::new(EmbedInner {
                ready: false,
                initializing: false,
                play_when_ready: false,
                load_seq: 0,
                current: None,
            }),
        })
    }

    /// Loads the underlying SDK and starts the event pump.
    ///
    /// Idempotent: concurrent and repeated calls collapse into a single
    /// SDK load.
    pub async fn initialize(self: &Arc<Self>) -> Result<(), PlaybackError> {
        {
            let mut inner = self.inner.lock().expect("embed state poisoned");
            if inner.ready || inner.initializing {
                return Ok(());
            }
            inner.initializing = true;
        }
        let mut events = self.sdk.subscribe();
        self.sdk.ensure_loaded().await?;

        let backend = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => backend.handle_sdk_event(event).await,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "embed event stream lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        Ok(())
    }

    /// The song currently loaded (or pending load), if any.
    pub fn current_song_id(&self) -> Option<SongId> {
        self.inner
            .lock()
            .expect("embed state poisoned")
            .current
            .as_ref()
            .map(|(_, id, _)| *id)
    }

    async fn handle_sdk_event(&self, event: EmbedSdkEvent) {
        match event {
            EmbedSdkEvent::Ready => self.on_ready().await,
            EmbedSdkEvent::StateChanged(state) => self.on_state(state),
            EmbedSdkEvent::Error { code } => {
                let _ = self.bus.emit(JukeboxEvent::Playback(PlaybackEvent::BackendError {
                    backend: "local".to_string(),
                    message: format!("embedded player reported error code {code}"),
                    recoverable: false,
                }));
            }
        }
    }

    /// Flushes the deferred cue and play intent once the SDK comes up.
    ///
    /// Reads the *latest* recorded load at this moment, so a track selected
    /// while the SDK was still loading wins over any earlier selection.
    async fn on_ready(&self) {
        let (pending_video, pending_play) = {
            let mut inner = self.inner.lock().expect("embed state poisoned");
            inner.ready = true;
            inner.initializing = false;
            let video = inner.current.as_ref().map(|(_, _, v)| v.clone());
            let play = std::mem::take(&mut inner.play_when_ready);
            (video, play)
        };
        let _ = self.bus.emit(JukeboxEvent::Playback(PlaybackEvent::BackendReady {
            backend: "local".to_string(),
        }));
        if let Some(video) = pending_video {
            if let Err(error) = self.sdk.cue_video(video.as_str()).await {
                warn!(%error, "deferred cue failed");
                return;
            }
            if pending_play {
                if let Err(error) = self.sdk.play().await {
                    warn!(%error, "deferred play failed");
                }
            }
        }
    }

    fn on_state(&self, state: EmbedPlayerState) {
        let song_id = match self
            .inner
            .lock()
            .expect("embed state poisoned")
            .current
            .as_ref()
        {
            Some((_, id, _)) => id.to_string(),
            None => {
                debug!(?state, "player state change with no track loaded");
                return;
            }
        };
        let event = match state {
            EmbedPlayerState::Playing => PlaybackEvent::Resumed { song_id },
            EmbedPlayerState::Paused => PlaybackEvent::Paused { song_id },
            EmbedPlayerState::Ended => PlaybackEvent::Completed { song_id },
            EmbedPlayerState::Unstarted
            | EmbedPlayerState::Buffering
            | EmbedPlayerState::Cued => return,
        };
        let _ = self.bus.emit(JukeboxEvent::Playback(event));
    }
}

#[async_trait]
impl PlaybackBackend for EmbedBackend {
    fn kind(&self) -> ActiveBackend {
        ActiveBackend::Local
    }

    fn is_ready(&self) -> bool {
        self.inner.lock().expect("embed state poisoned").ready
    }

    async fn load_track(&self, song: &Song) -> Result<(), PlaybackError> {
        let (seq, ready) = {
            let mut inner = self.inner.lock().expect("embed state poisoned");
            inner.load_seq += 1;
            let seq = inner.load_seq;
            inner.current = Some((seq, song.id, song.youtube_id.clone()));
            (seq, inner.ready)
        };
        if !ready {
            // Cued once the SDK reports ready.
            return Ok(());
        }
        // A slow cue can complete after a newer load has been recorded,
        // leaving the SDK on the stale track. Re-cue until the cue that
        // landed last matches the latest recorded load.
        let mut cued_seq = seq;
        let mut video = song.youtube_id.clone();
        loop {
            self.sdk.cue_video(video.as_str()).await?;
            let latest = {
                let inner = self.inner.lock().expect("embed state poisoned");
                inner.current.clone()
            };
            match latest {
                Some((latest_seq, _, latest_video)) if latest_seq != cued_seq => {
                    debug!(
                        cued = cued_seq,
                        latest = latest_seq,
                        "load superseded while cueing, re-cueing the newer track"
                    );
                    cued_seq = latest_seq;
                    video = latest_video;
                }
                _ => break,
            }
        }
        Ok(())
    }

    async fn play(&self) -> Result<(), PlaybackError> {
        {
            let mut inner = self.inner.lock().expect("embed state poisoned");
            if !inner.ready {
                inner.play_when_ready = true;
                return Ok(());
            }
        }
        Ok(self.sdk.play().await?)
    }

    async fn pause(&self) -> Result<(), PlaybackError> {
        {
            let mut inner = self.inner.lock().expect("embed state poisoned");
            if !inner.ready {
                inner.play_when_ready = false;
                return Ok(());
            }
        }
        Ok(self.sdk.pause().await?)
    }

    async fn seek(&self, position: std::time::Duration) -> Result<(), PlaybackError> {
        if !self.is_ready() {
            return Err(PlaybackError::BackendNotReady { backend: "local" });
        }
        Ok(self.sdk.seek(position).await?)
    }

    async fn set_volume(&self, volume: f32) -> Result<(), PlaybackError> {
        if !self.is_ready() {
            return Err(PlaybackError::BackendNotReady { backend: "local" });
        }
        Ok(self.sdk.set_volume(volume.clamp(0.0, 1.0)).await?)
    }
}

impl std::fmt::Debug for EmbedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock().expect("embed state poisoned");
        f.debug_struct("EmbedBackend")
            .field("ready", &inner.ready)
            .field("load_seq", &inner.load_seq)
            .finish_non_exhaustive()
    }
}
