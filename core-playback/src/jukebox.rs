//! Playback orchestrator.
//!
//! [`Jukebox`] owns the canonical [`JukeboxState`] (playlist, player
//! state, queue and history) and applies every user intent as a synchronous
//! state transition under a single mutex. Backends are driven separately by
//! the router; the orchestrator never awaits, so the lock is never held
//! across a suspension point.

use crate::error::AddSongError;
use bridge_traits::Clock;
use core_library::{
    JukeboxState, LoadedPlaylist, PlaylistStore, RepeatMode, SaveOutcome, Song, SongId,
};
use core_runtime::{EventBus, JukeboxEvent, JukeboxLimits, PlaybackEvent, PlaylistEvent};
use core_validate::{
    sanitize_required, sanitize_text, thumbnail_url, validate_album_cover_url,
    validate_youtube_url, RateLimiter, ThumbnailQuality, ValidationError, DEFAULT_MAX_LEN,
};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

/// User-submitted fields for adding a song.
///
/// Everything here is untrusted input. `add_song` validates the url,
/// sanitizes the text fields and derives the album cover itself; callers
/// never supply a cover url directly.
#[derive(Debug, Clone, Default)]
pub struct AddSongRequest {
    /// Video url or bare video id.
    pub url: String,
    /// Song title (required after trimming).
    pub title: String,
    /// Artist name (required after trimming).
    pub artist: String,
    /// Optional album name.
    pub album: Option<String>,
}

/// The playback state machine.
pub struct Jukebox {
    state: Mutex<JukeboxState>,
    bus: EventBus,
    limiter: RateLimiter,
    clock: Arc<dyn Clock>,
    limits: JukeboxLimits,
}

impl Jukebox {
    /// Builds the orchestrator around a loaded playlist.
    ///
    /// Emits [`PlaylistEvent::Loaded`]; with no subscribers yet the emission
    /// is silently dropped, which is fine for a freshly booted core.
    pub fn new(
        loaded: LoadedPlaylist,
        bus: EventBus,
        clock: Arc<dyn Clock>,
        limits: JukeboxLimits,
    ) -> Arc<Self> {
        let count = loaded.songs.len() as u64;
        let limiter = RateLimiter::with_limits(
            Arc::clone(&clock),
            limits.rate_limit_max_ops,
            limits.rate_limit_window,
        );
        let jukebox = Arc::new(Self {
            state: Mutex::new(JukeboxState::with_playlist(loaded.songs)),
            bus,
            limiter,
            clock,
            limits,
        });
        let _ = jukebox.bus.emit(JukeboxEvent::Playlist(PlaylistEvent::Loaded {
            count,
            from_defaults: loaded.from_defaults,
        }));
        jukebox
    }

    /// The song the player considers current, if any.
    pub fn current_song(&self) -> Option<Song> {
        self.state.lock().expect("jukebox state poisoned").player.current_song.clone()
    }

    /// Whether playback is logically running.
    pub fn is_playing(&self) -> bool {
        self.state.lock().expect("jukebox state poisoned").player.is_playing
    }

    /// A point-in-time copy of the full state, for rendering.
    pub fn snapshot(&self) -> JukeboxState {
        self.state.lock().expect("jukebox state poisoned").clone()
    }

    /// A copy of the playlist, for persistence.
    pub fn playlist(&self) -> Vec<Song> {
        self.state.lock().expect("jukebox state poisoned").playlist.clone()
    }

    /// Makes `song` current, marks playback running and records it in
    /// history. History is capped; the oldest entry falls off the back.
    pub fn play_song(&self, song: Song) {
        let mut state = self.state.lock().expect("jukebox state poisoned");
        state.history.push_front(song.clone());
        state.history.truncate(self.limits.history_cap);
        state.player.current_song = Some(song.clone());
        state.player.is_playing = true;
        state.player.current_time_secs = 0.0;
        state.player.duration_secs = song.duration_secs.map(f64::from).unwrap_or(0.0);
        drop(state);

        info!(song_id = %song.id, title = %song.title, "song selected");
        let _ = self.bus.emit(JukeboxEvent::Playback(PlaybackEvent::SongSelected {
            song_id: song.id.to_string(),
            title: song.title,
        }));
    }

    /// Flips play/pause. Returns the new playing flag, or `None` when no
    /// song is current (nothing to toggle).
    pub fn toggle_play(&self) -> Option<bool> {
        let (song_id, playing) = {
            let mut state = self.state.lock().expect("jukebox state poisoned");
            let song_id = state.player.current_song.as_ref()?.id;
            state.player.is_playing = !state.player.is_playing;
            (song_id, state.player.is_playing)
        };
        let event = if playing {
            PlaybackEvent::Resumed {
                song_id: song_id.to_string(),
            }
        } else {
            PlaybackEvent::Paused {
                song_id: song_id.to_string(),
            }
        };
        let _ = self.bus.emit(JukeboxEvent::Playback(event));
        Some(playing)
    }

    /// Advances to the next track: the queue's front entry when one exists,
    /// otherwise the playlist entry after the current one, wrapping at the
    /// end. A current song missing from the playlist advances to index 0.
    pub fn next_song(&self) -> Option<Song> {
        let next = {
            let mut state = self.state.lock().expect("jukebox state poisoned");
            if let Some(queued) = state.queue.pop_front() {
                Some(queued)
            } else if state.playlist.is_empty() {
                None
            } else {
                let index = self.current_index(&state).map(|i| (i + 1) % state.playlist.len());
                Some(state.playlist[index.unwrap_or(0)].clone())
            }
        }?;
        self.play_song(next.clone());
        Some(next)
    }

    /// Steps back to the previous playlist entry, wrapping at the front.
    /// The queue is not consulted; it only feeds forward skips.
    pub fn previous_song(&self) -> Option<Song> {
        let previous = {
            let state = self.state.lock().expect("jukebox state poisoned");
            if state.playlist.is_empty() {
                return None;
            }
            let len = state.playlist.len();
            let index = self.current_index(&state).map(|i| (i + len - 1) % len);
            state.playlist[index.unwrap_or(0)].clone()
        };
        self.play_song(previous.clone());
        Some(previous)
    }

    fn current_index(&self, state: &JukeboxState) -> Option<usize> {
        let current = state.player.current_song.as_ref()?.id;
        state.playlist.iter().position(|song| song.id == current)
    }

    /// Validates and appends a user-submitted song.
    ///
    /// Checks run in a fixed order (rate limit, url, text fields, cover) and
    /// any rejection leaves the playlist untouched. The album cover is
    /// derived from the validated video id, never taken from the caller, and
    /// is still checked against the trusted-host allow-list before the song
    /// enters the playlist.
    pub fn add_song(&self, request: AddSongRequest) -> Result<Song, AddSongError> {
        if !self.limiter.can_perform_operation() {
            debug!("song addition rate limited");
            return Err(AddSongError::RateLimited);
        }

        let video_id = validate_youtube_url(&request.url)?;
        let title = sanitize_required(&request.title, DEFAULT_MAX_LEN, "title")?;
        let artist = sanitize_required(&request.artist, DEFAULT_MAX_LEN, "artist")?;
        let album = request
            .album
            .as_deref()
            .map(|album| sanitize_text(album, DEFAULT_MAX_LEN))
            .filter(|album| !album.is_empty());
        let album_cover = admit_cover(thumbnail_url(&video_id, ThumbnailQuality::High))?;

        let song = Song {
            id: SongId::new(),
            title,
            artist,
            album,
            youtube_id: video_id,
            spotify_id: None,
            album_cover,
            duration_secs: None,
            added_at: self.clock.now(),
        };

        self.state
            .lock()
            .expect("jukebox state poisoned")
            .playlist
            .push(song.clone());

        info!(song_id = %song.id, title = %song.title, "song added");
        let _ = self.bus.emit(JukeboxEvent::Playlist(PlaylistEvent::SongAdded {
            song_id: song.id.to_string(),
            title: song.title.clone(),
            artist: song.artist.clone(),
        }));
        Ok(song)
    }

    /// Appends a song to the up-next queue.
    pub fn queue_song(&self, song: Song) {
        self.state
            .lock()
            .expect("jukebox state poisoned")
            .queue
            .push_back(song);
    }

    /// Sets the stored volume, clamped to `0.0..=1.0`. Returns what was
    /// stored.
    pub fn set_volume(&self, volume: f32) -> f32 {
        let clamped = volume.clamp(0.0, 1.0);
        self.state.lock().expect("jukebox state poisoned").player.volume = clamped;
        clamped
    }

    /// Flips the shuffle flag and returns the new value.
    ///
    /// The flag is stored and persisted for the ui; track advancement stays
    /// sequential regardless.
    pub fn toggle_shuffle(&self) -> bool {
        let mut state = self.state.lock().expect("jukebox state poisoned");
        state.player.shuffle = !state.player.shuffle;
        state.player.shuffle
    }

    /// Cycles repeat none -> one -> all -> none and returns the new mode.
    /// Stored for the ui, like shuffle.
    pub fn cycle_repeat(&self) -> RepeatMode {
        let mut state = self.state.lock().expect("jukebox state poisoned");
        state.player.repeat = state.player.repeat.next();
        state.player.repeat
    }

    /// Records an advisory position update from the active backend.
    pub fn report_progress(&self, position_secs: f64, duration_secs: f64) {
        let song_id = {
            let mut state = self.state.lock().expect("jukebox state poisoned");
            state.player.current_time_secs = position_secs;
            state.player.duration_secs = duration_secs;
            match state.player.current_song.as_ref() {
                Some(song) => song.id.to_string(),
                None => return,
            }
        };
        let _ = self.bus.emit(JukeboxEvent::Playback(PlaybackEvent::ProgressChanged {
            song_id,
            position_secs: position_secs.max(0.0) as u64,
            duration_secs: duration_secs.max(0.0) as u64,
        }));
    }

    /// Reacts to the current track finishing: emits the completion and
    /// advances. Returns the track that starts next, if any.
    pub fn handle_ended(&self) -> Option<Song> {
        if let Some(current) = self.current_song() {
            let _ = self.bus.emit(JukeboxEvent::Playback(PlaybackEvent::Completed {
                song_id: current.id.to_string(),
            }));
        }
        self.next_song()
    }

    /// Spawns a task that re-persists the playlist whenever a song is
    /// added. Writes are idempotent snapshots, so no debouncing is needed;
    /// save failures surface as [`PlaylistEvent::SaveFailed`] and never
    /// stop the task.
    pub fn spawn_autosave(
        self: &Arc<Self>,
        store: Arc<PlaylistStore>,
    ) -> tokio::task::JoinHandle<()> {
        let jukebox = Arc::clone(self);
        let mut events = self.bus.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(JukeboxEvent::Playlist(PlaylistEvent::SongAdded { .. })) => {
                        let snapshot = jukebox.playlist();
                        let outcome = store.save(&snapshot).await;
                        let event = match outcome {
                            SaveOutcome::Saved(count) => PlaylistEvent::Saved {
                                count: count as u64,
                            },
                            SaveOutcome::SavedDefaults => PlaylistEvent::SaveFailed {
                                message: "playlist save failed; bundled defaults persisted instead"
                                    .to_string(),
                            },
                            SaveOutcome::Failed => PlaylistEvent::SaveFailed {
                                message: "playlist could not be persisted".to_string(),
                            },
                        };
                        let _ = jukebox.bus.emit(JukeboxEvent::Playlist(event));
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "autosave missed events, saving current snapshot");
                        let snapshot = jukebox.playlist();
                        let _ = store.save(&snapshot).await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

/// Admits a derived cover URL only when its host is on the trusted
/// allow-list. The thumbnail template lands on a trusted host today, but the
/// admission check is what enforces that, not the template.
fn admit_cover(cover: String) -> Result<String, ValidationError> {
    if validate_album_cover_url(&cover) {
        Ok(cover)
    } else {
        Err(ValidationError::UntrustedCoverUrl(cover))
    }
}

impl std::fmt::Debug for Jukebox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().expect("jukebox state poisoned");
        f.debug_struct("Jukebox")
            .field("playlist_len", &state.playlist.len())
            .field("is_playing", &state.player.is_playing)
            .field("queue_len", &state.queue.len())
            .finish_non_exhaustive()
    }
}
