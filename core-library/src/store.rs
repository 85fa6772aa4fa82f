//! # Playlist Persistence
//!
//! Loads and saves the playlist through the host's [`KeyValueStore`],
//! re-validating every entry on the way in and bounding size on the way out.
//!
//! Failure policy, in order of preference: recover with the bundled
//! defaults, clear corruption so the next load starts clean, fall back to
//! persisting just the defaults when a write fails, and finally swallow
//! (with a warning) when even that fails. No path out of this module throws
//! at the playback layer.

use crate::defaults::default_playlist;
use crate::models::Song;
use bridge_traits::KeyValueStore;
use core_validate::validate_album_cover_url;
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage key holding the serialized playlist array.
pub const PLAYLIST_KEY: &str = "jukebox.playlist.v1";

/// Hard cap on persisted entries.
pub const MAX_PERSISTED_ENTRIES: usize = 100;

/// Result of a [`PlaylistStore::load`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPlaylist {
    /// The playlist to start with; never empty.
    pub songs: Vec<Song>,
    /// True when the bundled defaults were substituted.
    pub from_defaults: bool,
}

/// Result of a [`PlaylistStore::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The playlist was written; carries the persisted entry count.
    Saved(usize),
    /// The playlist write failed but the default playlist was persisted.
    SavedDefaults,
    /// Both writes failed; the error was logged and swallowed.
    Failed,
}

/// Best-effort playlist persistence over a key-value bridge.
pub struct PlaylistStore {
    store: Arc<dyn KeyValueStore>,
    max_entries: usize,
}

impl PlaylistStore {
    /// Creates a store with the standard 100-entry cap.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_max_entries(store, MAX_PERSISTED_ENTRIES)
    }

    /// Creates a store with an explicit entry cap (tests, embedders).
    pub fn with_max_entries(store: Arc<dyn KeyValueStore>, max_entries: usize) -> Self {
        Self { store, max_entries }
    }

    /// Loads the persisted playlist, falling back to the bundled defaults.
    ///
    /// Every entry is re-validated: field shapes via deserialization (which
    /// re-checks the video id) and the cover URL against the trusted-host
    /// allow-list. Entries that fail are dropped individually; a blob that
    /// fails to parse at all is cleared so the corruption is not retried
    /// forever.
    pub async fn load(&self) -> LoadedPlaylist {
        let raw = match self.store.get(PLAYLIST_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no persisted playlist, using defaults");
                return self.defaults();
            }
            Err(err) => {
                warn!(error = %err, "playlist read failed, using defaults");
                return self.defaults();
            }
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(serde_json::Value::Array(entries)) => entries,
            Ok(_) => {
                warn!("persisted playlist is not an array, using defaults");
                return self.defaults();
            }
            Err(err) => {
                warn!(error = %err, "persisted playlist is corrupt, clearing it");
                if let Err(err) = self.store.remove(PLAYLIST_KEY).await {
                    warn!(error = %err, "failed to clear corrupt playlist blob");
                }
                return self.defaults();
            }
        };

        let total = entries.len();
        let songs: Vec<Song> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Song>(entry) {
                Ok(song) if validate_album_cover_url(&song.album_cover) => Some(song),
                Ok(song) => {
                    warn!(song_id = %song.id, "dropping entry with untrusted cover URL");
                    None
                }
                Err(err) => {
                    warn!(error = %err, "dropping malformed playlist entry");
                    None
                }
            })
            .collect();

        if songs.is_empty() {
            warn!(total, "no persisted entries survived validation, using defaults");
            return self.defaults();
        }

        debug!(kept = songs.len(), total, "playlist loaded");
        LoadedPlaylist {
            songs,
            from_defaults: false,
        }
    }

    /// Persists the playlist, capped to the newest `max_entries` entries.
    ///
    /// On write failure falls back to persisting the default playlist; a
    /// failure of the fallback is logged and swallowed. Safe to call on
    /// every playlist change.
    pub async fn save(&self, playlist: &[Song]) -> SaveOutcome {
        let capped = if playlist.len() > self.max_entries {
            &playlist[playlist.len() - self.max_entries..]
        } else {
            playlist
        };

        match self.write(capped).await {
            Ok(()) => SaveOutcome::Saved(capped.len()),
            Err(err) => {
                warn!(error = %err, "playlist save failed, falling back to defaults");
                match self.write(&default_playlist()).await {
                    Ok(()) => SaveOutcome::SavedDefaults,
                    Err(err) => {
                        warn!(error = %err, "fallback playlist save failed");
                        SaveOutcome::Failed
                    }
                }
            }
        }
    }

    async fn write(&self, songs: &[Song]) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let blob = serde_json::to_string(songs)?;
        self.store.set(PLAYLIST_KEY, &blob).await?;
        Ok(())
    }

    fn defaults(&self) -> LoadedPlaylist {
        LoadedPlaylist {
            songs: default_playlist(),
            from_defaults: true,
        }
    }
}

impl std::fmt::Debug for PlaylistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaylistStore")
            .field("key", &PLAYLIST_KEY)
            .field("max_entries", &self.max_entries)
            .finish()
    }
}
