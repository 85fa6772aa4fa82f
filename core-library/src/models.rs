//! # Data Model
//!
//! Core types for the jukebox: [`Song`], [`PlayerState`], and the aggregate
//! [`JukeboxState`] the orchestrator owns.
//!
//! `Song` serializes with camelCase field names because that is the shape of
//! the persisted playlist blob; the video id and cover URL inside it are
//! validated newtype/boundary-checked values, so a deserialized `Song`
//! carries the same guarantees as one built through the add-song path.

use chrono::{DateTime, Utc};
use core_validate::VideoId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use uuid::Uuid;

/// Maximum number of entries retained in playback history.
pub const HISTORY_CAP: usize = 50;

/// Unique, collision-resistant song identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(Uuid);

impl SongId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps a known id (bundled defaults, tests).
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for SongId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An immutable playlist entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Unique id, generated at creation.
    pub id: SongId,
    /// Sanitized display title.
    pub title: String,
    /// Sanitized artist name.
    pub artist: String,
    /// Optional sanitized album name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Validated 11-character video id.
    pub youtube_id: VideoId,
    /// Optional streaming-service track id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify_id: Option<String>,
    /// Cover-art URL; must resolve to a trusted host.
    pub album_cover: String,
    /// Track length in seconds, when known.
    #[serde(
        rename = "duration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_secs: Option<u32>,
    /// When the song entered the playlist.
    pub added_at: DateTime<Utc>,
}

impl Song {
    /// The streaming-service playback URI, when a track id is present.
    pub fn spotify_uri(&self) -> Option<String> {
        self.spotify_id
            .as_ref()
            .map(|id| format!("spotify:track:{id}"))
    }
}

/// Repeat behavior flag.
///
/// Stored and surfaced but not consulted by the advance logic; the product
/// has reserved these semantics without defining them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    None,
    One,
    All,
}

impl RepeatMode {
    /// The next mode in the none → one → all → none cycle.
    pub fn next(self) -> Self {
        match self {
            RepeatMode::None => RepeatMode::One,
            RepeatMode::One => RepeatMode::All,
            RepeatMode::All => RepeatMode::None,
        }
    }
}

/// The single live playback-state instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// Currently selected song, one of the playlist's entries.
    pub current_song: Option<Song>,
    /// Whether playback is intended to be running.
    /// Invariant: true implies `current_song` is some.
    pub is_playing: bool,
    /// Volume, clamped to 0.0..=1.0.
    pub volume: f32,
    /// Shuffle flag (stored, not consulted by advance logic).
    pub shuffle: bool,
    /// Repeat mode (stored, not consulted by advance logic).
    pub repeat: RepeatMode,
    /// Advisory playback position, display only.
    pub current_time_secs: f64,
    /// Advisory track duration, display only.
    pub duration_secs: f64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            current_song: None,
            is_playing: false,
            volume: 0.8,
            shuffle: false,
            repeat: RepeatMode::None,
            current_time_secs: 0.0,
            duration_secs: 0.0,
        }
    }
}

/// Aggregate root owned by the orchestrator.
///
/// Only the playlist persists; queue and history are transient and reset on
/// restart.
#[derive(Debug, Clone, Default)]
pub struct JukeboxState {
    /// Ordered playlist, append-only from the action surface.
    pub playlist: Vec<Song>,
    /// Live player state.
    pub player: PlayerState,
    /// Songs awaiting playback; the front outranks playlist order.
    pub queue: VecDeque<Song>,
    /// Previously played songs, most-recent first, capped at [`HISTORY_CAP`].
    pub history: VecDeque<Song>,
}

impl JukeboxState {
    /// Builds the startup state around a loaded playlist.
    pub fn with_playlist(playlist: Vec<Song>) -> Self {
        Self {
            playlist,
            ..Self::default()
        }
    }
}
