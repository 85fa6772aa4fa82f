//! # Jukebox Library
//!
//! The data model (songs, player state, the aggregate jukebox state), the
//! bundled default playlist, and the persistence adapter that keeps the
//! playlist in the host's key-value store.
//!
//! Persistence here is deliberately best-effort: a corrupt blob falls back
//! to the bundled defaults and clears itself, a failed write retries with
//! the defaults and is otherwise swallowed. Nothing in this crate may ever
//! take playback down with it.

pub mod defaults;
pub mod models;
pub mod store;

pub use defaults::default_playlist;
pub use models::{JukeboxState, PlayerState, RepeatMode, Song, SongId, HISTORY_CAP};
pub use store::{LoadedPlaylist, PlaylistStore, SaveOutcome, PLAYLIST_KEY};
