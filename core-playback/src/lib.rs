//! # Playback Core
//!
//! The playback half of the jukebox: the state-machine orchestrator, the
//! three playback backends (embedded player, streaming SDK, cast receiver)
//! and the router that picks between them.
//!
//! The split mirrors the runtime's bridge design: backends talk to the host
//! only through `bridge-traits`, so the whole crate runs unmodified against
//! the simulated bridges in `bridge-headless`.

pub mod backend;
pub mod cast;
pub mod embed;
pub mod error;
pub mod jukebox;
pub mod router;
pub mod streaming;
pub mod visualization;

pub use backend::{ActiveBackend, PlaybackBackend};
pub use cast::CastBackend;
pub use embed::EmbedBackend;
pub use error::{AddSongError, PlaybackError};
pub use jukebox::{AddSongRequest, Jukebox};
pub use router::PlayerRouter;
pub use streaming::StreamingBackend;
