//! # Jukebox Core Runtime
//!
//! Shared infrastructure for the jukebox core: configuration, the event
//! bus, structured logging, and the runtime error type.
//!
//! ## Overview
//!
//! - [`config`] - `JukeboxConfig` builder with fail-fast validation of the
//!   injected host bridges and the core's tunable limits
//! - [`events`] - `EventBus` broadcast channel and the `JukeboxEvent`
//!   hierarchy every module publishes into
//! - [`logging`] - `tracing-subscriber` setup plus sensitive-field redaction
//!
//! Hosts build a [`JukeboxConfig`](config::JukeboxConfig) once at startup and
//! hand the pieces to the composition layer in `core-playback`. Everything
//! downstream of that observes state through the event bus rather than by
//! holding references into other modules.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{JukeboxConfig, JukeboxConfigBuilder, JukeboxLimits};
pub use error::{Error, Result};
pub use events::{
    AuthEvent, CastEvent, EventBus, EventSeverity, JukeboxEvent, PlaybackEvent, PlaylistEvent,
};
pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
