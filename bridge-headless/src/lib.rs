//! # Headless Bridge Implementations
//!
//! Bridge trait implementations that work without a browser or any vendor
//! SDK: an in-memory key-value store, a controllable clock, a recording
//! HTTP client, and scripted simulations of the three playback SDKs.
//!
//! ## Overview
//!
//! These are the reference hosts for the jukebox core. Integration tests
//! drive them to exercise the orchestrator and adapters end to end, and a
//! headless demo shell can run the whole core on top of them. Each
//! simulation records the commands it receives and lets the caller fire the
//! asynchronous signals a real SDK would push (ready callbacks, state
//! changes, session teardown).
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_headless::{MemoryKeyValueStore, SimulatedEmbedSdk};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryKeyValueStore::new());
//! let embed = Arc::new(SimulatedEmbedSdk::manual());
//! // ... build the core config, then later:
//! embed.fire_ready();
//! ```

mod cast;
mod clock;
mod embed;
mod http;
mod store;
mod streaming;

pub use cast::{CastCommand, SimulatedCastSdk};
pub use clock::MockClock;
pub use embed::{EmbedCommand, SimulatedEmbedSdk};
pub use http::RecordingHttpClient;
pub use store::MemoryKeyValueStore;
pub use streaming::{SimulatedStreamingSdk, StreamCommand};

// Real-time clock lives with the trait; re-exported here so a headless host
// can import everything from one place.
pub use bridge_traits::time::SystemClock;
