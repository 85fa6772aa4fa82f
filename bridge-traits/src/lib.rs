//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host shell.
//!
//! ## Overview
//!
//! This crate defines the contract between the jukebox core and the
//! environment it runs in. The core never touches a browser API, an SDK
//! script, or durable storage directly; every such capability is a trait a
//! host provides. A web shell backs these traits with the real SDKs, while
//! tests and headless hosts use the simulations in `bridge-headless`.
//!
//! ## Traits
//!
//! ### Storage & utilities
//! - [`KeyValueStore`](storage::KeyValueStore) - String key-value persistence
//!   (browser local storage, a settings file, or memory)
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`HttpClient`](http::HttpClient) - Minimal request surface for the
//!   streaming service's Web API
//!
//! ### Playback SDK surfaces
//! - [`EmbedPlayerSdk`](player::EmbedPlayerSdk) - Embedded video iframe player
//! - [`StreamingPlayerSdk`](player::StreamingPlayerSdk) - OAuth-token-bearing
//!   streaming playback SDK
//! - [`CastSdk`](cast::CastSdk) - Session-based remote-rendering receiver
//!
//! Each SDK surface couples an async initialization path with an event
//! subscription (`tokio::sync::broadcast`), because the underlying runtimes
//! signal readiness and playback transitions through callbacks, not return
//! values.
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Host
//! implementations should convert platform failures into it with enough
//! context to act on (which SDK, which storage key, which status).
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync`; hosts may be driven from any
//! async task.

pub mod cast;
pub mod error;
pub mod http;
pub mod player;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use cast::{CastMediaRequest, CastSdk, CastSdkEvent, CastState};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use player::{
    EmbedPlayerSdk, EmbedPlayerState, EmbedSdkEvent, StreamingPlayerSdk, StreamingSdkEvent,
};
pub use storage::KeyValueStore;
pub use time::{Clock, SystemClock};
