//! # Jukebox Configuration Module
//!
//! Provides configuration management for the jukebox core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `JukeboxConfig` instance holding the platform bridges and tuning knobs the
//! core needs. It enforces fail-fast validation so a missing required bridge
//! surfaces at startup with an actionable message, not as a runtime panic
//! mid-playback.
//!
//! ## Required Dependencies
//!
//! - `KeyValueStore` - Required for playlist persistence
//!
//! ## Optional Dependencies
//!
//! - `Clock` - Time source (default: `SystemClock` equivalent supplied by the
//!   host; the builder requires one only so tests can inject a mock)
//! - `HttpClient` - Web API calls for the streaming backend
//! - `EmbedPlayerSdk` - Embedded video player host hooks
//! - `StreamingPlayerSdk` - Streaming playback SDK host hooks
//! - `CastSdk` - Cast framework host hooks
//!
//! Backends whose SDK bridge is absent are simply not constructed; the core
//! degrades to whatever bridges the host supplied.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::JukeboxConfig;
//! use std::sync::Arc;
//!
//! let config = JukeboxConfig::builder()
//!     .key_value_store(Arc::new(MyLocalStorage))
//!     .embed_sdk(Arc::new(MyEmbedSdk))
//!     .mobile(false)
//!     .build()
//!     .expect("Failed to build config");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{CastSdk, Clock, EmbedPlayerSdk, HttpClient, KeyValueStore, StreamingPlayerSdk};
use std::sync::Arc;
use std::time::Duration;

/// Tuning limits for playlist size, history, rate limiting, and retries.
///
/// The defaults match the intended product behavior; hosts rarely need to
/// override them outside of tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JukeboxLimits {
    /// Maximum number of songs kept when persisting the playlist.
    /// Saves keep the newest entries when over the cap.
    pub max_playlist_entries: usize,

    /// Maximum number of song ids retained in playback history.
    pub history_cap: usize,

    /// Maximum mutating operations allowed per rate-limit window.
    pub rate_limit_max_ops: usize,

    /// Sliding rate-limit window length.
    pub rate_limit_window: Duration,

    /// Bounded retries when a backend rejects an autoplay attempt.
    pub autoplay_retries: u32,

    /// Delay between autoplay retry attempts.
    pub autoplay_retry_delay: Duration,
}

impl Default for JukeboxLimits {
    fn default() -> Self {
        Self {
            max_playlist_entries: 100,
            history_cap: 50,
            rate_limit_max_ops: 10,
            rate_limit_window: Duration::from_secs(60),
            autoplay_retries: 2,
            autoplay_retry_delay: Duration::from_millis(1000),
        }
    }
}

impl JukeboxLimits {
    /// Validates the limits and returns an error if inconsistent.
    pub fn validate(&self) -> Result<()> {
        if self.max_playlist_entries == 0 {
            return Err(Error::Config(
                "max_playlist_entries must be greater than 0".to_string(),
            ));
        }
        if self.rate_limit_max_ops == 0 {
            return Err(Error::Config(
                "rate_limit_max_ops must be greater than 0".to_string(),
            ));
        }
        if self.rate_limit_window.is_zero() {
            return Err(Error::Config(
                "rate_limit_window must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Core configuration for the jukebox.
///
/// Holds the platform bridges and settings required to assemble the
/// orchestrator and backends. Use [`JukeboxConfigBuilder`] to construct
/// instances.
#[derive(Clone)]
pub struct JukeboxConfig {
    /// Playlist persistence backend (required)
    pub key_value_store: Arc<dyn KeyValueStore>,

    /// Time source for rate limiting and timestamps (required; tests inject
    /// a mock, hosts inject a system clock)
    pub clock: Arc<dyn Clock>,

    /// HTTP client for streaming Web API calls (optional)
    pub http_client: Option<Arc<dyn HttpClient>>,

    /// Embedded video player SDK (optional)
    pub embed_sdk: Option<Arc<dyn EmbedPlayerSdk>>,

    /// Streaming playback SDK (optional)
    pub streaming_sdk: Option<Arc<dyn StreamingPlayerSdk>>,

    /// Cast framework SDK (optional)
    pub cast_sdk: Option<Arc<dyn CastSdk>>,

    /// Whether the host environment enforces gesture-gated autoplay.
    pub mobile: bool,

    /// Tuning limits.
    pub limits: JukeboxLimits,
}

impl std::fmt::Debug for JukeboxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JukeboxConfig")
            .field("key_value_store", &"KeyValueStore { ... }")
            .field("clock", &"Clock { ... }")
            .field(
                "http_client",
                &self.http_client.as_ref().map(|_| "HttpClient { ... }"),
            )
            .field(
                "embed_sdk",
                &self.embed_sdk.as_ref().map(|_| "EmbedPlayerSdk { ... }"),
            )
            .field(
                "streaming_sdk",
                &self
                    .streaming_sdk
                    .as_ref()
                    .map(|_| "StreamingPlayerSdk { ... }"),
            )
            .field("cast_sdk", &self.cast_sdk.as_ref().map(|_| "CastSdk { ... }"))
            .field("mobile", &self.mobile)
            .field("limits", &self.limits)
            .finish()
    }
}

impl JukeboxConfig {
    /// Creates a new builder for constructing a `JukeboxConfig`.
    pub fn builder() -> JukeboxConfigBuilder {
        JukeboxConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.limits.validate()
    }
}

/// Builder for constructing [`JukeboxConfig`] instances.
///
/// Set the platform bridges and call [`build()`](JukeboxConfigBuilder::build)
/// to create the final config. The builder validates required dependencies and
/// provides actionable error messages.
#[derive(Default)]
pub struct JukeboxConfigBuilder {
    key_value_store: Option<Arc<dyn KeyValueStore>>,
    clock: Option<Arc<dyn Clock>>,
    http_client: Option<Arc<dyn HttpClient>>,
    embed_sdk: Option<Arc<dyn EmbedPlayerSdk>>,
    streaming_sdk: Option<Arc<dyn StreamingPlayerSdk>>,
    cast_sdk: Option<Arc<dyn CastSdk>>,
    mobile: Option<bool>,
    limits: Option<JukeboxLimits>,
}

impl JukeboxConfigBuilder {
    /// Sets the key-value store implementation (required).
    ///
    /// This is the playlist's durable home. Browser hosts back it with
    /// localStorage; headless hosts with an in-memory map or a file.
    pub fn key_value_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.key_value_store = Some(store);
        self
    }

    /// Sets the time source (required).
    ///
    /// The rate limiter and playlist timestamps read from this clock, which is
    /// what makes them testable without real waiting.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the HTTP client used for streaming Web API calls (optional).
    ///
    /// Without one, the streaming backend cannot issue play requests and will
    /// report itself as unavailable.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the embedded video player SDK (optional).
    pub fn embed_sdk(mut self, sdk: Arc<dyn EmbedPlayerSdk>) -> Self {
        self.embed_sdk = Some(sdk);
        self
    }

    /// Sets the streaming playback SDK (optional).
    pub fn streaming_sdk(mut self, sdk: Arc<dyn StreamingPlayerSdk>) -> Self {
        self.streaming_sdk = Some(sdk);
        self
    }

    /// Sets the cast framework SDK (optional).
    pub fn cast_sdk(mut self, sdk: Arc<dyn CastSdk>) -> Self {
        self.cast_sdk = Some(sdk);
        self
    }

    /// Declares whether the host enforces gesture-gated autoplay.
    ///
    /// Default: false
    pub fn mobile(mut self, mobile: bool) -> Self {
        self.mobile = Some(mobile);
        self
    }

    /// Overrides the tuning limits.
    pub fn limits(mut self, limits: JukeboxLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Builds the final `JukeboxConfig` instance.
    ///
    /// Returns `Ok(JukeboxConfig)` on success, or an error if:
    /// - The required `KeyValueStore` or `Clock` is missing
    /// - The limits are inconsistent
    pub fn build(self) -> Result<JukeboxConfig> {
        let key_value_store = self.key_value_store.ok_or_else(|| Error::CapabilityMissing {
            capability: "KeyValueStore".to_string(),
            message: "KeyValueStore implementation is required for playlist persistence. \
                     Browser: inject a localStorage-backed store. \
                     Headless: inject an in-memory or file-backed store."
                .to_string(),
        })?;

        let clock = self.clock.ok_or_else(|| Error::CapabilityMissing {
            capability: "Clock".to_string(),
            message: "Clock implementation is required for rate limiting and timestamps. \
                     Hosts: inject SystemClock. Tests: inject a mock clock."
                .to_string(),
        })?;

        let config = JukeboxConfig {
            key_value_store,
            clock,
            http_client: self.http_client,
            embed_sdk: self.embed_sdk,
            streaming_sdk: self.streaming_sdk,
            cast_sdk: self.cast_sdk,
            mobile: self.mobile.unwrap_or(false),
            limits: self.limits.unwrap_or_default(),
        };

        config.validate()?;

        Ok(config)
    }
}
