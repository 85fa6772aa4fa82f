//! # Input Validation & Sanitization
//!
//! Boundary checks for everything external that wants to become jukebox
//! state: video URLs and ids, free-text song fields, cover-art URLs, and the
//! add-song rate limit.
//!
//! The rule enforced throughout the core is that nothing here is ever
//! trusted as already-valid. A video id is re-checked when it comes from the
//! add-song form and again when it comes back out of persisted storage; a
//! cover URL derived from our own thumbnail template is still re-validated
//! against the allow-list before it is stored.
//!
//! - [`youtube`] - `VideoId` newtype, URL validation, thumbnail derivation
//! - [`sanitize`] - entity-escaping text sanitizer
//! - [`cover`] - trusted-host allow-list for cover art
//! - [`rate_limit`] - sliding-window limiter for the add-song path

pub mod cover;
pub mod error;
pub mod rate_limit;
pub mod sanitize;
pub mod youtube;

pub use cover::{validate_album_cover_url, TRUSTED_COVER_HOSTS};
pub use error::ValidationError;
pub use rate_limit::RateLimiter;
pub use sanitize::{escape_html, sanitize_required, sanitize_text, DEFAULT_MAX_LEN};
pub use youtube::{format_duration, thumbnail_url, validate_youtube_url, ThumbnailQuality, VideoId};
