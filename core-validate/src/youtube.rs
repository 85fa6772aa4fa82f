//! Video URL validation and thumbnail derivation.
//!
//! Acceptance is anchored and strict: exactly four input forms are
//! recognized (canonical watch URL, short URL, embed URL, bare id), and the
//! extracted id must be exactly 11 characters of `[A-Za-z0-9_-]`. Trailing
//! garbage after the id is rejected unless it is a well-formed query
//! continuation (`&...` on watch URLs, `?...` on short/embed URLs).

use crate::error::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Length of a valid video id.
pub const VIDEO_ID_LEN: usize = 11;

/// A validated 11-character video id.
///
/// The only ways to construct one are [`VideoId::parse`] /
/// [`validate_youtube_url`] (which validate) and [`VideoId::from_static`]
/// (which asserts, for vetted constants). Deserialization validates too, so
/// an id read back from storage carries the same guarantee as one typed into
/// the add-song form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Validates and extracts a video id from a URL or bare id.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        validate_youtube_url(raw)
    }

    /// Constructs from a compile-time constant.
    ///
    /// Panics when the literal is malformed; use only for vetted constants
    /// such as the bundled default playlist.
    pub fn from_static(id: &'static str) -> Self {
        assert!(is_valid_id(id), "malformed static video id: {id}");
        Self(id.to_string())
    }

    /// The raw 11-character id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for VideoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for VideoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if is_valid_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(serde::de::Error::custom(format!(
                "invalid video id: {raw}"
            )))
        }
    }
}

/// Checks the 11-character `[A-Za-z0-9_-]` id format.
fn is_valid_id(s: &str) -> bool {
    s.len() == VIDEO_ID_LEN
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Validates a video URL or bare id, returning the extracted [`VideoId`].
///
/// The characters `<>"'` are stripped before matching so a pasted value
/// carrying markup fragments cannot smuggle them into state. Accepted forms:
///
/// - `http(s)://(www.)youtube.com/watch?v=<id>` with optional `&...`
/// - `http(s)://(www.)youtu.be/<id>` with optional `?...`
/// - `http(s)://(www.)youtube.com/embed/<id>` with optional `?...`
/// - a bare 11-character id
pub fn validate_youtube_url(raw: &str) -> Result<VideoId, ValidationError> {
    let clean: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\''))
        .collect();

    if is_valid_id(&clean) {
        return Ok(VideoId(clean));
    }

    let rest = clean
        .strip_prefix("https://")
        .or_else(|| clean.strip_prefix("http://"))
        .ok_or_else(|| ValidationError::InvalidVideoUrl(clean.clone()))?;
    let rest = rest.strip_prefix("www.").unwrap_or(rest);

    let candidate = if let Some(tail) = rest.strip_prefix("youtube.com/watch?v=") {
        id_before(tail, '&')
    } else if let Some(tail) = rest.strip_prefix("youtu.be/") {
        id_before(tail, '?')
    } else if let Some(tail) = rest.strip_prefix("youtube.com/embed/") {
        id_before(tail, '?')
    } else {
        None
    };

    match candidate {
        Some(id) if is_valid_id(id) => Ok(VideoId(id.to_string())),
        // Recognized URL form, malformed id.
        Some(id) => Err(ValidationError::InvalidVideoId(id.to_string())),
        None => Err(ValidationError::InvalidVideoUrl(clean)),
    }
}

/// Takes the portion of `tail` that must be the id: everything before the
/// first `separator`, or the whole tail when no separator follows. Trailing
/// garbage not introduced by the separator fails the id check afterwards.
fn id_before(tail: &str, separator: char) -> Option<&str> {
    match tail.find(separator) {
        Some(pos) => Some(&tail[..pos]),
        None => Some(tail),
    }
}

/// Thumbnail sizes offered by the image host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThumbnailQuality {
    /// 120x90 default
    Default,
    /// 320x180 medium
    Medium,
    /// 480x360 high (the add-song path uses this)
    #[default]
    High,
    /// Highest available resolution
    Max,
}

impl ThumbnailQuality {
    fn file_prefix(&self) -> &'static str {
        match self {
            ThumbnailQuality::Default => "",
            ThumbnailQuality::Medium => "mq",
            ThumbnailQuality::High => "hq",
            ThumbnailQuality::Max => "maxres",
        }
    }
}

/// Derives the thumbnail URL for a validated video id.
///
/// The result lands on `img.youtube.com` and so passes the cover allow-list
/// by construction, but callers re-validate anyway.
pub fn thumbnail_url(video_id: &VideoId, quality: ThumbnailQuality) -> String {
    format!(
        "https://img.youtube.com/vi/{}/{}default.jpg",
        video_id,
        quality.file_prefix()
    )
}

/// Formats a duration in seconds as `m:ss` for display.
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_four_canonical_forms() {
        for input in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://youtube.com/watch?v=dQw4w9WgXcQ&t=42",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://youtube.com/embed/dQw4w9WgXcQ?autoplay=1",
            "dQw4w9WgXcQ",
        ] {
            let id = validate_youtube_url(input).unwrap_or_else(|e| panic!("{input}: {e}"));
            assert_eq!(id.as_str(), "dQw4w9WgXcQ");
        }
    }

    #[test]
    fn rejects_wrong_length_and_trailing_garbage() {
        for input in [
            "https://youtube.com/watch?v=short",
            "https://youtube.com/watch?v=dQw4w9WgXcQextra",
            "https://youtu.be/dQw4w9WgXcQ/more",
            "https://youtube.com/embed/",
            "toolongvideoid",
            "",
        ] {
            assert!(validate_youtube_url(input).is_err(), "{input}");
        }
    }

    #[test]
    fn recognized_forms_with_a_bad_id_report_invalid_id() {
        assert_eq!(
            validate_youtube_url("https://youtube.com/watch?v=short"),
            Err(ValidationError::InvalidVideoId("short".to_string()))
        );
        assert_eq!(
            validate_youtube_url("https://example.test/watch?v=dQw4w9WgXcQ"),
            Err(ValidationError::InvalidVideoUrl(
                "https://example.test/watch?v=dQw4w9WgXcQ".to_string()
            ))
        );
    }

    #[test]
    fn rejects_other_hosts() {
        assert!(validate_youtube_url("https://evil.example.com/watch?v=dQw4w9WgXcQ").is_err());
        assert!(validate_youtube_url("https://youtube.com.evil.com/watch?v=dQw4w9WgXcQ").is_err());
    }

    #[test]
    fn strips_markup_characters_before_matching() {
        let id = validate_youtube_url("<https://youtu.be/dQw4w9WgXcQ>").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn bare_id_with_invalid_characters_is_rejected() {
        assert!(validate_youtube_url("dQw4w9WgXc!").is_err());
        assert!(validate_youtube_url("dQw4 9WgXcQ").is_err());
    }

    #[test]
    fn deserialization_revalidates() {
        let ok: Result<VideoId, _> = serde_json::from_str("\"dQw4w9WgXcQ\"");
        assert_eq!(ok.unwrap().as_str(), "dQw4w9WgXcQ");

        let bad: Result<VideoId, _> = serde_json::from_str("\"<script>bad\"");
        assert!(bad.is_err());
    }

    #[test]
    fn thumbnail_urls_follow_the_template() {
        let id = VideoId::from_static("dQw4w9WgXcQ");
        assert_eq!(
            thumbnail_url(&id, ThumbnailQuality::High),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
        assert_eq!(
            thumbnail_url(&id, ThumbnailQuality::Default),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/default.jpg"
        );
        assert_eq!(
            thumbnail_url(&id, ThumbnailQuality::Max),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
    }

    #[test]
    fn thumbnail_urls_land_on_a_trusted_cover_host() {
        let id = VideoId::from_static("dQw4w9WgXcQ");
        for quality in [
            ThumbnailQuality::Default,
            ThumbnailQuality::Medium,
            ThumbnailQuality::High,
            ThumbnailQuality::Max,
        ] {
            assert!(crate::validate_album_cover_url(&thumbnail_url(&id, quality)));
        }
    }

    #[test]
    fn durations_format_as_minutes_and_padded_seconds() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(482), "8:02");
        assert_eq!(format_duration(3605), "60:05");
    }
}
