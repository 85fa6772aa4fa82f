//! Cover-art URL allow-list.

use url::Url;

/// Hosts cover art is allowed to load from: the thumbnail hosts plus the
/// bundled-asset CDN. Matching is exact, never suffix-based, so
/// `img.youtube.com.evil.example` does not slip through.
pub const TRUSTED_COVER_HOSTS: [&str; 3] = [
    "img.youtube.com",
    "i.ytimg.com",
    "d64gsuwffb70l.cloudfront.net",
];

/// Returns true when `raw` parses as a URL whose host exactly equals one of
/// [`TRUSTED_COVER_HOSTS`]. Malformed input fails closed.
pub fn validate_album_cover_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => url
            .host_str()
            .map(|host| TRUSTED_COVER_HOSTS.contains(&host))
            .unwrap_or(false),
        Err(_) => false,
    }
}
