//! Receiver visualization page for cast sessions.
//!
//! The cast receiver does not play audio (the local player stays
//! authoritative); it displays a self-contained HTML page with the song's
//! title, artist and album art. The page is shipped as a `data:` url so no
//! server round-trip is needed, and all text is escaped before templating.

use bridge_traits::CastMediaRequest;
use core_library::Song;
use core_validate::{escape_html, sanitize_text, validate_album_cover_url, DEFAULT_MAX_LEN};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left bare in the data-url payload, mirroring what browser
/// `encodeURIComponent` keeps unescaped.
const DATA_URL_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Renders the visualization document for a song.
///
/// The album cover is only embedded when its url passes the trusted-host
/// allow list; an untrusted url degrades to a plain gradient background.
pub fn page_for(song: &Song) -> String {
    let title = sanitize_text(&song.title, DEFAULT_MAX_LEN);
    let artist = sanitize_text(&song.artist, DEFAULT_MAX_LEN);
    let cover = if validate_album_cover_url(&song.album_cover) {
        song.album_cover.clone()
    } else {
        String::new()
    };
    // The allow-list vets the host, not the characters; the url still gets
    // entity-escaped so it cannot terminate the src attribute.
    let cover_block = if cover.is_empty() {
        String::new()
    } else {
        let cover = escape_html(&cover);
        format!(r#"<img class="cover" src="{cover}" alt="">"#)
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
  html, body {{
    margin: 0; height: 100%;
    background: linear-gradient(135deg, #1a1a2e, #16213e);
    color: #fff; font-family: sans-serif;
    display: flex; align-items: center; justify-content: center;
  }}
  .card {{ text-align: center; }}
  .cover {{
    width: 320px; height: 320px; border-radius: 50%;
    object-fit: cover; animation: spin 20s linear infinite;
  }}
  @keyframes spin {{ to {{ transform: rotate(360deg); }} }}
  h1 {{ font-size: 2.2em; margin: 0.6em 0 0.2em; }}
  h2 {{ font-size: 1.4em; font-weight: normal; opacity: 0.7; margin: 0; }}
  .bars {{ display: flex; gap: 6px; justify-content: center; margin-top: 1.5em; }}
  .bars span {{
    width: 8px; height: 32px; background: #e94560;
    animation: eq 0.8s ease-in-out infinite alternate;
  }}
  .bars span:nth-child(2) {{ animation-delay: 0.2s; }}
  .bars span:nth-child(3) {{ animation-delay: 0.4s; }}
  .bars span:nth-child(4) {{ animation-delay: 0.6s; }}
  @keyframes eq {{ from {{ transform: scaleY(0.3); }} to {{ transform: scaleY(1); }} }}
</style>
</head>
<body>
<div class="card">
  {cover_block}
  <h1>{title}</h1>
  <h2>{artist}</h2>
  <div class="bars"><span></span><span></span><span></span><span></span></div>
</div>
</body>
</html>"#
    )
}

/// Encodes the visualization page as a `data:text/html` url.
pub fn data_url_for(song: &Song) -> String {
    let page = page_for(song);
    format!(
        "data:text/html;charset=utf-8,{}",
        utf8_percent_encode(&page, DATA_URL_SET)
    )
}

/// Builds the media load request handed to the cast bridge.
pub fn media_request_for(song: &Song) -> CastMediaRequest {
    let cover = if validate_album_cover_url(&song.album_cover) {
        Some(song.album_cover.clone())
    } else {
        None
    };
    CastMediaRequest {
        content_url: data_url_for(song),
        content_type: "text/html".to_string(),
        title: sanitize_text(&song.title, DEFAULT_MAX_LEN),
        subtitle: sanitize_text(&song.artist, DEFAULT_MAX_LEN),
        image_url: cover,
        autoplay: true,
    }
}
