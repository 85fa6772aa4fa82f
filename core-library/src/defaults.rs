//! Bundled default playlist.
//!
//! Used whenever persisted storage is absent, corrupt, or yields zero valid
//! entries; the jukebox never starts empty. Ids and timestamps are fixed so
//! repeated fallback loads produce identical playlists.

use crate::models::{Song, SongId};
use chrono::{DateTime, TimeZone, Utc};
use core_validate::VideoId;
use uuid::uuid;

const ASSET_HOST: &str = "https://d64gsuwffb70l.cloudfront.net";

fn added(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

struct Seed {
    id: uuid::Uuid,
    title: &'static str,
    artist: &'static str,
    album: &'static str,
    youtube_id: &'static str,
    cover: &'static str,
    duration_secs: u32,
    added_day: u32,
}

const SEEDS: [Seed; 9] = [
    Seed {
        id: uuid!("9a1f1c1e-0001-4a7e-8b51-6d3b2a4c9e01"),
        title: "Bohemian Rhapsody",
        artist: "Queen",
        album: "A Night at the Opera",
        youtube_id: "fJ9rUzIMcZQ",
        cover: "68ce46f09438f395da86302f_1758349078760_91d45250.webp",
        duration_secs: 354,
        added_day: 1,
    },
    Seed {
        id: uuid!("9a1f1c1e-0002-4a7e-8b51-6d3b2a4c9e02"),
        title: "Hotel California",
        artist: "Eagles",
        album: "Hotel California",
        youtube_id: "09839DpTctU",
        cover: "68ce46f09438f395da86302f_1758349081567_e84365c3.webp",
        duration_secs: 391,
        added_day: 1,
    },
    Seed {
        id: uuid!("9a1f1c1e-0003-4a7e-8b51-6d3b2a4c9e03"),
        title: "Sweet Child O Mine",
        artist: "Guns N Roses",
        album: "Appetite for Destruction",
        youtube_id: "1w7OgIMMRc4",
        cover: "68ce46f09438f395da86302f_1758349083285_3bfdd536.webp",
        duration_secs: 356,
        added_day: 1,
    },
    Seed {
        id: uuid!("9a1f1c1e-0004-4a7e-8b51-6d3b2a4c9e04"),
        title: "Stairway to Heaven",
        artist: "Led Zeppelin",
        album: "Led Zeppelin IV",
        youtube_id: "QkF3oxziUI4",
        cover: "68ce46f09438f395da86302f_1758349085012_7ec1a569.webp",
        duration_secs: 482,
        added_day: 1,
    },
    Seed {
        id: uuid!("9a1f1c1e-0005-4a7e-8b51-6d3b2a4c9e05"),
        title: "Imagine",
        artist: "John Lennon",
        album: "Imagine",
        youtube_id: "YkgkThdzX-8",
        cover: "68ce46f09438f395da86302f_1758349086751_8d5d31ce.webp",
        duration_secs: 183,
        added_day: 2,
    },
    Seed {
        id: uuid!("9a1f1c1e-0006-4a7e-8b51-6d3b2a4c9e06"),
        title: "Billie Jean",
        artist: "Michael Jackson",
        album: "Thriller",
        youtube_id: "Zi_XLOBDo_Y",
        cover: "68ce46f09438f395da86302f_1758349089005_cd043ef3.webp",
        duration_secs: 294,
        added_day: 2,
    },
    Seed {
        id: uuid!("9a1f1c1e-0007-4a7e-8b51-6d3b2a4c9e07"),
        title: "Like a Rolling Stone",
        artist: "Bob Dylan",
        album: "Highway 61 Revisited",
        youtube_id: "IwOfCgkyEj0",
        cover: "68ce46f09438f395da86302f_1758349090721_70521c0e.webp",
        duration_secs: 369,
        added_day: 2,
    },
    Seed {
        id: uuid!("9a1f1c1e-0008-4a7e-8b51-6d3b2a4c9e08"),
        title: "Purple Haze",
        artist: "Jimi Hendrix",
        album: "Are You Experienced",
        youtube_id: "WGoDaYjdfSg",
        cover: "68ce46f09438f395da86302f_1758349092435_e5e24032.webp",
        duration_secs: 167,
        added_day: 2,
    },
    Seed {
        id: uuid!("9a1f1c1e-0009-4a7e-8b51-6d3b2a4c9e09"),
        title: "Good Vibrations",
        artist: "The Beach Boys",
        album: "Pet Sounds",
        youtube_id: "Eab_beh07HU",
        cover: "68ce46f09438f395da86302f_1758349094160_a41a447a.webp",
        duration_secs: 219,
        added_day: 2,
    },
];

/// Builds the bundled default playlist.
pub fn default_playlist() -> Vec<Song> {
    SEEDS
        .iter()
        .map(|seed| Song {
            id: SongId::from_uuid(seed.id),
            title: seed.title.to_string(),
            artist: seed.artist.to_string(),
            album: Some(seed.album.to_string()),
            youtube_id: VideoId::from_static(seed.youtube_id),
            spotify_id: None,
            album_cover: format!("{ASSET_HOST}/{}", seed.cover),
            duration_secs: Some(seed.duration_secs),
            added_at: added(seed.added_day),
        })
        .collect()
}
