//! State-machine behavior of the orchestrator: selection, history,
//! advancement, validated additions and autosave.

use bridge_headless::{MemoryKeyValueStore, MockClock};
use core_library::{
    default_playlist, LoadedPlaylist, PlaylistStore, RepeatMode, Song, SongId, HISTORY_CAP,
};
use core_playback::{AddSongError, AddSongRequest, Jukebox};
use core_runtime::{EventBus, JukeboxEvent, JukeboxLimits, PlaybackEvent, PlaylistEvent};
use core_validate::ValidationError;
use std::sync::Arc;
use std::time::Duration;

fn fixture() -> (Arc<Jukebox>, EventBus, Arc<MockClock>) {
    let bus = EventBus::default();
    let clock = Arc::new(MockClock::new());
    let jukebox = Jukebox::new(
        LoadedPlaylist {
            songs: default_playlist(),
            from_defaults: true,
        },
        bus.clone(),
        clock.clone(),
        JukeboxLimits::default(),
    );
    (jukebox, bus, clock)
}

fn stray_song() -> Song {
    let mut song = default_playlist().remove(0);
    song.id = SongId::new();
    song.title = "Not In The Playlist".to_string();
    song
}

#[tokio::test]
async fn selecting_a_song_starts_playback_and_records_history() {
    let (jukebox, bus, _) = fixture();
    let mut events = bus.subscribe();

    let song = default_playlist().remove(2);
    jukebox.play_song(song.clone());

    assert!(jukebox.is_playing());
    assert_eq!(jukebox.current_song().map(|s| s.id), Some(song.id));

    let state = jukebox.snapshot();
    assert_eq!(state.history.front().map(|s| s.id), Some(song.id));

    match events.recv().await.unwrap() {
        JukeboxEvent::Playback(PlaybackEvent::SongSelected { song_id, title }) => {
            assert_eq!(song_id, song.id.to_string());
            assert_eq!(title, song.title);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn history_is_capped() {
    let (jukebox, _, _) = fixture();
    let song = default_playlist().remove(0);
    for _ in 0..(HISTORY_CAP + 25) {
        jukebox.play_song(song.clone());
    }
    assert_eq!(jukebox.snapshot().history.len(), HISTORY_CAP);
}

#[tokio::test]
async fn next_advances_sequentially_and_wraps() {
    let (jukebox, _, _) = fixture();
    let playlist = jukebox.playlist();

    jukebox.play_song(playlist[0].clone());
    let next = jukebox.next_song().unwrap();
    assert_eq!(next.id, playlist[1].id);

    jukebox.play_song(playlist[playlist.len() - 1].clone());
    let wrapped = jukebox.next_song().unwrap();
    assert_eq!(wrapped.id, playlist[0].id);
}

#[tokio::test]
async fn next_prefers_the_queue() {
    let (jukebox, _, _) = fixture();
    let playlist = jukebox.playlist();
    let queued = stray_song();

    jukebox.play_song(playlist[0].clone());
    jukebox.queue_song(queued.clone());

    let next = jukebox.next_song().unwrap();
    assert_eq!(next.id, queued.id);
    assert!(jukebox.snapshot().queue.is_empty());
}

#[tokio::test]
async fn unknown_current_song_advances_to_the_first_entry() {
    let (jukebox, _, _) = fixture();
    let playlist = jukebox.playlist();

    jukebox.play_song(stray_song());
    let next = jukebox.next_song().unwrap();
    assert_eq!(next.id, playlist[0].id);
}

#[tokio::test]
async fn previous_wraps_to_the_last_entry() {
    let (jukebox, _, _) = fixture();
    let playlist = jukebox.playlist();

    jukebox.play_song(playlist[0].clone());
    let previous = jukebox.previous_song().unwrap();
    assert_eq!(previous.id, playlist[playlist.len() - 1].id);
}

#[tokio::test]
async fn toggle_without_a_current_song_is_a_no_op() {
    let (jukebox, _, _) = fixture();
    assert_eq!(jukebox.toggle_play(), None);
    assert!(!jukebox.is_playing());
}

#[tokio::test]
async fn toggle_flips_between_paused_and_resumed() {
    let (jukebox, bus, _) = fixture();
    jukebox.play_song(default_playlist().remove(0));
    let mut events = bus.subscribe();

    assert_eq!(jukebox.toggle_play(), Some(false));
    assert_eq!(jukebox.toggle_play(), Some(true));

    assert!(matches!(
        events.recv().await.unwrap(),
        JukeboxEvent::Playback(PlaybackEvent::Paused { .. })
    ));
    assert!(matches!(
        events.recv().await.unwrap(),
        JukeboxEvent::Playback(PlaybackEvent::Resumed { .. })
    ));
}

#[tokio::test]
async fn handle_ended_completes_and_advances() {
    let (jukebox, bus, _) = fixture();
    let playlist = jukebox.playlist();
    jukebox.play_song(playlist[3].clone());
    let mut events = bus.subscribe();

    let next = jukebox.handle_ended().unwrap();
    assert_eq!(next.id, playlist[4].id);

    match events.recv().await.unwrap() {
        JukeboxEvent::Playback(PlaybackEvent::Completed { song_id }) => {
            assert_eq!(song_id, playlist[3].id.to_string());
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn added_songs_are_validated_and_sanitized() {
    let (jukebox, bus, _) = fixture();
    let mut events = bus.subscribe();
    let before = jukebox.playlist().len();

    let song = jukebox
        .add_song(AddSongRequest {
            url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            title: "  <b>Never Gonna</b> Give You Up  ".to_string(),
            artist: "Rick Astley".to_string(),
            album: Some("".to_string()),
        })
        .unwrap();

    assert_eq!(song.youtube_id.as_str(), "dQw4w9WgXcQ");
    assert!(!song.title.contains('<'));
    assert!(song.title.contains("&lt;b&gt;"));
    assert_eq!(song.album, None);
    assert_eq!(
        song.album_cover,
        "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
    );
    assert_eq!(jukebox.playlist().len(), before + 1);

    match events.recv().await.unwrap() {
        JukeboxEvent::Playlist(PlaylistEvent::SongAdded { artist, .. }) => {
            assert_eq!(artist, "Rick Astley");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn rejected_additions_leave_the_playlist_untouched() {
    let (jukebox, _, _) = fixture();
    let before = jukebox.playlist();

    let result = jukebox.add_song(AddSongRequest {
        url: "https://vimeo.com/12345".to_string(),
        title: "Title".to_string(),
        artist: "Artist".to_string(),
        album: None,
    });
    assert!(matches!(
        result,
        Err(AddSongError::Invalid(ValidationError::InvalidVideoUrl(_)))
    ));

    let result = jukebox.add_song(AddSongRequest {
        url: "dQw4w9WgXcQ".to_string(),
        title: "   ".to_string(),
        artist: "Artist".to_string(),
        album: None,
    });
    assert!(matches!(
        result,
        Err(AddSongError::Invalid(ValidationError::EmptyField {
            field: "title"
        }))
    ));

    let after = jukebox.playlist();
    assert_eq!(before.len(), after.len());
}

#[tokio::test]
async fn additions_are_rate_limited_per_sliding_window() {
    let (jukebox, _, clock) = fixture();
    let request = |n: usize| AddSongRequest {
        url: "dQw4w9WgXcQ".to_string(),
        title: format!("Song {n}"),
        artist: "Artist".to_string(),
        album: None,
    };

    for n in 0..10 {
        jukebox.add_song(request(n)).unwrap();
    }
    assert!(matches!(
        jukebox.add_song(request(10)),
        Err(AddSongError::RateLimited)
    ));

    clock.advance(Duration::from_secs(61));
    jukebox.add_song(request(11)).unwrap();
}

#[tokio::test]
async fn volume_is_clamped_and_toggles_cycle() {
    let (jukebox, _, _) = fixture();
    assert_eq!(jukebox.set_volume(1.7), 1.0);
    assert_eq!(jukebox.set_volume(-0.3), 0.0);

    assert!(jukebox.toggle_shuffle());
    assert!(!jukebox.toggle_shuffle());

    assert_eq!(jukebox.cycle_repeat(), RepeatMode::One);
    assert_eq!(jukebox.cycle_repeat(), RepeatMode::All);
    assert_eq!(jukebox.cycle_repeat(), RepeatMode::None);
}

#[tokio::test]
async fn autosave_persists_each_addition() {
    let (jukebox, _, _) = fixture();
    let memory = Arc::new(MemoryKeyValueStore::new());
    let store = Arc::new(PlaylistStore::new(memory.clone()));
    let _task = jukebox.spawn_autosave(store.clone());

    let added = jukebox
        .add_song(AddSongRequest {
            url: "dQw4w9WgXcQ".to_string(),
            title: "Persisted".to_string(),
            artist: "Artist".to_string(),
            album: None,
        })
        .unwrap();

    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    let reloaded = store.load().await;
    assert!(!reloaded.from_defaults);
    assert!(reloaded.songs.iter().any(|song| song.id == added.id));
}

#[tokio::test]
async fn autosave_reports_failures_without_stopping() {
    let (jukebox, bus, _) = fixture();
    let memory = Arc::new(MemoryKeyValueStore::new());
    memory.set_fail_writes(true);
    let store = Arc::new(PlaylistStore::new(memory.clone()));
    let _task = jukebox.spawn_autosave(store);
    let mut events = bus.subscribe();

    jukebox
        .add_song(AddSongRequest {
            url: "dQw4w9WgXcQ".to_string(),
            title: "Doomed".to_string(),
            artist: "Artist".to_string(),
            album: None,
        })
        .unwrap();

    loop {
        match events.recv().await.unwrap() {
            JukeboxEvent::Playlist(PlaylistEvent::SaveFailed { .. }) => break,
            _ => continue,
        }
    }
}
