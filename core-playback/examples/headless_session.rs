//! End-to-end jukebox session against the headless bridges.
//!
//! Assembles the full stack (config, persistence, orchestrator, backends,
//! router) the way a host shell would, then walks through a listening
//! session: play, skip, add a song, watch it autosave.
//!
//! Run with:
//! ```bash
//! cargo run --example headless_session
//! ```

use bridge_headless::{
    MemoryKeyValueStore, SimulatedCastSdk, SimulatedEmbedSdk, SimulatedStreamingSdk, SystemClock,
};
use core_library::{LoadedPlaylist, PlaylistStore};
use core_playback::{AddSongRequest, CastBackend, EmbedBackend, Jukebox, PlayerRouter};
use core_runtime::{init_logging, EventBus, JukeboxConfig, LogFormat, LoggingConfig};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() {
    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_spans(false),
    )
    .expect("failed to initialize logging");

    let storage = Arc::new(MemoryKeyValueStore::new());
    let config = JukeboxConfig::builder()
        .key_value_store(storage.clone())
        .clock(Arc::new(SystemClock))
        .embed_sdk(Arc::new(SimulatedEmbedSdk::new()))
        .streaming_sdk(Arc::new(SimulatedStreamingSdk::new()))
        .cast_sdk(Arc::new(SimulatedCastSdk::new()))
        .build()
        .expect("failed to build config");

    let bus = EventBus::default();
    let mut events = bus.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!(severity = ?event.severity(), "{}", event.description());
        }
    });

    let store = Arc::new(PlaylistStore::new(config.key_value_store.clone()));
    let loaded: LoadedPlaylist = store.load().await;
    info!(
        count = loaded.songs.len(),
        from_defaults = loaded.from_defaults,
        "playlist loaded"
    );

    let jukebox = Jukebox::new(
        loaded,
        bus.clone(),
        config.clock.clone(),
        config.limits,
    );
    let _autosave = jukebox.spawn_autosave(store.clone());

    let local = EmbedBackend::new(
        config.embed_sdk.clone().expect("embed sdk configured"),
        bus.clone(),
    );
    local.initialize().await.expect("embed init failed");
    let cast = CastBackend::new(
        config.cast_sdk.clone().expect("cast sdk configured"),
        bus.clone(),
    );
    cast.initialize().await.expect("cast init failed");

    let router = Arc::new(
        PlayerRouter::new(jukebox.clone(), bus.clone(), &config.limits)
            .with_local(local)
            .with_cast(cast),
    );

    let first = jukebox.playlist().remove(0);
    router.play(first).await.expect("play failed");
    router.next().await.expect("skip failed");

    let added = jukebox
        .add_song(AddSongRequest {
            url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            title: "Never Gonna Give You Up".to_string(),
            artist: "Rick Astley".to_string(),
            album: None,
        })
        .expect("add failed");
    info!(title = %added.title, "added to the playlist");

    // Let the autosave and event tasks drain.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let snapshot = jukebox.snapshot();
    info!(
        playlist = snapshot.playlist.len(),
        history = snapshot.history.len(),
        now_playing = %snapshot
            .player
            .current_song
            .map(|s| s.title)
            .unwrap_or_else(|| "-".to_string()),
        "session snapshot"
    );
}
