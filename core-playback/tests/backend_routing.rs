//! Backend adapter behavior and router dispatch: deferred local playback,
//! streaming readiness, best-effort casting and the mobile gesture gate.

use bridge_headless::{
    EmbedCommand, RecordingHttpClient, SimulatedCastSdk, SimulatedEmbedSdk, SimulatedStreamingSdk,
    SystemClock,
};
use bridge_traits::{CastSdk, EmbedPlayerState, HttpMethod};
use core_auth::{AccessToken, AuthSession};
use core_library::{default_playlist, LoadedPlaylist, Song};
use core_playback::{
    ActiveBackend, CastBackend, EmbedBackend, Jukebox, PlaybackBackend, PlaybackError,
    PlayerRouter, StreamingBackend,
};
use core_runtime::{CastEvent, EventBus, JukeboxEvent, JukeboxLimits, PlaybackEvent};
use std::sync::Arc;
use std::time::Duration;

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

fn sample_song() -> Song {
    default_playlist().remove(0)
}

fn streaming_song() -> Song {
    let mut song = sample_song();
    song.spotify_id = Some("4uLU6hMCjMI75M1A2tKUQC".to_string());
    song
}

fn jukebox(bus: &EventBus, limits: JukeboxLimits) -> Arc<Jukebox> {
    Jukebox::new(
        LoadedPlaylist {
            songs: default_playlist(),
            from_defaults: true,
        },
        bus.clone(),
        Arc::new(SystemClock),
        limits,
    )
}

fn no_retry() -> JukeboxLimits {
    JukeboxLimits {
        autoplay_retries: 0,
        ..JukeboxLimits::default()
    }
}

fn authenticated_session(bus: &EventBus) -> Arc<AuthSession> {
    let session = AuthSession::new(bus.clone());
    session.set_token(AccessToken::new("secret-token", "Bearer"));
    Arc::new(session)
}

// ---------------------------------------------------------------------------
// Embedded player
// ---------------------------------------------------------------------------

#[tokio::test]
async fn embed_defers_cue_and_play_until_sdk_ready() {
    let sdk = Arc::new(SimulatedEmbedSdk::manual());
    let bus = EventBus::default();
    let backend = EmbedBackend::new(sdk.clone(), bus.clone());
    backend.initialize().await.unwrap();
    let mut events = bus.subscribe();

    let song = sample_song();
    backend.load_track(&song).await.unwrap();
    backend.play().await.unwrap();
    assert!(sdk.commands().is_empty());
    assert!(!backend.is_ready());

    sdk.fire_ready();
    settle().await;

    assert_eq!(
        sdk.commands(),
        vec![
            EmbedCommand::Cue(song.youtube_id.as_str().to_string()),
            EmbedCommand::Play,
        ]
    );
    assert!(backend.is_ready());
    assert!(matches!(
        events.recv().await.unwrap(),
        JukeboxEvent::Playback(PlaybackEvent::BackendReady { .. })
    ));
}

#[tokio::test]
async fn latest_selection_wins_when_ready_fires() {
    let sdk = Arc::new(SimulatedEmbedSdk::manual());
    let bus = EventBus::default();
    let backend = EmbedBackend::new(sdk.clone(), bus.clone());
    backend.initialize().await.unwrap();

    let playlist = default_playlist();
    backend.load_track(&playlist[0]).await.unwrap();
    backend.load_track(&playlist[1]).await.unwrap();
    backend.play().await.unwrap();

    sdk.fire_ready();
    settle().await;

    assert_eq!(
        sdk.commands(),
        vec![
            EmbedCommand::Cue(playlist[1].youtube_id.as_str().to_string()),
            EmbedCommand::Play,
        ]
    );
}

#[tokio::test]
async fn a_slow_cue_cannot_leave_a_stale_track_loaded() {
    let sdk = Arc::new(SimulatedEmbedSdk::new());
    let bus = EventBus::default();
    let backend = EmbedBackend::new(sdk.clone(), bus.clone());
    backend.initialize().await.unwrap();
    settle().await;

    let playlist = default_playlist();
    let stale = playlist[0].clone();
    let fresh = playlist[1].clone();

    // The first cue stalls inside the SDK while a newer load completes.
    let gate = sdk.hold_next_cue();
    let slow = {
        let backend = Arc::clone(&backend);
        let song = stale.clone();
        tokio::spawn(async move { backend.load_track(&song).await })
    };
    settle().await;
    backend.load_track(&fresh).await.unwrap();

    gate.notify_one();
    slow.await.unwrap().unwrap();
    settle().await;

    let cues: Vec<_> = sdk
        .commands()
        .into_iter()
        .filter_map(|command| match command {
            EmbedCommand::Cue(id) => Some(id),
            _ => None,
        })
        .collect();
    assert_eq!(
        cues.last().map(String::as_str),
        Some(fresh.youtube_id.as_str()),
        "the newest selection must be the one left cued"
    );
}

#[tokio::test]
async fn embed_ended_state_emits_completion() {
    let sdk = Arc::new(SimulatedEmbedSdk::new());
    let bus = EventBus::default();
    let backend = EmbedBackend::new(sdk.clone(), bus.clone());
    backend.initialize().await.unwrap();
    settle().await;

    let song = sample_song();
    backend.load_track(&song).await.unwrap();
    let mut events = bus.subscribe();

    sdk.emit_state(EmbedPlayerState::Ended);
    settle().await;

    match events.recv().await.unwrap() {
        JukeboxEvent::Playback(PlaybackEvent::Completed { song_id }) => {
            assert_eq!(song_id, song.id.to_string());
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn embed_errors_surface_on_the_bus() {
    let sdk = Arc::new(SimulatedEmbedSdk::new());
    let bus = EventBus::default();
    let backend = EmbedBackend::new(sdk.clone(), bus.clone());
    backend.initialize().await.unwrap();
    settle().await;
    let mut events = bus.subscribe();

    sdk.emit_error(150);
    settle().await;

    match events.recv().await.unwrap() {
        JukeboxEvent::Playback(PlaybackEvent::BackendError {
            backend,
            message,
            recoverable,
        }) => {
            assert_eq!(backend, "local");
            assert!(message.contains("150"));
            assert!(!recoverable);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Streaming
// ---------------------------------------------------------------------------

#[tokio::test]
async fn streaming_rejects_commands_without_a_device() {
    let sdk = Arc::new(SimulatedStreamingSdk::new());
    let http = Arc::new(RecordingHttpClient::new());
    let bus = EventBus::default();
    let backend = StreamingBackend::new(
        sdk.clone(),
        http.clone(),
        authenticated_session(&bus),
        bus.clone(),
    );
    backend.connect().await.unwrap();

    let result = backend.load_track(&streaming_song()).await;
    assert!(matches!(
        result,
        Err(PlaybackError::BackendNotReady {
            backend: "streaming"
        })
    ));
    assert!(matches!(
        backend.pause().await,
        Err(PlaybackError::BackendNotReady { .. })
    ));
    assert!(http.take_requests().is_empty());
}

#[tokio::test]
async fn streaming_plays_through_the_web_api() {
    let sdk = Arc::new(SimulatedStreamingSdk::new());
    let http = Arc::new(RecordingHttpClient::new());
    let bus = EventBus::default();
    let backend = StreamingBackend::new(
        sdk.clone(),
        http.clone(),
        authenticated_session(&bus),
        bus.clone(),
    );
    backend.connect().await.unwrap();

    sdk.announce_device("device-42");
    settle().await;
    assert!(backend.is_ready());

    let song = streaming_song();
    backend.load_track(&song).await.unwrap();

    let requests = http.take_requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, HttpMethod::Put);
    assert_eq!(
        request.url,
        "https://api.spotify.com/v1/me/player/play?device_id=device-42"
    );
    assert!(request
        .headers
        .iter()
        .any(|(name, value)| name == "Authorization" && value == "Bearer secret-token"));
    let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body["uris"][0],
        serde_json::json!("spotify:track:4uLU6hMCjMI75M1A2tKUQC")
    );
}

#[tokio::test]
async fn streaming_surfaces_web_api_rejections() {
    let sdk = Arc::new(SimulatedStreamingSdk::new());
    let http = Arc::new(RecordingHttpClient::new());
    http.push_response(404, "device not found");
    let bus = EventBus::default();
    let backend = StreamingBackend::new(
        sdk.clone(),
        http.clone(),
        authenticated_session(&bus),
        bus.clone(),
    );
    backend.connect().await.unwrap();
    sdk.announce_device("device-42");
    settle().await;

    let result = backend.load_track(&streaming_song()).await;
    assert!(matches!(
        result,
        Err(PlaybackError::PlayRequestFailed { status: 404 })
    ));
}

#[tokio::test]
async fn streaming_requires_an_access_token() {
    let sdk = Arc::new(SimulatedStreamingSdk::new());
    let http = Arc::new(RecordingHttpClient::new());
    let bus = EventBus::default();
    let session = Arc::new(AuthSession::new(bus.clone()));
    let backend = StreamingBackend::new(sdk, http, session, bus);

    assert!(matches!(
        backend.connect().await,
        Err(PlaybackError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn tracks_without_a_streaming_id_are_unavailable() {
    let sdk = Arc::new(SimulatedStreamingSdk::new());
    let http = Arc::new(RecordingHttpClient::new());
    let bus = EventBus::default();
    let backend = StreamingBackend::new(
        sdk.clone(),
        http,
        authenticated_session(&bus),
        bus.clone(),
    );
    backend.connect().await.unwrap();
    sdk.announce_device("device-42");
    settle().await;

    let result = backend.load_track(&sample_song()).await;
    assert!(matches!(
        result,
        Err(PlaybackError::TrackUnavailable { .. })
    ));
}

// ---------------------------------------------------------------------------
// Cast
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cast_song_loads_a_visualization() {
    let sdk = Arc::new(SimulatedCastSdk::new());
    let bus = EventBus::default();
    let backend = CastBackend::new(sdk.clone(), bus.clone());
    let mut events = bus.subscribe();

    let song = sample_song();
    assert!(backend.cast_song(&song).await);

    let loads = sdk.loads();
    assert_eq!(loads.len(), 1);
    assert_eq!(loads[0].content_type, "text/html");
    assert!(loads[0].content_url.starts_with("data:text/html"));
    assert_eq!(loads[0].subtitle, song.artist);
    assert!(loads[0].autoplay);

    loop {
        if let JukeboxEvent::Cast(CastEvent::CastStarted { title, .. }) =
            events.recv().await.unwrap()
        {
            assert_eq!(title, song.title);
            break;
        }
    }
}

#[tokio::test]
async fn refused_sessions_fail_the_cast_quietly() {
    let sdk = Arc::new(SimulatedCastSdk::new());
    sdk.deny_sessions();
    let bus = EventBus::default();
    let backend = CastBackend::new(sdk.clone(), bus.clone());
    let mut events = bus.subscribe();

    assert!(!backend.cast_song(&sample_song()).await);
    assert!(sdk.loads().is_empty());
    assert!(matches!(
        events.recv().await.unwrap(),
        JukeboxEvent::Cast(CastEvent::CastFailed { .. })
    ));
}

#[tokio::test]
async fn unavailable_framework_fails_the_cast() {
    let sdk = Arc::new(SimulatedCastSdk::new());
    sdk.set_available(false);
    let bus = EventBus::default();
    let backend = CastBackend::new(sdk.clone(), bus.clone());

    assert!(!backend.cast_song(&sample_song()).await);
    assert!(sdk.loads().is_empty());
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[tokio::test]
async fn router_plays_locally_by_default() {
    let embed = Arc::new(SimulatedEmbedSdk::new());
    let bus = EventBus::default();
    let jukebox = jukebox(&bus, no_retry());
    let local = EmbedBackend::new(embed.clone(), bus.clone());
    local.initialize().await.unwrap();
    settle().await;

    let router = Arc::new(
        PlayerRouter::new(jukebox.clone(), bus.clone(), &no_retry()).with_local(local),
    );

    let song = sample_song();
    router.play(song.clone()).await.unwrap();
    settle().await;

    assert_eq!(router.active(), ActiveBackend::Local);
    assert_eq!(jukebox.current_song().map(|s| s.id), Some(song.id));
    assert_eq!(
        embed.commands(),
        vec![
            EmbedCommand::Cue(song.youtube_id.as_str().to_string()),
            EmbedCommand::Play,
        ]
    );
}

#[tokio::test]
async fn router_prefers_streaming_for_streaming_tracks() {
    let embed = Arc::new(SimulatedEmbedSdk::new());
    let streaming_sdk = Arc::new(SimulatedStreamingSdk::new());
    let http = Arc::new(RecordingHttpClient::new());
    let bus = EventBus::default();
    let jukebox = jukebox(&bus, no_retry());

    let local = EmbedBackend::new(embed.clone(), bus.clone());
    local.initialize().await.unwrap();
    let streaming = StreamingBackend::new(
        streaming_sdk.clone(),
        http.clone(),
        authenticated_session(&bus),
        bus.clone(),
    );
    streaming.connect().await.unwrap();
    streaming_sdk.announce_device("device-42");
    settle().await;

    let router = Arc::new(
        PlayerRouter::new(jukebox, bus.clone(), &no_retry())
            .with_local(local)
            .with_streaming(streaming),
    );

    router.play(streaming_song()).await.unwrap();
    settle().await;

    assert_eq!(router.active(), ActiveBackend::Streaming);
    assert_eq!(http.take_requests().len(), 1);
    assert!(embed.commands().is_empty());
}

#[tokio::test]
async fn live_cast_session_takes_priority_over_local() {
    let embed = Arc::new(SimulatedEmbedSdk::new());
    let cast_sdk = Arc::new(SimulatedCastSdk::new());
    let bus = EventBus::default();
    let jukebox = jukebox(&bus, no_retry());

    let local = EmbedBackend::new(embed.clone(), bus.clone());
    local.initialize().await.unwrap();
    let cast = CastBackend::new(cast_sdk.clone(), bus.clone());
    cast.initialize().await.unwrap();
    cast_sdk.request_session().await.unwrap();
    settle().await;

    let router = Arc::new(
        PlayerRouter::new(jukebox, bus.clone(), &no_retry())
            .with_local(local)
            .with_cast(cast),
    );

    let song = sample_song();
    router.play(song.clone()).await.unwrap();
    settle().await;

    assert_eq!(router.active(), ActiveBackend::Cast);
    assert_eq!(cast_sdk.loads().len(), 1);
    // Exactly one backend gets transport commands while casting.
    assert!(embed.commands().is_empty());

    router.toggle_play().await.unwrap();
    assert_eq!(cast_sdk.commands(), vec![bridge_headless::CastCommand::Pause]);
    assert!(embed.commands().is_empty());
}

#[tokio::test]
async fn failed_cast_falls_back_to_local_playback() {
    let embed = Arc::new(SimulatedEmbedSdk::new());
    let cast_sdk = Arc::new(SimulatedCastSdk::new());
    cast_sdk.refuse_loads();
    let bus = EventBus::default();
    let jukebox = jukebox(&bus, no_retry());

    let local = EmbedBackend::new(embed.clone(), bus.clone());
    local.initialize().await.unwrap();
    let cast = CastBackend::new(cast_sdk.clone(), bus.clone());
    cast.initialize().await.unwrap();
    cast_sdk.request_session().await.unwrap();
    settle().await;

    let router = Arc::new(
        PlayerRouter::new(jukebox, bus.clone(), &no_retry())
            .with_local(local)
            .with_cast(cast),
    );

    router.play(sample_song()).await.unwrap();
    settle().await;

    assert_eq!(router.active(), ActiveBackend::Local);
    assert!(cast_sdk.loads().is_empty());
    assert!(embed.commands().contains(&EmbedCommand::Play));
}

#[tokio::test]
async fn mobile_hosts_gate_playback_behind_a_gesture() {
    let embed = Arc::new(SimulatedEmbedSdk::new());
    let bus = EventBus::default();
    let jukebox = jukebox(&bus, no_retry());
    let local = EmbedBackend::new(embed.clone(), bus.clone());
    local.initialize().await.unwrap();
    settle().await;

    let router = Arc::new(
        PlayerRouter::new(jukebox.clone(), bus.clone(), &no_retry())
            .with_local(local)
            .mobile(true),
    );
    let mut events = bus.subscribe();

    let song = sample_song();
    router.play(song.clone()).await.unwrap();
    settle().await;

    // Nothing plays until the user taps.
    assert!(embed.commands().is_empty());
    assert_eq!(jukebox.current_song(), None);
    match events.recv().await.unwrap() {
        JukeboxEvent::Playback(PlaybackEvent::TapToPlayRequired { song_id }) => {
            assert_eq!(song_id, song.id.to_string());
        }
        other => panic!("unexpected event: {other:?}"),
    }

    router.mark_user_gesture().await.unwrap();
    settle().await;

    assert_eq!(jukebox.current_song().map(|s| s.id), Some(song.id));
    assert!(embed.commands().contains(&EmbedCommand::Play));

    // Later plays are no longer gated.
    let next = default_playlist().remove(1);
    router.play(next.clone()).await.unwrap();
    assert_eq!(jukebox.current_song().map(|s| s.id), Some(next.id));
}

#[tokio::test(start_paused = true)]
async fn local_autoplay_is_retried_a_bounded_number_of_times() {
    let embed = Arc::new(SimulatedEmbedSdk::new());
    let bus = EventBus::default();
    let limits = JukeboxLimits::default();
    let jukebox = jukebox(&bus, limits);
    let local = EmbedBackend::new(embed.clone(), bus.clone());
    local.initialize().await.unwrap();
    settle().await;

    let router =
        Arc::new(PlayerRouter::new(jukebox, bus.clone(), &limits).with_local(local));

    router.play(sample_song()).await.unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;

    let plays = embed
        .commands()
        .iter()
        .filter(|command| **command == EmbedCommand::Play)
        .count();
    // Initial play plus the bounded retries, then it stops.
    assert_eq!(plays, 1 + limits.autoplay_retries as usize);
}

#[tokio::test]
async fn toggle_routes_to_the_active_backend() {
    let embed = Arc::new(SimulatedEmbedSdk::new());
    let bus = EventBus::default();
    let jukebox = jukebox(&bus, no_retry());
    let local = EmbedBackend::new(embed.clone(), bus.clone());
    local.initialize().await.unwrap();
    settle().await;

    let router = Arc::new(
        PlayerRouter::new(jukebox, bus.clone(), &no_retry()).with_local(local),
    );
    router.play(sample_song()).await.unwrap();
    settle().await;

    router.toggle_play().await.unwrap();
    assert!(embed.commands().contains(&EmbedCommand::Pause));
    router.toggle_play().await.unwrap();
    let plays = embed
        .commands()
        .iter()
        .filter(|command| **command == EmbedCommand::Play)
        .count();
    assert_eq!(plays, 2);
}
