//! Streaming playback backend.
//!
//! Drives the streaming provider through two channels, the way its platform
//! requires: the player SDK bridge handles transport (pause, resume, seek,
//! volume) while starting a specific track goes through the provider's web
//! API, targeting the device id the SDK announced.
//!
//! Unlike the embedded player, this backend does not defer commands. The
//! device id only exists after the SDK's `Ready` event, and a play request
//! without one is a guaranteed remote failure, so commands issued before
//! readiness return [`PlaybackError::BackendNotReady`] immediately.

use crate::backend::{ActiveBackend, PlaybackBackend};
use crate::error::PlaybackError;
use async_trait::async_trait;
use bridge_traits::{HttpClient, HttpRequest, StreamingPlayerSdk, StreamingSdkEvent};
use core_auth::AuthSession;
use core_library::Song;
use core_runtime::{EventBus, JukeboxEvent, PlaybackEvent};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

const PLAY_ENDPOINT: &str = "https://api.spotify.com/v1/me/player/play";

/// Streaming playback through the provider SDK and web API.
pub struct StreamingBackend {
    sdk: Arc<dyn StreamingPlayerSdk>,
    http: Arc<dyn HttpClient>,
    session: Arc<AuthSession>,
    bus: EventBus,
    device_id: Mutex<Option<String>>,
}

impl StreamingBackend {
    pub fn new(
        sdk: Arc<dyn StreamingPlayerSdk>,
        http: Arc<dyn HttpClient>,
        session: Arc<AuthSession>,
        bus: EventBus,
    ) -> Arc<Self> {
        Arc::new(Self {
            sdk,
            http,
            session,
            bus,
            device_id: Mutex::new(None),
        })
    }

    /// Connects the player SDK with the session's access token and starts
    /// the event pump. The backend becomes ready only once the SDK
    /// announces a device id.
    pub async fn connect(self: &Arc<Self>) -> Result<(), PlaybackError> {
        let token = self.session.token().ok_or(PlaybackError::NotAuthenticated)?;
        let mut events = self.sdk.subscribe();
        self.sdk.connect(token.secret()).await?;

        let backend = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => backend.handle_sdk_event(event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "streaming event stream lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        Ok(())
    }

    /// Disconnects the SDK and forgets the device id.
    pub async fn disconnect(&self) -> Result<(), PlaybackError> {
        self.device_id.lock().expect("device id poisoned").take();
        Ok(self.sdk.disconnect().await?)
    }

    fn handle_sdk_event(&self, event: StreamingSdkEvent) {
        match event {
            StreamingSdkEvent::Ready { device_id } => {
                info!(%device_id, "streaming device online");
                *self.device_id.lock().expect("device id poisoned") = Some(device_id);
                let _ = self.bus.emit(JukeboxEvent::Playback(PlaybackEvent::BackendReady {
                    backend: "streaming".to_string(),
                }));
            }
            StreamingSdkEvent::NotReady { device_id } => {
                warn!(%device_id, "streaming device went offline");
                self.device_id.lock().expect("device id poisoned").take();
            }
            StreamingSdkEvent::StateChanged { .. } => {}
            StreamingSdkEvent::InitializationError { message }
            | StreamingSdkEvent::AuthenticationError { message }
            | StreamingSdkEvent::PlaybackError { message } => {
                let _ = self.bus.emit(JukeboxEvent::Playback(PlaybackEvent::BackendError {
                    backend: "streaming".to_string(),
                    message,
                    recoverable: false,
                }));
            }
        }
    }

    fn ready_device(&self) -> Result<String, PlaybackError> {
        self.device_id
            .lock()
            .expect("device id poisoned")
            .clone()
            .ok_or(PlaybackError::BackendNotReady {
                backend: "streaming",
            })
    }

    /// Starts a specific track on the announced device via the web API.
    async fn play_uri(&self, uri: &str) -> Result<(), PlaybackError> {
        let device_id = self.ready_device()?;
        let token = self.session.token().ok_or(PlaybackError::NotAuthenticated)?;

        let body = serde_json::json!({ "uris": [uri] }).to_string();
        let request = HttpRequest::put(format!("{PLAY_ENDPOINT}?device_id={device_id}"))
            .header("Content-Type", "application/json")
            .header("Authorization", token.authorization_header())
            .body(body);

        let response = self.http.execute(request).await?;
        if !response.is_success() {
            return Err(PlaybackError::PlayRequestFailed {
                status: response.status,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PlaybackBackend for StreamingBackend {
    fn kind(&self) -> ActiveBackend {
        ActiveBackend::Streaming
    }

    fn is_ready(&self) -> bool {
        self.device_id.lock().expect("device id poisoned").is_some()
    }

    async fn load_track(&self, song: &Song) -> Result<(), PlaybackError> {
        let uri = song
            .spotify_uri()
            .ok_or_else(|| PlaybackError::TrackUnavailable {
                backend: "streaming",
                reason: format!("\"{}\" has no streaming track id", song.title),
            })?;
        self.play_uri(&uri).await
    }

    async fn play(&self) -> Result<(), PlaybackError> {
        self.ready_device()?;
        Ok(self.sdk.resume().await?)
    }

    async fn pause(&self) -> Result<(), PlaybackError> {
        self.ready_device()?;
        Ok(self.sdk.pause().await?)
    }

    async fn seek(&self, position: std::time::Duration) -> Result<(), PlaybackError> {
        self.ready_device()?;
        Ok(self.sdk.seek(position).await?)
    }

    async fn set_volume(&self, volume: f32) -> Result<(), PlaybackError> {
        self.ready_device()?;
        Ok(self.sdk.set_volume(volume.clamp(0.0, 1.0)).await?)
    }
}

impl std::fmt::Debug for StreamingBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingBackend")
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}
