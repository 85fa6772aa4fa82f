//! Scripted cast receiver SDK.

use std::sync::Mutex;

use async_trait::async_trait;
use bridge_traits::cast::{CastMediaRequest, CastSdk, CastSdkEvent, CastState};
use bridge_traits::error::{BridgeError, Result};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 32;

/// Receiver media commands, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastCommand {
    Play,
    Pause,
}

#[derive(Debug)]
struct CastInner {
    available: bool,
    grant_sessions: bool,
    refuse_loads: bool,
    state: CastState,
    has_session: bool,
    loads: Vec<CastMediaRequest>,
    commands: Vec<CastCommand>,
}

impl Default for CastInner {
    fn default() -> Self {
        Self {
            available: true,
            grant_sessions: true,
            refuse_loads: false,
            state: CastState::NotConnected,
            has_session: false,
            loads: Vec::new(),
            commands: Vec::new(),
        }
    }
}

/// Simulated cast framework.
///
/// Sessions are granted (or refused) synchronously; state changes are pushed
/// on the event channel the way the real framework's state-change listener
/// would deliver them.
#[derive(Debug)]
pub struct SimulatedCastSdk {
    events: broadcast::Sender<CastSdkEvent>,
    inner: Mutex<CastInner>,
}

impl Default for SimulatedCastSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedCastSdk {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            events,
            inner: Mutex::new(CastInner::default()),
        }
    }

    /// Simulate a host without the cast runtime.
    pub fn set_available(&self, available: bool) {
        self.inner.lock().expect("cast poisoned").available = available;
    }

    /// Refuse future session requests (user dismissed the device picker).
    pub fn deny_sessions(&self) {
        self.inner.lock().expect("cast poisoned").grant_sessions = false;
    }

    /// Make future media loads fail (receiver rejected the payload).
    pub fn refuse_loads(&self) {
        self.inner.lock().expect("cast poisoned").refuse_loads = true;
    }

    /// Media payloads the receiver accepted.
    pub fn loads(&self) -> Vec<CastMediaRequest> {
        self.inner.lock().expect("cast poisoned").loads.clone()
    }

    /// Receiver play/pause commands seen so far.
    pub fn commands(&self) -> Vec<CastCommand> {
        self.inner.lock().expect("cast poisoned").commands.clone()
    }

    fn set_state(&self, state: CastState) {
        self.inner.lock().expect("cast poisoned").state = state;
        let _ = self.events.send(CastSdkEvent::StateChanged(state));
    }
}

#[async_trait]
impl CastSdk for SimulatedCastSdk {
    async fn initialize(&self) -> Result<bool> {
        Ok(self.inner.lock().expect("cast poisoned").available)
    }

    fn cast_state(&self) -> CastState {
        self.inner.lock().expect("cast poisoned").state
    }

    fn has_session(&self) -> bool {
        self.inner.lock().expect("cast poisoned").has_session
    }

    async fn request_session(&self) -> Result<()> {
        let granted = {
            let inner = self.inner.lock().expect("cast poisoned");
            inner.available && inner.grant_sessions
        };
        if !granted {
            return Err(BridgeError::OperationFailed(
                "cast session request was refused".to_string(),
            ));
        }
        self.inner.lock().expect("cast poisoned").has_session = true;
        self.set_state(CastState::Connected);
        Ok(())
    }

    async fn load_media(&self, request: CastMediaRequest) -> Result<()> {
        let mut inner = self.inner.lock().expect("cast poisoned");
        if !inner.has_session {
            return Err(BridgeError::NotAvailable(
                "no active cast session".to_string(),
            ));
        }
        if inner.refuse_loads {
            return Err(BridgeError::OperationFailed(
                "receiver rejected the media load".to_string(),
            ));
        }
        inner.loads.push(request);
        Ok(())
    }

    async fn media_play(&self) -> Result<()> {
        self.inner.lock().expect("cast poisoned").commands.push(CastCommand::Play);
        Ok(())
    }

    async fn media_pause(&self) -> Result<()> {
        self.inner.lock().expect("cast poisoned").commands.push(CastCommand::Pause);
        Ok(())
    }

    async fn end_session(&self) -> Result<()> {
        self.inner.lock().expect("cast poisoned").has_session = false;
        self.set_state(CastState::NotConnected);
        let _ = self.events.send(CastSdkEvent::SessionEnded);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<CastSdkEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(url: &str) -> CastMediaRequest {
        CastMediaRequest {
            content_url: url.to_string(),
            content_type: "text/html".to_string(),
            title: "Title".to_string(),
            subtitle: "Artist".to_string(),
            image_url: None,
            autoplay: true,
        }
    }

    #[tokio::test]
    async fn session_then_load() {
        let sdk = SimulatedCastSdk::new();
        assert!(sdk.initialize().await.unwrap());
        assert!(!sdk.has_session());

        sdk.request_session().await.unwrap();
        assert_eq!(sdk.cast_state(), CastState::Connected);

        sdk.load_media(media("data:text/html,hi")).await.unwrap();
        assert_eq!(sdk.loads().len(), 1);
    }

    #[tokio::test]
    async fn load_without_session_fails() {
        let sdk = SimulatedCastSdk::new();
        assert!(sdk.load_media(media("data:text/html,hi")).await.is_err());
    }

    #[tokio::test]
    async fn denied_session() {
        let sdk = SimulatedCastSdk::new();
        sdk.deny_sessions();
        assert!(sdk.request_session().await.is_err());
        assert!(!sdk.has_session());
    }
}
