//! Scripted embedded-video SDK.

use std::sync::Mutex;
use std::time::Duration;

use std::sync::Arc;

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::player::{EmbedPlayerSdk, EmbedPlayerState, EmbedSdkEvent};
use tokio::sync::{broadcast, Notify};

const EVENT_CAPACITY: usize = 32;

/// Commands the simulated player has received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbedCommand {
    Cue(String),
    Play,
    Pause,
    Seek(Duration),
    Volume(f32),
}

#[derive(Debug, Default)]
struct EmbedInner {
    load_requested: bool,
    loaded: bool,
    commands: Vec<EmbedCommand>,
}

/// Simulated embedded video player.
///
/// In `manual` mode the script "loads" only when the test calls
/// [`fire_ready`](SimulatedEmbedSdk::fire_ready), which reproduces the real
/// SDK's late global ready callback. Commands before readiness fail, so the
/// adapter's deferral logic is actually exercised.
#[derive(Debug)]
pub struct SimulatedEmbedSdk {
    events: broadcast::Sender<EmbedSdkEvent>,
    inner: Mutex<EmbedInner>,
    auto_ready: bool,
    cue_gate: Mutex<Option<Arc<Notify>>>,
}

impl SimulatedEmbedSdk {
    /// SDK that becomes ready as soon as loading is requested.
    pub fn new() -> Self {
        Self::with_auto_ready(true)
    }

    /// SDK that stays unloaded until [`fire_ready`](Self::fire_ready).
    pub fn manual() -> Self {
        Self::with_auto_ready(false)
    }

    fn with_auto_ready(auto_ready: bool) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            events,
            inner: Mutex::new(EmbedInner::default()),
            auto_ready,
            cue_gate: Mutex::new(None),
        }
    }

    /// Stalls the next `cue_video` call until the returned handle is
    /// notified. Reproduces a slow cue resolving after later commands.
    pub fn hold_next_cue(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.cue_gate.lock().expect("embed poisoned") = Some(Arc::clone(&gate));
        gate
    }

    /// Simulate the SDK's global ready callback firing.
    pub fn fire_ready(&self) {
        self.inner.lock().expect("embed poisoned").loaded = true;
        let _ = self.events.send(EmbedSdkEvent::Ready);
    }

    /// Simulate a player state transition pushed by the SDK.
    pub fn emit_state(&self, state: EmbedPlayerState) {
        let _ = self.events.send(EmbedSdkEvent::StateChanged(state));
    }

    /// Simulate a player error callback.
    pub fn emit_error(&self, code: i32) {
        let _ = self.events.send(EmbedSdkEvent::Error { code });
    }

    /// Commands received so far.
    pub fn commands(&self) -> Vec<EmbedCommand> {
        self.inner.lock().expect("embed poisoned").commands.clone()
    }

    /// Whether script loading was ever requested.
    pub fn load_requested(&self) -> bool {
        self.inner.lock().expect("embed poisoned").load_requested
    }

    fn record(&self, command: EmbedCommand) -> Result<()> {
        let mut inner = self.inner.lock().expect("embed poisoned");
        if !inner.loaded {
            return Err(BridgeError::NotAvailable(
                "embed SDK script not loaded".to_string(),
            ));
        }
        inner.commands.push(command);
        Ok(())
    }
}

impl Default for SimulatedEmbedSdk {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbedPlayerSdk for SimulatedEmbedSdk {
    async fn ensure_loaded(&self) -> Result<()> {
        let fire = {
            let mut inner = self.inner.lock().expect("embed poisoned");
            inner.load_requested = true;
            self.auto_ready && !inner.loaded
        };
        if fire {
            self.fire_ready();
        }
        Ok(())
    }

    async fn cue_video(&self, video_id: &str) -> Result<()> {
        let gate = self.cue_gate.lock().expect("embed poisoned").take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.record(EmbedCommand::Cue(video_id.to_string()))
    }

    async fn play(&self) -> Result<()> {
        self.record(EmbedCommand::Play)
    }

    async fn pause(&self) -> Result<()> {
        self.record(EmbedCommand::Pause)
    }

    async fn seek(&self, position: Duration) -> Result<()> {
        self.record(EmbedCommand::Seek(position))
    }

    async fn set_volume(&self, volume: f32) -> Result<()> {
        self.record(EmbedCommand::Volume(volume))
    }

    fn subscribe(&self) -> broadcast::Receiver<EmbedSdkEvent> {
        self.events.subscribe()
    }
}
