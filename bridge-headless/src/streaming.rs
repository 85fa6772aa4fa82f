//! Scripted streaming playback SDK.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::player::{StreamingPlayerSdk, StreamingSdkEvent};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 32;

/// Commands the simulated streaming player has received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamCommand {
    Pause,
    Resume,
    Seek(Duration),
    Volume(f32),
}

#[derive(Debug, Default)]
struct StreamInner {
    access_token: Option<String>,
    device_id: Option<String>,
    commands: Vec<StreamCommand>,
    fail_connect: bool,
}

/// Simulated streaming playback SDK.
///
/// Connecting stores the token; readiness is a separate step the test
/// triggers with [`announce_device`](SimulatedStreamingSdk::announce_device),
/// mirroring the real SDK's device-registration callback.
#[derive(Debug)]
pub struct SimulatedStreamingSdk {
    events: broadcast::Sender<StreamingSdkEvent>,
    inner: Mutex<StreamInner>,
}

impl Default for SimulatedStreamingSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedStreamingSdk {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            events,
            inner: Mutex::new(StreamInner::default()),
        }
    }

    /// Make the next `connect` fail, as when the SDK script cannot load.
    pub fn fail_connect(&self) {
        self.inner.lock().expect("stream poisoned").fail_connect = true;
    }

    /// Simulate the SDK registering a playback device.
    pub fn announce_device(&self, device_id: &str) {
        self.inner.lock().expect("stream poisoned").device_id = Some(device_id.to_string());
        let _ = self.events.send(StreamingSdkEvent::Ready {
            device_id: device_id.to_string(),
        });
    }

    /// Simulate the device dropping off.
    pub fn drop_device(&self) {
        let device_id = self
            .inner
            .lock()
            .expect("stream poisoned")
            .device_id
            .take();
        if let Some(device_id) = device_id {
            let _ = self.events.send(StreamingSdkEvent::NotReady { device_id });
        }
    }

    /// The token the last `connect` supplied.
    pub fn connected_token(&self) -> Option<String> {
        self.inner.lock().expect("stream poisoned").access_token.clone()
    }

    /// Commands received so far.
    pub fn commands(&self) -> Vec<StreamCommand> {
        self.inner.lock().expect("stream poisoned").commands.clone()
    }

    fn record(&self, command: StreamCommand) -> Result<()> {
        let mut inner = self.inner.lock().expect("stream poisoned");
        if inner.access_token.is_none() {
            return Err(BridgeError::NotAvailable(
                "streaming SDK not connected".to_string(),
            ));
        }
        inner.commands.push(command);
        Ok(())
    }
}

#[async_trait]
impl StreamingPlayerSdk for SimulatedStreamingSdk {
    async fn connect(&self, access_token: &str) -> Result<()> {
        let mut inner = self.inner.lock().expect("stream poisoned");
        if inner.fail_connect {
            inner.fail_connect = false;
            drop(inner);
            let _ = self.events.send(StreamingSdkEvent::InitializationError {
                message: "SDK script failed to load".to_string(),
            });
            return Err(BridgeError::OperationFailed(
                "streaming SDK failed to initialize".to_string(),
            ));
        }
        inner.access_token = Some(access_token.to_string());
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.record(StreamCommand::Pause)
    }

    async fn resume(&self) -> Result<()> {
        self.record(StreamCommand::Resume)
    }

    async fn seek(&self, position: Duration) -> Result<()> {
        self.record(StreamCommand::Seek(position))
    }

    async fn set_volume(&self, volume: f32) -> Result<()> {
        self.record(StreamCommand::Volume(volume))
    }

    async fn disconnect(&self) -> Result<()> {
        let device_id = {
            let mut inner = self.inner.lock().expect("stream poisoned");
            inner.access_token = None;
            inner.device_id.take()
        };
        if let Some(device_id) = device_id {
            let _ = self.events.send(StreamingSdkEvent::NotReady { device_id });
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StreamingSdkEvent> {
        self.events.subscribe()
    }
}
