//! MQTT broker session adapter.
//!
//! Implements [`SessionPort`] over `esp_idf_svc`'s MQTT client.  Each
//! `connect` call builds a brand-new client under the identity the session
//! manager hands it; the previous client (if any) is dropped first, which
//! tears down its socket and background task.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real `EspMqttClient` with an event
//!   callback that tracks connection state and queues inbound payloads.
//! - **all other targets**: an in-memory simulation for host-side tests.

use core::fmt::Write;
use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::mqtt::client::{
    Details, EspMqttClient, EspMqttEvent, EventPayload, MqttClientConfiguration, QoS,
};
#[cfg(target_os = "espidf")]
use log::info;
use log::warn;

use crate::app::ports::SessionPort;
use crate::app::session::MAX_COMMAND_LEN;
use crate::config::SystemConfig;
use crate::error::SessionError;

/// Inbound messages buffered between ticks.  The drain in `ensure` empties
/// the queue every tick, so depth only matters for bursts inside one tick.
pub const INBOUND_QUEUE_DEPTH: usize = 4;

/// How long one `connect` call waits for the broker handshake.  Together
/// with the retry backoff this bounds the blocking time of a full attempt
/// burst; `SystemConfig::watchdog_timeout_secs` must outlast it.
pub const CONNECT_WAIT_MS: u32 = 5_000;

#[cfg(target_os = "espidf")]
const CONNECT_POLL_MS: u32 = 100;

type InboundQueue = heapless::Deque<heapless::Vec<u8, MAX_COMMAND_LEN>, INBOUND_QUEUE_DEPTH>;

// ───────────────────────────────────────────────────────────────
// Shared callback state (espidf builds only)
// ───────────────────────────────────────────────────────────────

/// Set by the MQTT event callback, read from the control loop task.
#[cfg(target_os = "espidf")]
static CONNECTED: AtomicBool = AtomicBool::new(false);

#[cfg(target_os = "espidf")]
static INBOUND: std::sync::Mutex<InboundQueue> = std::sync::Mutex::new(heapless::Deque::new());

#[cfg(target_os = "espidf")]
fn handle_mqtt_event(event: EspMqttEvent<'_>) {
    match event.payload() {
        EventPayload::Connected(_) => {
            CONNECTED.store(true, Ordering::Release);
        }
        EventPayload::Disconnected => {
            CONNECTED.store(false, Ordering::Release);
        }
        EventPayload::Received { data, details, .. } => {
            // Chunked continuations of oversized messages are dropped;
            // the command scanner only sees complete payloads.
            if matches!(details, Details::Complete) {
                push_inbound(data);
            }
        }
        EventPayload::Error(err) => {
            warn!("MQTT event error: {:?}", err);
        }
        _ => {}
    }
}

#[cfg(target_os = "espidf")]
fn push_inbound(data: &[u8]) {
    let take = data.len().min(MAX_COMMAND_LEN);
    let mut msg: heapless::Vec<u8, MAX_COMMAND_LEN> = heapless::Vec::new();
    let _ = msg.extend_from_slice(&data[..take]);
    if let Ok(mut queue) = INBOUND.lock() {
        if queue.push_back(msg).is_err() {
            warn!("inbound queue full; dropping message ({} bytes)", take);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Simulation state (host builds only)
// ───────────────────────────────────────────────────────────────

/// Whether the simulated broker accepts connections.  Defaults to up.
#[cfg(not(target_os = "espidf"))]
static SIM_BROKER_UP: AtomicBool = AtomicBool::new(true);

/// Test injection: make the simulated broker accept or refuse connections.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_broker_up(up: bool) {
    SIM_BROKER_UP.store(up, Ordering::Relaxed);
}

// ───────────────────────────────────────────────────────────────
// MQTT adapter
// ───────────────────────────────────────────────────────────────

pub struct MqttAdapter {
    broker_host: heapless::String<64>,
    broker_port: u16,
    #[cfg(target_os = "espidf")]
    client: Option<EspMqttClient<'static>>,
    #[cfg(not(target_os = "espidf"))]
    sim_connected: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_inbound: InboundQueue,
}

impl MqttAdapter {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            broker_host: config.broker_host.clone(),
            broker_port: config.broker_port,
            #[cfg(target_os = "espidf")]
            client: None,
            #[cfg(not(target_os = "espidf"))]
            sim_connected: false,
            #[cfg(not(target_os = "espidf"))]
            sim_inbound: heapless::Deque::new(),
        }
    }

    fn broker_url(&self) -> heapless::String<96> {
        let mut url = heapless::String::new();
        let _ = write!(url, "mqtt://{}:{}", self.broker_host, self.broker_port);
        url
    }

    /// Test injection: queue an inbound payload as if the broker delivered
    /// it.  Truncates at [`MAX_COMMAND_LEN`] like the real event callback.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_push_inbound(&mut self, payload: &[u8]) {
        let take = payload.len().min(MAX_COMMAND_LEN);
        let mut msg: heapless::Vec<u8, MAX_COMMAND_LEN> = heapless::Vec::new();
        let _ = msg.extend_from_slice(&payload[..take]);
        if self.sim_inbound.push_back(msg).is_err() {
            warn!("sim inbound queue full; dropping message");
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self, client_id: &str) -> Result<(), SessionError> {
        // Drop any stale client first: this closes its socket and stops
        // its task before the fresh identity dials in.
        self.client = None;
        CONNECTED.store(false, Ordering::Release);
        if let Ok(mut queue) = INBOUND.lock() {
            queue.clear();
        }

        let url = self.broker_url();
        let conf = MqttClientConfiguration {
            client_id: Some(client_id),
            ..Default::default()
        };

        let client = EspMqttClient::new_cb(url.as_str(), &conf, handle_mqtt_event)
            .map_err(|err| {
                warn!("MQTT client init failed: {}", err);
                SessionError::ConnectFailed
            })?;

        let mut waited_ms = 0u32;
        while waited_ms < CONNECT_WAIT_MS {
            if CONNECTED.load(Ordering::Acquire) {
                info!("MQTT: session up against {}", url.as_str());
                self.client = Some(client);
                return Ok(());
            }
            esp_idf_hal::delay::FreeRtos::delay_ms(CONNECT_POLL_MS);
            waited_ms = waited_ms.saturating_add(CONNECT_POLL_MS);
        }

        warn!("MQTT: no CONNACK within {} ms", CONNECT_WAIT_MS);
        Err(SessionError::ConnectFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self, client_id: &str) -> Result<(), SessionError> {
        self.sim_connected = false;
        self.sim_inbound.clear();
        if !SIM_BROKER_UP.load(Ordering::Relaxed) {
            warn!("MQTT(sim): broker refused {}", client_id);
            return Err(SessionError::ConnectFailed);
        }
        self.sim_connected = true;
        log::info!(
            "MQTT(sim): {} connected to {}",
            client_id,
            self.broker_url().as_str()
        );
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// SessionPort
// ───────────────────────────────────────────────────────────────

impl SessionPort for MqttAdapter {
    #[cfg(target_os = "espidf")]
    fn is_connected(&self) -> bool {
        self.client.is_some() && CONNECTED.load(Ordering::Acquire)
    }

    #[cfg(not(target_os = "espidf"))]
    fn is_connected(&self) -> bool {
        self.sim_connected && SIM_BROKER_UP.load(Ordering::Relaxed)
    }

    fn connect(&mut self, client_id: &str) -> Result<(), SessionError> {
        self.platform_connect(client_id)
    }

    #[cfg(target_os = "espidf")]
    fn subscribe(&mut self, topic: &str) -> Result<(), SessionError> {
        let Some(client) = self.client.as_mut() else {
            return Err(SessionError::NotConnected);
        };
        client
            .subscribe(topic, QoS::AtMostOnce)
            .map(|_| ())
            .map_err(|err| {
                warn!("MQTT subscribe failed: {}", err);
                SessionError::SubscribeFailed
            })
    }

    #[cfg(not(target_os = "espidf"))]
    fn subscribe(&mut self, _topic: &str) -> Result<(), SessionError> {
        if !self.sim_connected {
            return Err(SessionError::NotConnected);
        }
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), SessionError> {
        let Some(client) = self.client.as_mut() else {
            return Err(SessionError::NotConnected);
        };
        // Fire-and-forget QoS 0, matching the reporting policy: a lost
        // report is recovered by the next threshold crossing.
        client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .map(|_| ())
            .map_err(|err| {
                warn!("MQTT publish failed: {}", err);
                SessionError::PublishFailed
            })
    }

    #[cfg(not(target_os = "espidf"))]
    fn publish(&mut self, _topic: &str, _payload: &[u8]) -> Result<(), SessionError> {
        if !self.sim_connected {
            return Err(SessionError::NotConnected);
        }
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn poll_inbound(&mut self, buf: &mut [u8]) -> Option<usize> {
        let mut queue = INBOUND.lock().ok()?;
        let msg = queue.pop_front()?;
        let len = msg.len().min(buf.len());
        buf[..len].copy_from_slice(&msg[..len]);
        Some(len)
    }

    #[cfg(not(target_os = "espidf"))]
    fn poll_inbound(&mut self, buf: &mut [u8]) -> Option<usize> {
        let msg = self.sim_inbound.pop_front()?;
        let len = msg.len().min(buf.len());
        buf[..len].copy_from_slice(&msg[..len]);
        Some(len)
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
