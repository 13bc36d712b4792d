//! Mock adapters for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/PWM registers, and scripts the link,
//! broker, and clock ports so connectivity scenarios run without a radio,
//! a broker, or real waiting.

use std::collections::VecDeque;

use levelguard::app::ports::{
    ActuatorPort, DelayPort, LinkPort, SensorPort, SessionPort, ValvePosition,
};
use levelguard::error::SessionError;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    SetRelay(bool),
    SetAlarmLed(bool),
    SetValve(ValvePosition),
}

// ── MockHardware ──────────────────────────────────────────────

/// Sensor and actuator halves in one type, matching the `hw` parameter of
/// `ControlLoop::tick`.
pub struct MockHardware {
    /// Scripted raw ADC readings, consumed front to back.  When the script
    /// runs out the last reading repeats, so "level holds steady" scenarios
    /// only script the change.
    pub readings: VecDeque<u16>,
    pub last_reading: u16,
    pub reads: usize,
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            readings: VecDeque::new(),
            last_reading: 0,
            reads: 0,
            calls: Vec::new(),
        }
    }

    pub fn with_readings(raw: &[u16]) -> Self {
        let mut hw = Self::new();
        hw.readings.extend(raw.iter().copied());
        hw
    }

    pub fn relay_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetRelay(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn led_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetAlarmLed(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn valve(&self) -> Option<ValvePosition> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::SetValve(p) => Some(*p),
            _ => None,
        })
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_level_raw(&mut self) -> u16 {
        self.reads += 1;
        if let Some(raw) = self.readings.pop_front() {
            self.last_reading = raw;
        }
        self.last_reading
    }
}

impl ActuatorPort for MockHardware {
    fn set_relay(&mut self, on: bool) {
        self.calls.push(ActuatorCall::SetRelay(on));
    }

    fn set_alarm_led(&mut self, on: bool) {
        self.calls.push(ActuatorCall::SetAlarmLed(on));
    }

    fn set_valve(&mut self, position: ValvePosition) {
        self.calls.push(ActuatorCall::SetValve(position));
    }
}

// ── MockLink ──────────────────────────────────────────────────

pub struct MockLink {
    pub connected: bool,
    pub recover_on_reconnect: bool,
    pub reconnects: usize,
}

#[allow(dead_code)]
impl MockLink {
    pub fn up() -> Self {
        Self {
            connected: true,
            recover_on_reconnect: false,
            reconnects: 0,
        }
    }

    pub fn down() -> Self {
        Self {
            connected: false,
            recover_on_reconnect: false,
            reconnects: 0,
        }
    }
}

impl LinkPort for MockLink {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn reconnect(&mut self) {
        self.reconnects += 1;
        if self.recover_on_reconnect {
            self.connected = true;
        }
    }
}

// ── MockBroker ────────────────────────────────────────────────

/// Scripted broker session.  Dials are rejected while `reject_dials` is
/// non-zero, so tests can place the accepting attempt anywhere in the
/// retry burst.
pub struct MockBroker {
    pub connected: bool,
    pub reject_dials: usize,
    pub fail_subscribe: bool,
    pub fail_publish: bool,
    pub connect_ids: Vec<String>,
    pub subscribed: Vec<String>,
    pub published: Vec<(String, Vec<u8>)>,
    pub inbound: VecDeque<Vec<u8>>,
}

#[allow(dead_code)]
impl MockBroker {
    /// A broker with an already-live session and no scripted failures.
    pub fn live() -> Self {
        Self {
            connected: true,
            reject_dials: 0,
            fail_subscribe: false,
            fail_publish: false,
            connect_ids: Vec::new(),
            subscribed: Vec::new(),
            published: Vec::new(),
            inbound: VecDeque::new(),
        }
    }

    /// A reachable broker with no session yet.
    pub fn reachable() -> Self {
        Self {
            connected: false,
            ..Self::live()
        }
    }

    /// A broker that rejects every dial.
    pub fn unreachable() -> Self {
        Self {
            connected: false,
            reject_dials: usize::MAX,
            ..Self::live()
        }
    }

    pub fn push_inbound(&mut self, payload: &[u8]) {
        self.inbound.push_back(payload.to_vec());
    }

    pub fn published_strings(&self) -> Vec<String> {
        self.published
            .iter()
            .map(|(_, p)| String::from_utf8_lossy(p).into_owned())
            .collect()
    }
}

impl SessionPort for MockBroker {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self, client_id: &str) -> Result<(), SessionError> {
        self.connect_ids.push(client_id.to_owned());
        if self.reject_dials > 0 {
            self.reject_dials -= 1;
            return Err(SessionError::ConnectFailed);
        }
        self.connected = true;
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), SessionError> {
        if !self.connected {
            return Err(SessionError::NotConnected);
        }
        if self.fail_subscribe {
            return Err(SessionError::SubscribeFailed);
        }
        self.subscribed.push(topic.to_owned());
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), SessionError> {
        if !self.connected {
            return Err(SessionError::NotConnected);
        }
        if self.fail_publish {
            return Err(SessionError::PublishFailed);
        }
        self.published.push((topic.to_owned(), payload.to_vec()));
        Ok(())
    }

    fn poll_inbound(&mut self, buf: &mut [u8]) -> Option<usize> {
        let msg = self.inbound.pop_front()?;
        let n = msg.len().min(buf.len());
        buf[..n].copy_from_slice(&msg[..n]);
        Some(n)
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Records every requested delay instead of sleeping, so retry schedules
/// and tick pacing can be asserted exactly.
#[derive(Default)]
pub struct MockClock {
    pub delays: Vec<u32>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ms(&self) -> u64 {
        self.delays.iter().map(|&d| u64::from(d)).sum()
    }
}

impl DelayPort for MockClock {
    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
    }
}
