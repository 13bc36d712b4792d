//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Driven adapters (the level probe, actuators, the WiFi link, the broker
//! session) implement these traits.  The
//! [`ControlLoop`](super::service::ControlLoop) consumes them via generics,
//! so the domain core never touches hardware or sockets directly and every
//! policy is testable with mock adapters.

use crate::error::SessionError;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain the raw tank level.
pub trait SensorPort {
    /// One raw ADC reading from the level probe (0..=4095 on a 12-bit ADC).
    fn read_level_raw(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
///
/// Implementations must tolerate being told the same state every tick —
/// the control loop re-applies all outputs unconditionally.
pub trait ActuatorPort {
    /// Energise (`true`) or release (`false`) the pump cut-off relay.
    fn set_relay(&mut self, on: bool);

    /// Drive the high-level alarm LED.
    fn set_alarm_led(&mut self, on: bool);

    /// Move the inlet valve servo to the given position.
    fn set_valve(&mut self, position: ValvePosition);
}

/// Commanded inlet valve position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValvePosition {
    /// Servo at 0° — water flows into the tank.
    Open,
    /// Servo at 90° — inlet shut.
    Closed,
}

// ───────────────────────────────────────────────────────────────
// Link port (driven adapter: domain ↔ WiFi)
// ───────────────────────────────────────────────────────────────

/// Network link supervision: connectivity state plus a best-effort
/// reconnect knob.  [`LinkWatchdog`](super::link::LinkWatchdog) decides
/// *when* to use these; the adapter decides *how*.
pub trait LinkPort {
    /// Whether the station currently holds an association and address.
    fn is_connected(&self) -> bool;

    /// Kick off a reconnect attempt.  Non-blocking; progress is observed
    /// through [`is_connected`](Self::is_connected) after a grace period.
    fn reconnect(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Session port (driven adapter: domain ↔ broker)
// ───────────────────────────────────────────────────────────────

/// Broker session operations consumed by
/// [`SessionManager`](super::session::SessionManager).
///
/// `connect` tears down any previous client before dialling, so the session
/// manager can call it repeatedly with fresh client identities.
pub trait SessionPort {
    /// Whether a broker session is currently established.
    fn is_connected(&self) -> bool;

    /// Establish a session under `client_id`, replacing any prior session.
    fn connect(&mut self, client_id: &str) -> Result<(), SessionError>;

    /// Subscribe to a topic on the live session.
    fn subscribe(&mut self, topic: &str) -> Result<(), SessionError>;

    /// Publish a payload to a topic on the live session.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), SessionError>;

    /// Pop one queued inbound message into `buf`.  Returns the payload
    /// length (truncated to `buf.len()`), or `None` when the queue is empty.
    fn poll_inbound(&mut self, buf: &mut [u8]) -> Option<usize>;
}

// ───────────────────────────────────────────────────────────────
// Delay port (driven adapter: domain → time source)
// ───────────────────────────────────────────────────────────────

/// Blocking delay used for the tick interval and retry backoffs.  Mocked in
/// tests so retry schedules can be asserted without real waiting.
pub trait DelayPort {
    fn delay_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Control signals (domain → platform main loop)
// ───────────────────────────────────────────────────────────────

/// Escalation returned from the domain to the platform main loop.
///
/// Policies never reset the chip themselves; they hand the decision up and
/// the binary executes the platform restart in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Restart the device for the given reason.
    Restart(RestartReason),
}

/// Why a restart was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartReason {
    /// WiFi never came up within the first-boot window.
    BootTimeout,
    /// The link dropped and did not recover within the grace period.
    LinkLost,
    /// A RESET command arrived over the subscribed topic.
    RemoteCommand,
}

impl core::fmt::Display for RestartReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BootTimeout => write!(f, "boot WiFi timeout"),
            Self::LinkLost => write!(f, "link lost"),
            Self::RemoteCommand => write!(f, "remote RESET command"),
        }
    }
}
