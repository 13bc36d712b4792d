//! Broker session lifecycle and reporting.
//!
//! [`SessionManager`] owns the connect/retry policy: a bounded burst of
//! connection attempts per tick, a fresh client identity per attempt, and a
//! fixed backoff after every failure.  Once a session is live it subscribes
//! to the alert topic, announces itself, and from then on drains inbound
//! commands and publishes level reports on threshold crossings.

use core::fmt::Write;

use log::{debug, error, info, warn};

use crate::config::SystemConfig;
use crate::control::threshold::Evaluation;

use super::ports::{ControlSignal, DelayPort, RestartReason, SessionPort};

/// Announcement published once per fresh session.
const ONLINE_MESSAGE: &str = "device online";

/// Byte pattern that requests a device restart.
pub const RESET_COMMAND: &[u8] = b"RESET";

/// Largest inbound payload the command scanner looks at.  Longer messages
/// are truncated by the session adapter before they reach the domain.
pub const MAX_COMMAND_LEN: usize = 256;

/// Case-sensitive scan for the RESET command anywhere in a payload.
///
/// Matches the bare command and any payload embedding it (`"RESETX"`
/// triggers); lowercase `"reset"` does not.
pub fn contains_reset_command(payload: &[u8]) -> bool {
    payload
        .windows(RESET_COMMAND.len())
        .any(|w| w == RESET_COMMAND)
}

/// Drives the broker session state machine and owns the reporting policy.
pub struct SessionManager {
    topic: heapless::String<64>,
    client_id_prefix: heapless::String<24>,
    max_attempts: u8,
    backoff_ms: u32,
    id_state: u16,
    was_connected: bool,
}

impl SessionManager {
    /// `id_seed` feeds the client identity generator; pass fresh entropy at
    /// boot so two devices on the same site do not walk the same sequence.
    pub fn new(config: &SystemConfig, id_seed: u16) -> Self {
        Self {
            topic: config.topic.clone(),
            client_id_prefix: config.client_id_prefix.clone(),
            max_attempts: config.session_max_attempts,
            backoff_ms: config.session_retry_backoff_ms,
            id_state: id_seed,
            was_connected: false,
        }
    }

    /// Make sure a broker session exists, retrying a bounded number of times.
    ///
    /// Inbound traffic is drained whenever a live session is available, so a
    /// RESET command queued while the loop was busy still takes effect on
    /// the tick that sees it.  When every attempt fails the manager stays
    /// disconnected and returns; the next tick retries from attempt one.
    pub fn ensure(
        &mut self,
        broker: &mut impl SessionPort,
        clock: &mut impl DelayPort,
    ) -> Option<ControlSignal> {
        if broker.is_connected() {
            self.was_connected = true;
            return self.drain_inbound(broker);
        }

        if self.was_connected {
            warn!("broker session dropped; reconnecting");
            self.was_connected = false;
        }

        for attempt in 1..=self.max_attempts {
            let client_id = self.next_client_id();
            info!(
                "connecting to broker as {} (attempt {}/{})",
                client_id.as_str(),
                attempt,
                self.max_attempts
            );

            match broker.connect(client_id.as_str()) {
                Ok(()) => {
                    info!("broker session established");
                    self.was_connected = true;
                    self.on_connected(broker);
                    return self.drain_inbound(broker);
                }
                Err(err) => warn!("broker connect failed: {}", err),
            }

            // After every failure, the final attempt included.
            clock.delay_ms(self.backoff_ms);
        }

        error!(
            "broker unreachable after {} attempts; will retry next tick",
            self.max_attempts
        );
        None
    }

    /// Publish an alert or all-clear, but only on the tick where the alarm
    /// state actually flipped.  Failures are logged and dropped; the next
    /// crossing is the recovery mechanism.
    pub fn publish_if_changed(&mut self, broker: &mut impl SessionPort, eval: &Evaluation) {
        if !eval.changed {
            return;
        }
        if !broker.is_connected() {
            debug!("level report dropped; no broker session");
            return;
        }

        let mut msg: heapless::String<96> = heapless::String::new();
        let _ = if eval.active {
            write!(
                msg,
                "ALERT: water level high ({}%), closing valve",
                eval.percent
            )
        } else {
            write!(msg, "Water level normal ({}%), valve open", eval.percent)
        };

        match broker.publish(self.topic.as_str(), msg.as_bytes()) {
            Ok(()) => info!("published level report: {}", msg.as_str()),
            Err(err) => warn!("level report dropped: {}", err),
        }
    }

    /// Post-connect housekeeping: subscribe to the alert topic and announce
    /// presence.  Neither failure tears the session down.
    fn on_connected(&mut self, broker: &mut impl SessionPort) {
        if let Err(err) = broker.subscribe(self.topic.as_str()) {
            warn!("subscribe to {} failed: {}", self.topic.as_str(), err);
        }
        if let Err(err) = broker.publish(self.topic.as_str(), ONLINE_MESSAGE.as_bytes()) {
            warn!("online announcement dropped: {}", err);
        }
    }

    /// Pop and scan every queued inbound message.
    fn drain_inbound(&mut self, broker: &mut impl SessionPort) -> Option<ControlSignal> {
        let mut buf = [0u8; MAX_COMMAND_LEN];
        while let Some(len) = broker.poll_inbound(&mut buf) {
            let payload = &buf[..len.min(buf.len())];
            if contains_reset_command(payload) {
                warn!("RESET command received on {}", self.topic.as_str());
                return Some(ControlSignal::Restart(RestartReason::RemoteCommand));
            }
            debug!("ignoring inbound message ({} bytes)", payload.len());
        }
        None
    }

    /// Next client identity: the configured prefix plus four hex digits from
    /// a full-period 16-bit LCG, so consecutive attempts never collide.
    fn next_client_id(&mut self) -> heapless::String<32> {
        self.id_state = self.id_state.wrapping_mul(25173).wrapping_add(13849);
        let mut id = heapless::String::new();
        let _ = write!(id, "{}{:04x}", self.client_id_prefix.as_str(), self.id_state);
        id
    }
}
