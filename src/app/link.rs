//! Link watchdog — recovers a dropped WiFi association or escalates.
//!
//! Runs at the top of every control tick, before any broker traffic.  A
//! healthy link is a no-op.  A dead one gets a single reconnect attempt and
//! a grace period; if the link is still down afterwards the watchdog asks
//! for a restart rather than limping along half-connected.

use log::{info, warn};

use super::ports::{ControlSignal, DelayPort, LinkPort, RestartReason};

/// Supervises the network link underneath the broker session.
pub struct LinkWatchdog {
    grace_ms: u32,
}

impl LinkWatchdog {
    pub fn new(grace_ms: u32) -> Self {
        Self { grace_ms }
    }

    /// Check the link, attempting one recovery cycle if it is down.
    ///
    /// Returns a restart signal when the link stayed down through the grace
    /// period; `None` when the link is (or becomes) healthy.
    pub fn check(
        &mut self,
        link: &mut impl LinkPort,
        clock: &mut impl DelayPort,
    ) -> Option<ControlSignal> {
        if link.is_connected() {
            return None;
        }

        warn!("WiFi link down; attempting reconnect");
        link.reconnect();
        clock.delay_ms(self.grace_ms);

        if link.is_connected() {
            info!("WiFi link recovered");
            return None;
        }

        warn!("WiFi link still down after {} ms grace", self.grace_ms);
        Some(ControlSignal::Restart(RestartReason::LinkLost))
    }
}
