//! Control loop — the hexagonal core.
//!
//! [`ControlLoop`] owns the sample filter, the threshold controller, and the
//! connectivity policies, and runs them in a fixed order every tick:
//!
//! ```text
//!  link check → broker session → sample → evaluate → actuate → report → delay
//! ```
//!
//! All I/O flows through port traits injected at the call site, making the
//! entire loop testable with mock adapters.

use crate::config::SystemConfig;
use crate::control::threshold::{Evaluation, ThresholdController};
use crate::sensors::filter::SampleFilter;

use super::link::LinkWatchdog;
use super::ports::{
    ActuatorPort, ControlSignal, DelayPort, LinkPort, SensorPort, SessionPort, ValvePosition,
};
use super::session::SessionManager;

/// Orchestrates one controller tick end to end.
pub struct ControlLoop {
    filter: SampleFilter,
    threshold: ThresholdController,
    link: LinkWatchdog,
    session: SessionManager,
    tick_interval_ms: u32,
    tick_count: u64,
}

impl ControlLoop {
    /// `session_id_seed` feeds the broker client identity generator; see
    /// [`SessionManager::new`].
    pub fn new(config: &SystemConfig, session_id_seed: u16) -> Self {
        Self {
            filter: SampleFilter::default(),
            threshold: ThresholdController::new(
                config.sensor_full_scale,
                config.level_threshold_percent,
            ),
            link: LinkWatchdog::new(config.link_grace_ms),
            session: SessionManager::new(config, session_id_seed),
            tick_interval_ms: config.tick_interval_ms,
            tick_count: 0,
        }
    }

    /// Run one full control cycle.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`] — this avoids a double mutable borrow while keeping
    /// the port boundary explicit.  Returns a restart signal when a
    /// connectivity policy or an inbound command escalates; the caller owns
    /// the actual reset.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        link: &mut impl LinkPort,
        broker: &mut impl SessionPort,
        clock: &mut impl DelayPort,
    ) -> Option<ControlSignal> {
        self.tick_count += 1;

        // 1. Link supervision, before any broker traffic
        if let Some(signal) = self.link.check(link, clock) {
            return Some(signal);
        }

        // 2. Broker session and inbound commands
        if let Some(signal) = self.session.ensure(broker, clock) {
            return Some(signal);
        }

        // 3. Sample the level probe through the smoothing filter
        let filtered = self.filter.sample(hw.read_level_raw());

        // 4. Threshold evaluation; outputs are re-applied every tick
        let eval = self.threshold.evaluate(filtered);
        self.apply_actuators(hw, &eval);

        // 5. Report crossings only
        self.session.publish_if_changed(broker, &eval);

        // 6. Tick pacing
        clock.delay_ms(self.tick_interval_ms);
        None
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Drive all three outputs from one evaluation.  Unconditional: a level
    /// holding above threshold keeps commanding the same safe state.
    fn apply_actuators(&self, hw: &mut impl ActuatorPort, eval: &Evaluation) {
        hw.set_relay(eval.active);
        hw.set_alarm_led(eval.active);
        hw.set_valve(if eval.active {
            ValvePosition::Closed
        } else {
            ValvePosition::Open
        });
    }
}
