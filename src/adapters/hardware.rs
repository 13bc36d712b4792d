//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the level sensor and all actuator drivers, exposing them through
//! [`SensorPort`] and [`ActuatorPort`].  This is the only module in the
//! system that touches actual hardware.  On non-espidf targets, the
//! underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{ActuatorPort, SensorPort, ValvePosition};
use crate::drivers::relay::RelayDriver;
use crate::drivers::status_led::AlarmLed;
use crate::drivers::valve::ValveDriver;
use crate::sensors::level::LevelSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    level: LevelSensor,
    relay: RelayDriver,
    led: AlarmLed,
    valve: ValveDriver,
}

impl HardwareAdapter {
    pub fn new(level: LevelSensor, relay: RelayDriver, led: AlarmLed, valve: ValveDriver) -> Self {
        Self {
            level,
            relay,
            led,
            valve,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_level_raw(&mut self) -> u16 {
        self.level.read_raw()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_relay(&mut self, on: bool) {
        self.relay.set(on);
    }

    fn set_alarm_led(&mut self, on: bool) {
        self.led.set(on);
    }

    fn set_valve(&mut self, position: ValvePosition) {
        self.valve.set(position);
    }
}
