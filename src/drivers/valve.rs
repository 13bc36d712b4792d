//! Inlet valve servo driver.
//!
//! A hobby servo on one LEDC channel (50 Hz, 14-bit).  The valve only ever
//! takes two commanded positions: 0° (open) and 90° (closed).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real LEDC channel via hw_init.
//! On host/test: tracks state in-memory only.

use crate::app::ports::ValvePosition;
use crate::drivers::hw_init;
use crate::pins;

pub struct ValveDriver {
    position: ValvePosition,
}

impl Default for ValveDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ValveDriver {
    /// Assumes `hw_init::init_peripherals()` has already configured the
    /// LEDC timer and channel.  Drives the servo to the open position
    /// straight away so the inlet is in its safe state before the first
    /// control tick.
    pub fn new() -> Self {
        let mut valve = Self {
            position: ValvePosition::Open,
        };
        valve.set(ValvePosition::Open);
        valve
    }

    pub fn set(&mut self, position: ValvePosition) {
        let angle = match position {
            ValvePosition::Open => 0,
            ValvePosition::Closed => 90,
        };
        hw_init::ledc_set(hw_init::LEDC_CH_VALVE, duty_for_angle(angle));
        self.position = position;
    }

    pub fn position(&self) -> ValvePosition {
        self.position
    }
}

/// Map a servo angle (0..=180) to a 14-bit LEDC duty at 50 Hz.
fn duty_for_angle(angle: u16) -> u32 {
    let angle = u64::from(angle.min(180));
    let span = u64::from(pins::SERVO_MAX_PULSE_US - pins::SERVO_MIN_PULSE_US);
    let pulse_us = u64::from(pins::SERVO_MIN_PULSE_US) + angle * span / 180;
    let duty_steps = 1u64 << pins::SERVO_PWM_RESOLUTION_BITS;
    // duty / steps == pulse / period, with period = 1e6 / freq µs.
    (pulse_us * u64::from(pins::SERVO_PWM_FREQ_HZ) * duty_steps / 1_000_000) as u32
}
