//! High-level alarm LED driver.
//!
//! A single active-high GPIO drives the indicator LED on the tank panel.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real GPIO via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct AlarmLed {
    lit: bool,
}

impl Default for AlarmLed {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmLed {
    pub fn new() -> Self {
        Self { lit: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(pins::ALARM_LED_GPIO, on);
        self.lit = on;
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
