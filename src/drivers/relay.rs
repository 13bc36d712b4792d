//! Pump cut-off relay driver.
//!
//! A single active-high GPIO drives the relay coil: energised cuts power
//! to the transfer pump.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real GPIO via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct RelayDriver {
    energised: bool,
}

impl Default for RelayDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayDriver {
    pub fn new() -> Self {
        Self { energised: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(pins::RELAY_GPIO, on);
        self.energised = on;
    }

    pub fn is_energised(&self) -> bool {
        self.energised
    }
}
