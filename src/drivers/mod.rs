//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod hw_init;
pub mod relay;
pub mod status_led;
pub mod valve;
pub mod watchdog;
