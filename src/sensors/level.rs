//! Analog water-level probe driver.
//!
//! Reads the raw 12-bit ADC value; conversion to a fill percentage happens
//! in the control layer so the raw signal stays inspectable.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1_CH4 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_LEVEL_ADC: AtomicU16 = AtomicU16::new(0);

/// Inject a raw reading for host-side tests and simulation.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_level_adc(raw: u16) {
    SIM_LEVEL_ADC.store(raw, Ordering::Relaxed);
}

pub struct LevelSensor {
    _adc_gpio: i32,
}

impl LevelSensor {
    pub fn new(adc_gpio: i32) -> Self {
        Self {
            _adc_gpio: adc_gpio,
        }
    }

    /// One raw conversion, 0..=4095.
    pub fn read_raw(&mut self) -> u16 {
        self.read_adc()
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_LEVEL)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_LEVEL_ADC.load(Ordering::Relaxed)
    }
}
