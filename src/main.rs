//! LevelGuard Firmware — Main Entry Point
//!
//! Hexagonal architecture around a fixed-cadence control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                   │
//! │                                                            │
//! │  HardwareAdapter      WifiAdapter      MqttAdapter         │
//! │  (Sensor+Actuator)    (LinkPort)       (SessionPort)       │
//! │  Esp32TimeAdapter                                          │
//! │  (DelayPort)                                               │
//! │                                                            │
//! │  ──────────────── Port Trait Boundary ───────────────      │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────┐      │
//! │  │             ControlLoop (pure logic)             │      │
//! │  │  SampleFilter · ThresholdController              │      │
//! │  │  LinkWatchdog · SessionManager                   │      │
//! │  └──────────────────────────────────────────────────┘      │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recovery policy: the domain never resets the chip itself.  Every
//! unrecoverable condition surfaces as a `ControlSignal` from
//! `ControlLoop::tick`, and `main` executes the restart in exactly one
//! place.
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod error;
mod pins;

pub mod app;
mod adapters;
mod control;
mod drivers;
mod sensors;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{error, info};

use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use adapters::device_id;
use adapters::hardware::HardwareAdapter;
use adapters::mqtt::MqttAdapter;
use adapters::time::Esp32TimeAdapter;
use adapters::wifi::WifiAdapter;
use app::ports::{ControlSignal, RestartReason};
use app::service::ControlLoop;
use config::SystemConfig;
use drivers::relay::RelayDriver;
use drivers::status_led::AlarmLed;
use drivers::valve::ValveDriver;
use drivers::watchdog::Watchdog;
use sensors::level::LevelSensor;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  LevelGuard v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Configuration and supervision ──────────────────────
    let config = SystemConfig::default();
    let watchdog = Watchdog::new(config.watchdog_timeout_secs);
    let mut clock = Esp32TimeAdapter::new();

    let mac = device_id::read_mac();
    info!("Device ID: {}", device_id::device_id(&mac));

    // ── 4. WiFi station ───────────────────────────────────────
    let Peripherals { modem, .. } = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let mut link = match WifiAdapter::new(
        modem,
        sysloop,
        nvs,
        config.wifi_ssid.as_str(),
        config.wifi_password.as_str(),
    ) {
        Ok(w) => w,
        Err(e) => {
            // Bad credentials or a dead radio driver; neither heals
            // across a reboot, so halt rather than restart-loop.
            error!("WiFi init failed: {} — halting", e);
            #[allow(clippy::empty_loop)]
            loop {}
        }
    };

    if let Err(e) = link.connect_blocking(config.wifi_connect_timeout_ms) {
        error!("WiFi association failed within the boot window: {}", e);
        restart(RestartReason::BootTimeout, &clock, 0);
    }

    // ── 5. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::new(
        LevelSensor::new(pins::LEVEL_ADC_GPIO),
        RelayDriver::new(),
        AlarmLed::new(),
        ValveDriver::new(),
    );
    let mut broker = MqttAdapter::new(&config);

    // Seeded after the radio is up so the hardware RNG has RF entropy.
    let mut controller = ControlLoop::new(&config, device_id::entropy_seed());

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        if let Some(ControlSignal::Restart(reason)) =
            controller.tick(&mut hw, &mut link, &mut broker, &mut clock)
        {
            restart(reason, &clock, controller.tick_count());
        }

        // Feed watchdog on every iteration.
        watchdog.feed();
    }
}

// ── Restart ───────────────────────────────────────────────────

/// Log the cause and reset the chip.  The single place a reset happens.
fn restart(reason: RestartReason, clock: &Esp32TimeAdapter, ticks: u64) -> ! {
    error!(
        "Restarting ({}) after {} ticks, {}s uptime",
        reason,
        ticks,
        clock.uptime_secs()
    );

    #[cfg(target_os = "espidf")]
    unsafe {
        esp_idf_svc::sys::esp_restart()
    };

    // Unreachable on hardware; parks a host build instead of returning.
    #[allow(unreachable_code, clippy::empty_loop)]
    loop {}
}
