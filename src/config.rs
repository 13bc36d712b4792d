//! System configuration parameters
//!
//! All tunable parameters for the LevelGuard controller.  Values are fixed
//! at build time for this revision; the struct stays serde-capable so a
//! provisioning channel can override them later.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Level sensor ---
    /// ADC full-scale raw value (12-bit converter).
    pub sensor_full_scale: u16,

    // --- Control ---
    /// Fill percentage above which the guard trips (strict greater-than).
    pub level_threshold_percent: u8,
    /// Control loop tick interval (milliseconds).
    pub tick_interval_ms: u32,

    // --- WiFi ---
    /// Station-mode SSID.  The reference deployment is an open AP.
    pub wifi_ssid: heapless::String<32>,
    /// WPA2 passphrase; empty for an open network.
    pub wifi_password: heapless::String<64>,
    /// First-boot association window before the device restarts (ms).
    pub wifi_connect_timeout_ms: u32,
    /// Grace period after an in-place reconnect before escalating (ms).
    pub link_grace_ms: u32,

    // --- MQTT ---
    /// Broker hostname.
    pub broker_host: heapless::String<64>,
    /// Broker TCP port (plaintext).
    pub broker_port: u16,
    /// Single topic used for both the subscription and outbound alerts.
    pub topic: heapless::String<64>,
    /// Client-identity prefix; a fresh hex suffix is appended per attempt.
    pub client_id_prefix: heapless::String<24>,
    /// Connect attempts per `ensure` call before deferring to next tick.
    pub session_max_attempts: u8,
    /// Wait between failed connect attempts (ms).
    pub session_retry_backoff_ms: u32,

    // --- Watchdog ---
    /// TWDT timeout (seconds).  Must exceed the worst-case blocking tick:
    /// link grace + max_attempts × (session dial wait + retry backoff).
    pub watchdog_timeout_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Level sensor
            sensor_full_scale: 4095,

            // Control
            level_threshold_percent: 70,
            tick_interval_ms: 500, // 2 Hz

            // WiFi
            wifi_ssid: str_into("LevelGuard-Site"),
            wifi_password: str_into(""),
            wifi_connect_timeout_ms: 20_000,
            link_grace_ms: 5_000,

            // MQTT
            broker_host: str_into("broker.emqx.io"),
            broker_port: 1883,
            topic: str_into("levelguard/alert"),
            client_id_prefix: str_into("levelguard-"),
            session_max_attempts: 5,
            session_retry_backoff_ms: 5_000,

            // Watchdog
            watchdog_timeout_secs: 60,
        }
    }
}

/// Build a fixed-capacity string from a compile-time default.  A literal
/// that exceeds its capacity yields an empty string, which the tests below
/// pin against.
fn str_into<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    let _ = out.push_str(s);
    out
}
