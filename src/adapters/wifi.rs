//! WiFi station-mode adapter.
//!
//! Implements [`LinkPort`] — the hexagonal boundary for network
//! connectivity — plus the blocking first-boot connect with its hard
//! timeout.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## Recovery policy
//!
//! The adapter itself never retries.
//! [`LinkWatchdog`](crate::app::link::LinkWatchdog) decides when to call
//! [`reconnect`](LinkPort::reconnect) and when to give up; a boot-time
//! failure escalates to a restart in `main`.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_os = "espidf")]
use log::error;
use log::{info, warn};

use crate::app::ports::LinkPort;
use crate::error::LinkError;

/// How often the boot connect loop re-checks the link.
#[cfg(target_os = "espidf")]
const CONNECT_POLL_MS: u32 = 250;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), LinkError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(LinkError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(LinkError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), LinkError> {
    if password.is_empty() {
        // Open network.
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(LinkError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Simulation state (host builds only)
// ───────────────────────────────────────────────────────────────

/// Whether the simulated access point is reachable.  Defaults to up.
#[cfg(not(target_os = "espidf"))]
static SIM_LINK_UP: AtomicBool = AtomicBool::new(true);

/// Test injection: raise or drop the simulated access point.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_link_up(up: bool) {
    SIM_LINK_UP.store(up, Ordering::Relaxed);
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    #[cfg(target_os = "espidf")]
    wifi: esp_idf_svc::wifi::EspWifi<'static>,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    #[cfg(not(target_os = "espidf"))]
    sim_connected: bool,
    /// Simulation: counts connect attempts for log correlation.
    #[cfg(not(target_os = "espidf"))]
    sim_connect_counter: u32,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(
        modem: esp_idf_hal::modem::Modem,
        sysloop: esp_idf_svc::eventloop::EspSystemEventLoop,
        nvs: esp_idf_svc::nvs::EspDefaultNvsPartition,
        ssid: &str,
        password: &str,
    ) -> Result<Self, LinkError> {
        validate_ssid(ssid)?;
        validate_password(password)?;

        let mut ssid_buf = heapless::String::new();
        ssid_buf.push_str(ssid).map_err(|_| LinkError::InvalidSsid)?;
        let mut pass_buf = heapless::String::new();
        pass_buf
            .push_str(password)
            .map_err(|_| LinkError::InvalidPassword)?;

        let wifi = esp_idf_svc::wifi::EspWifi::new(modem, sysloop, Some(nvs)).map_err(|err| {
            error!("WiFi driver init failed: {}", err);
            LinkError::DriverFailed
        })?;

        Ok(Self {
            wifi,
            ssid: ssid_buf,
            password: pass_buf,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(ssid: &str, password: &str) -> Result<Self, LinkError> {
        validate_ssid(ssid)?;
        validate_password(password)?;

        let mut ssid_buf = heapless::String::new();
        ssid_buf.push_str(ssid).map_err(|_| LinkError::InvalidSsid)?;
        let mut pass_buf = heapless::String::new();
        pass_buf
            .push_str(password)
            .map_err(|_| LinkError::InvalidPassword)?;

        Ok(Self {
            ssid: ssid_buf,
            password: pass_buf,
            sim_connected: false,
            sim_connect_counter: 0,
        })
    }

    /// First-boot connect: bring the station up and wait for an address,
    /// giving up after `timeout_ms`.
    pub fn connect_blocking(&mut self, timeout_ms: u32) -> Result<(), LinkError> {
        info!("WiFi: connecting to '{}'", self.ssid);
        self.platform_connect(timeout_ms)
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self, timeout_ms: u32) -> Result<(), LinkError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let client_cfg = ClientConfiguration {
            ssid: self
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| LinkError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| LinkError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        };

        self.wifi
            .set_configuration(&Configuration::Client(client_cfg))
            .map_err(|err| {
                error!("WiFi set_configuration failed: {}", err);
                LinkError::DriverFailed
            })?;
        self.wifi.start().map_err(|err| {
            error!("WiFi start failed: {}", err);
            LinkError::DriverFailed
        })?;
        self.wifi.connect().map_err(|err| {
            error!("WiFi connect failed: {}", err);
            LinkError::DriverFailed
        })?;

        // connect() is asynchronous; poll until the netif is up or the
        // boot window closes.
        let mut waited_ms = 0u32;
        while waited_ms < timeout_ms {
            if self.platform_is_connected() {
                info!("WiFi: connected after {} ms", waited_ms);
                return Ok(());
            }
            esp_idf_hal::delay::FreeRtos::delay_ms(CONNECT_POLL_MS);
            waited_ms = waited_ms.saturating_add(CONNECT_POLL_MS);
        }

        warn!("WiFi: no link after {} ms", timeout_ms);
        Err(LinkError::ConnectTimeout)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self, _timeout_ms: u32) -> Result<(), LinkError> {
        self.sim_connect_counter = self.sim_connect_counter.wrapping_add(1);
        if !SIM_LINK_UP.load(Ordering::Relaxed) {
            warn!(
                "WiFi(sim): AP unreachable (attempt {})",
                self.sim_connect_counter
            );
            return Err(LinkError::ConnectTimeout);
        }
        self.sim_connected = true;
        let auth = if self.password.is_empty() {
            "open"
        } else {
            "wpa2"
        };
        info!(
            "WiFi(sim): connected to '{}' ({}, attempt {})",
            self.ssid, auth, self.sim_connect_counter
        );
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        // is_up() covers both the association and the netif address.
        self.wifi.is_up().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.sim_connected && SIM_LINK_UP.load(Ordering::Relaxed)
    }

    #[cfg(target_os = "espidf")]
    fn platform_reconnect(&mut self) {
        // Fire-and-forget; the caller re-checks is_connected() after a grace.
        if let Err(err) = self.wifi.connect() {
            warn!("WiFi: reconnect request failed: {}", err);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_reconnect(&mut self) {
        self.sim_connect_counter = self.sim_connect_counter.wrapping_add(1);
        if SIM_LINK_UP.load(Ordering::Relaxed) {
            self.sim_connected = true;
            info!("WiFi(sim): reconnected");
        } else {
            warn!("WiFi(sim): reconnect failed, AP still unreachable");
        }
    }
}

// ───────────────────────────────────────────────────────────────
// LinkPort
// ───────────────────────────────────────────────────────────────

impl LinkPort for WifiAdapter {
    fn is_connected(&self) -> bool {
        self.platform_is_connected()
    }

    fn reconnect(&mut self) {
        self.platform_reconnect();
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
