//! Device identity and boot-time entropy.
//!
//! The stable ID (`LG-XXYYZZ`, last 3 bytes of the factory MAC) names the
//! unit in boot logs; [`entropy_seed`] feeds the broker client identity
//! generator so sibling devices never walk the same suffix sequence.

/// Fixed-size device ID string: "LG-XXYYZZ".
pub type DeviceIdString = heapless::String<16>;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// Derive the short device ID from the last 3 MAC bytes.
/// Format: `LG-XXYYZZ` (e.g., `LG-EFCAFE`).
pub fn device_id(mac: &MacAddress) -> DeviceIdString {
    let mut id = DeviceIdString::new();
    use core::fmt::Write;
    let _ = write!(id, "LG-{:02X}{:02X}{:02X}", mac[3], mac[4], mac[5]);
    id
}

/// Fresh 16-bit entropy for seeding the client identity generator.
///
/// Hardware RNG; full entropy requires RF to be up, which holds by the
/// time the session layer needs identities.
#[cfg(target_os = "espidf")]
pub fn entropy_seed() -> u16 {
    let r = unsafe { esp_idf_svc::sys::esp_random() };
    (r ^ (r >> 16)) as u16
}

/// Fresh 16-bit entropy from the hasher's per-process random keys.
#[cfg(not(target_os = "espidf"))]
pub fn entropy_seed() -> u16 {
    use std::hash::{BuildHasher, Hasher};
    let h = std::collections::hash_map::RandomState::new()
        .build_hasher()
        .finish();
    (h ^ (h >> 16) ^ (h >> 32) ^ (h >> 48)) as u16
}
