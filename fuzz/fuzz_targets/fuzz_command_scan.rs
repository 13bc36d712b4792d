//! Fuzz target: `contains_reset_command`
//!
//! Drives arbitrary byte payloads into the inbound command scanner and
//! asserts that it never panics and always agrees with a naive
//! scan-from-every-offset reference, including on payloads shorter than
//! the command itself and on payloads at the adapter truncation limit.
//!
//! cargo fuzz run fuzz_command_scan

#![no_main]

use levelguard::app::session::{contains_reset_command, MAX_COMMAND_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let naive = (0..data.len()).any(|i| data[i..].starts_with(b"RESET"));
    assert_eq!(contains_reset_command(data), naive);

    // The adapter truncates long payloads before handing them over; a
    // truncated view must scan cleanly too.
    let truncated = &data[..data.len().min(MAX_COMMAND_LEN)];
    let naive_truncated = (0..truncated.len()).any(|i| truncated[i..].starts_with(b"RESET"));
    assert_eq!(contains_reset_command(truncated), naive_truncated);

    // Planting the command in arbitrary surroundings must always trigger.
    let mut planted = data.to_vec();
    planted.extend_from_slice(b"RESET");
    assert!(contains_reset_command(&planted));
});
