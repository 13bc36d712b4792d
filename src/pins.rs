//! GPIO / peripheral pin assignments for the LevelGuard main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Level sensor — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Capacitive water-level probe — analog voltage via resistive divider.
/// ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const LEVEL_ADC_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Actuators — Digital
// ---------------------------------------------------------------------------

/// Drain-pump relay (active HIGH, opto-isolated module).
pub const RELAY_GPIO: i32 = 6;
/// High-level alarm LED (active HIGH).
pub const ALARM_LED_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Valve servo (SG90-class, LEDC PWM)
// ---------------------------------------------------------------------------

/// Servo signal line for the inlet valve.
pub const VALVE_PWM_GPIO: i32 = 8;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC base frequency for the servo (standard 50 Hz frame).
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// LEDC timer resolution (bits).  14-bit gives 0.3 µs pulse granularity
/// at 50 Hz — well under the servo's deadband.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
/// Pulse width commanding the 0° position.
pub const SERVO_MIN_PULSE_US: u32 = 500;
/// Pulse width commanding the 180° position.
pub const SERVO_MAX_PULSE_US: u32 = 2400;

// ---------------------------------------------------------------------------
// UART debug
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
