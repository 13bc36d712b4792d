//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements   | Connects to              |
//! |-------------|--------------|--------------------------|
//! | `hardware`  | SensorPort   | ESP32 ADC                |
//! |             | ActuatorPort | ESP32 GPIO, LEDC PWM     |
//! | `mqtt`      | SessionPort  | MQTT broker (plaintext)  |
//! | `time`      | DelayPort    | FreeRTOS tick / host     |
//! | `wifi`      | LinkPort     | ESP-IDF WiFi STA         |
//! | `device_id` | —            | eFuse MAC, hardware RNG  |

pub mod device_id;
pub mod hardware;
pub mod mqtt;
pub mod time;
pub mod wifi;
