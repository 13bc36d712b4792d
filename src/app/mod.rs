//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the LevelGuard controller:
//! link supervision, broker session management, and the tick orchestration
//! that ties sampling, threshold evaluation, and actuation together.  All
//! interaction with hardware and the network happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod link;
pub mod ports;
pub mod service;
pub mod session;
