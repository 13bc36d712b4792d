//! Sensor subsystem — the tank level probe and its conditioning filter.

pub mod filter;
pub mod level;
