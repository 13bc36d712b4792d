//! Control policies applied to conditioned sensor readings.

pub mod threshold;
