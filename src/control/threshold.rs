//! Threshold evaluation for the tank level.
//!
//! Maps the filtered ADC reading to a percent-of-full figure and compares
//! it against the alarm threshold.  There is no hysteresis band: outputs
//! are driven from the level alone every tick, with `changed` marking the
//! crossings that are worth reporting.

/// Outcome of a single threshold evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Tank level as a truncated percentage of full scale (0..=100).
    pub percent: u8,
    /// Level is strictly above the alarm threshold.
    pub active: bool,
    /// `active` differs from the previous evaluation.
    pub changed: bool,
}

/// Compares filtered readings against a fixed alarm threshold and tracks
/// crossings between consecutive evaluations.
pub struct ThresholdController {
    full_scale: u16,
    threshold_percent: u8,
    previous_active: bool,
}

impl ThresholdController {
    pub fn new(full_scale: u16, threshold_percent: u8) -> Self {
        Self {
            // Zero full scale would divide by zero in evaluate().
            full_scale: full_scale.max(1),
            threshold_percent,
            previous_active: false,
        }
    }

    /// Evaluate one filtered reading.
    ///
    /// The percentage truncates toward zero and clamps at 100 for readings
    /// beyond full scale.  `active` uses a strict comparison, so a level
    /// sitting exactly on the threshold does not raise the alarm.
    pub fn evaluate(&mut self, filtered: u16) -> Evaluation {
        let percent = ((u32::from(filtered) * 100) / u32::from(self.full_scale)).min(100) as u8;
        let active = percent > self.threshold_percent;
        let changed = active != self.previous_active;
        self.previous_active = active;
        Evaluation {
            percent,
            active,
            changed,
        }
    }
}
