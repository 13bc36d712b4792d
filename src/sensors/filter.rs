//! Moving-average sample filter.
//!
//! A fixed-size circular window with a running sum: each new sample
//! replaces the oldest slot in O(1) and the filtered value is the
//! integer-truncated mean of the window.  Adequate de-noising for a
//! slow-changing level sampled much faster than it moves.
//!
//! The window is zero-seeded, so the first `WINDOW_LEN - 1` outputs read
//! low until real samples fill every slot.

/// Number of raw samples in the averaging window.
pub const WINDOW_LEN: usize = 3;

/// O(1) moving average over the last [`WINDOW_LEN`] raw ADC readings.
#[derive(Debug, Clone)]
pub struct SampleFilter {
    window: [u16; WINDOW_LEN],
    sum: u32,
    cursor: usize,
}

impl SampleFilter {
    pub fn new() -> Self {
        Self {
            window: [0; WINDOW_LEN],
            sum: 0,
            cursor: 0,
        }
    }

    /// Push one raw sample and return the filtered value.
    ///
    /// Invariant: `sum` always equals the sum of the current window
    /// contents; the cursor wraps modulo [`WINDOW_LEN`].
    pub fn sample(&mut self, raw: u16) -> u16 {
        self.sum -= u32::from(self.window[self.cursor]);
        self.window[self.cursor] = raw;
        self.sum += u32::from(raw);
        self.cursor = (self.cursor + 1) % WINDOW_LEN;
        (self.sum / WINDOW_LEN as u32) as u16
    }
}

impl Default for SampleFilter {
    fn default() -> Self {
        Self::new()
    }
}
