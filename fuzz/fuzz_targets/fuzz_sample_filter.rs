//! Fuzz target: `SampleFilter::sample` → `ThresholdController::evaluate`
//!
//! Interprets fuzz bytes as a stream of raw ADC words and pushes them
//! through the smoothing filter into the threshold controller, asserting
//! the pipeline invariants: the mean never escapes its window bounds, the
//! reported percentage never exceeds 100, and `changed` flags exactly the
//! ticks where `active` flipped.
//!
//! cargo fuzz run fuzz_sample_filter

#![no_main]

use levelguard::control::threshold::ThresholdController;
use levelguard::sensors::filter::{SampleFilter, WINDOW_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut filter = SampleFilter::new();
    let mut controller = ThresholdController::new(4095, 70);

    let mut history = vec![0u16; WINDOW_LEN];
    let mut was_active = false;

    for word in data.chunks_exact(2) {
        let raw = u16::from_le_bytes([word[0], word[1]]);
        history.push(raw);
        let window = &history[history.len() - WINDOW_LEN..];

        let filtered = filter.sample(raw);
        assert!(filtered >= *window.iter().min().unwrap());
        assert!(filtered <= *window.iter().max().unwrap());

        let eval = controller.evaluate(filtered);
        assert!(eval.percent <= 100);
        assert_eq!(eval.changed, eval.active != was_active);
        was_active = eval.active;
    }
});
