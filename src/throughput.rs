//! Sliding-window throughput measurement.
//!
//! A [`ThroughputAccumulator`] wraps individual selector invocations with
//! wall-clock timestamps and keeps the last ten nanoseconds-per-item
//! figures, smoothing out scheduler noise across repeated selections.

use crate::utils::config::THROUGHPUT_WINDOW;
use std::collections::VecDeque;
use std::time::Instant;

/// Sliding-window average of measured throughput, in ns per processed item.
///
/// Each selector set owns one accumulator per measured operation; instances
/// are not meant to be shared across selector sets or across threads.
#[derive(Debug, Default)]
pub struct ThroughputAccumulator {
    /// The most recent throughput samples, oldest first
    window: VecDeque<f64>,

    /// Running sum of the retained samples
    sum: f64,
}

impl ThroughputAccumulator {
    pub fn new() -> Self {
        Self {
            window: VecDeque::with_capacity(THROUGHPUT_WINDOW + 1),
            sum: 0.0,
        }
    }

    /// Append a throughput sample, evicting the oldest beyond the window.
    ///
    /// **Private** - only reachable through [`measure`](Self::measure)
    fn record(&mut self, value: f64) {
        self.window.push_back(value);
        self.sum += value;
        if self.window.len() > THROUGHPUT_WINDOW {
            if let Some(evicted) = self.window.pop_front() {
                self.sum -= evicted;
            }
        }
    }

    /// Average ns-per-item over the retained window.
    ///
    /// Known initial-state edge case: before the first sample is recorded
    /// this is 0.0 / 0.0 and returns NaN. A caller whose first-ever
    /// measurement ran over zero items will observe that NaN.
    pub fn average(&self) -> f64 {
        self.sum / self.window.len() as f64
    }

    /// Time `op` and record elapsed-ns divided by `item_count`.
    ///
    /// **Public** - the sole way throughput samples enter the window
    ///
    /// When `item_count` is 0 nothing is recorded (the division would
    /// produce an infinite throughput figure). The operation's result is
    /// returned unchanged; the timing is a side effect only.
    pub fn measure<T>(&mut self, item_count: usize, op: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = op();
        let elapsed = start.elapsed();

        if item_count != 0 {
            self.record(elapsed.as_nanos() as f64 / item_count as f64);
        }

        result
    }
}
