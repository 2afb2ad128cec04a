//! Sliding-window transfer speed estimation.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Width of the sampling window.
const WINDOW: Duration = Duration::from_millis(3000);

const BYTES_PER_MB: f64 = 1_048_576.0;

/// Tracks `{timestamp, bytes}` samples and computes throughput over the
/// last three seconds.
///
/// The divisor is the full window width rather than the observed sample
/// span, so speed ramps up smoothly at transfer start instead of spiking
/// off a single early chunk.
pub struct SpeedTracker {
    samples: VecDeque<(Instant, u64)>,
}

impl SpeedTracker {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::new(),
        }
    }

    /// Record a chunk arrival of `bytes` at the current instant.
    pub fn record(&mut self, bytes: u64) {
        self.record_at(Instant::now(), bytes);
    }

    pub(crate) fn record_at(&mut self, at: Instant, bytes: u64) {
        self.samples.push_back((at, bytes));
        self.evict(at);
    }

    /// Current speed in bytes per second.
    pub fn bytes_per_second(&mut self) -> f64 {
        self.bytes_per_second_at(Instant::now())
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn bytes_per_second_at(&mut self, now: Instant) -> f64 {
        self.evict(now);
        let windowed: u64 = self.samples.iter().map(|(_, bytes)| bytes).sum();
        windowed as f64 / WINDOW.as_secs_f64()
    }

    /// Current speed in MB/s.
    pub fn mb_per_second(&mut self) -> f64 {
        self.bytes_per_second() / BYTES_PER_MB
    }

    /// Estimated seconds until `remaining_bytes` are transferred at the
    /// given speed; 0 when the speed is 0.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn eta_seconds(remaining_bytes: u64, bytes_per_second: f64) -> f64 {
        if bytes_per_second <= 0.0 {
            0.0
        } else {
            remaining_bytes as f64 / bytes_per_second
        }
    }

    fn evict(&mut self, now: Instant) {
        while let Some(&(at, _)) = self.samples.front() {
            if now.duration_since(at) > WINDOW {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for SpeedTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_divides_by_full_window() {
        let start = Instant::now();
        let mut tracker = SpeedTracker::new();
        tracker.record_at(start, 3_000_000);

        // 3MB within the window over a 3s divisor = 1MB/s.
        let speed = tracker.bytes_per_second_at(start + Duration::from_millis(100));
        assert!((speed - 1_000_000.0).abs() < 1.0);
    }

    #[test]
    fn test_old_samples_fall_out_of_window() {
        let start = Instant::now();
        let mut tracker = SpeedTracker::new();
        tracker.record_at(start, 6_000_000);
        tracker.record_at(start + Duration::from_millis(3500), 3_000_000);

        // First sample is 3.5s old by now and must not count.
        let speed = tracker.bytes_per_second_at(start + Duration::from_millis(3500));
        assert!((speed - 1_000_000.0).abs() < 1.0);
    }

    #[test]
    fn test_sum_of_samples_in_window() {
        let start = Instant::now();
        let mut tracker = SpeedTracker::new();
        for i in 0..10 {
            tracker.record_at(start + Duration::from_millis(i * 100), 300_000);
        }
        let speed = tracker.bytes_per_second_at(start + Duration::from_millis(1000));
        assert!((speed - 1_000_000.0).abs() < 1.0);
    }

    #[test]
    fn test_eta() {
        assert!((SpeedTracker::eta_seconds(10_000_000, 1_000_000.0) - 10.0).abs() < f64::EPSILON);
        assert!(SpeedTracker::eta_seconds(10_000_000, 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_tracker_reports_zero() {
        let mut tracker = SpeedTracker::new();
        assert!(tracker.bytes_per_second_at(Instant::now()).abs() < f64::EPSILON);
    }
}
