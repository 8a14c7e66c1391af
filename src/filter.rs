//! Signal filtering for raw gaze samples
//!
//! Two independent stages run over every accepted sample:
//!
//! - a first-order recursive high-pass filter that rejects slow drift and
//!   baseline fixation, leaving rapid eye-movement energy;
//! - a trailing-mean smoothing buffer over the raw positions that produces
//!   the stabilized estimate used for zone hit-testing.
//!
//! The stabilized output is intentionally laggy; the high-pass output is
//! meaningless on the very first sample (previous state starts at zero).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::FilterConfig;
use crate::types::Point;

/// Output of one filter step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterOutput {
    /// Trailing-mean position estimate for hit-testing
    pub stabilized: Point,
    /// Euclidean norm of the high-pass output
    pub movement_energy: f64,
}

/// Stateful gaze filter; one instance per session, fed in arrival order
#[derive(Debug, Clone)]
pub struct GazeFilter {
    config: FilterConfig,
    last_raw: Point,
    high_pass: Point,
    buffer_x: VecDeque<f64>,
    buffer_y: VecDeque<f64>,
}

impl GazeFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            last_raw: Point::default(),
            high_pass: Point::default(),
            buffer_x: VecDeque::with_capacity(config.smoothing_window),
            buffer_y: VecDeque::with_capacity(config.smoothing_window),
        }
    }

    /// Process one raw sample, updating filter memory in place
    pub fn process(&mut self, sample: Point) -> FilterOutput {
        let movement_energy = self.apply_high_pass(sample);
        let stabilized = self.apply_smoothing(sample);
        FilterOutput {
            stabilized,
            movement_energy,
        }
    }

    /// hp = alpha * (hp + sample - last_raw), per axis
    fn apply_high_pass(&mut self, sample: Point) -> f64 {
        let alpha = self.config.alpha;
        self.high_pass.x = alpha * (self.high_pass.x + sample.x - self.last_raw.x);
        self.high_pass.y = alpha * (self.high_pass.y + sample.y - self.last_raw.y);
        self.last_raw = sample;
        self.high_pass.magnitude()
    }

    fn apply_smoothing(&mut self, sample: Point) -> Point {
        self.buffer_x.push_back(sample.x);
        self.buffer_y.push_back(sample.y);
        while self.buffer_x.len() > self.config.smoothing_window {
            self.buffer_x.pop_front();
            self.buffer_y.pop_front();
        }

        let n = self.buffer_x.len() as f64;
        Point::new(
            self.buffer_x.iter().sum::<f64>() / n,
            self.buffer_y.iter().sum::<f64>() / n,
        )
    }

    /// Number of raw samples currently held by the smoothing buffer
    pub fn buffered_samples(&self) -> usize {
        self.buffer_x.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> GazeFilter {
        GazeFilter::new(FilterConfig::default())
    }

    #[test]
    fn test_high_pass_rejects_constant_input() {
        let mut f = filter();
        let mut energy = f64::MAX;
        for _ in 0..200 {
            energy = f.process(Point::new(500.0, 300.0)).movement_energy;
        }
        // Steady-state rejection of DC: output converges to zero
        assert!(energy < 1e-6, "residual energy {energy}");
    }

    #[test]
    fn test_high_pass_responds_to_jumps() {
        let mut f = filter();
        for _ in 0..50 {
            f.process(Point::new(100.0, 100.0));
        }
        let out = f.process(Point::new(400.0, 500.0));
        // A 300/400 px jump passes through scaled by alpha: ~0.8 * 500
        assert!(out.movement_energy > 350.0);
    }

    #[test]
    fn test_smoothing_buffer_never_exceeds_window() {
        let mut f = filter();
        for i in 0..50 {
            f.process(Point::new(i as f64, i as f64));
            assert!(f.buffered_samples() <= 10);
        }
        assert_eq!(f.buffered_samples(), 10);
    }

    #[test]
    fn test_smoothing_is_mean_of_recent_samples() {
        let mut f = filter();
        // Fewer samples than the window: mean of all seen so far
        f.process(Point::new(10.0, 0.0));
        f.process(Point::new(20.0, 0.0));
        let out = f.process(Point::new(30.0, 0.0));
        assert!((out.stabilized.x - 20.0).abs() < 1e-12);

        // Overflow the window; only the 10 most recent count
        let mut f = filter();
        for i in 1..=12 {
            f.process(Point::new(i as f64, 0.0));
        }
        // Window holds 3..=12, mean 7.5
        let out = f.process(Point::new(13.0, 0.0));
        // Now holds 4..=13, mean 8.5
        assert!((out.stabilized.x - 8.5).abs() < 1e-12);
        assert_eq!(out.stabilized.y, 0.0);
    }

    #[test]
    fn test_smoothing_lags_behind_jumps() {
        let mut f = filter();
        for _ in 0..10 {
            f.process(Point::new(0.0, 0.0));
        }
        let out = f.process(Point::new(1000.0, 0.0));
        // One outlier in a 10-sample window moves the mean only 1/10th
        assert!((out.stabilized.x - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_sample_uses_zero_previous_state() {
        let mut f = filter();
        let out = f.process(Point::new(300.0, 400.0));
        // hp = 0.8 * (0 + 300 - 0), 0.8 * (0 + 400 - 0) -> |(240, 320)| = 400
        assert!((out.movement_energy - 400.0).abs() < 1e-9);
        assert!((out.stabilized.x - 300.0).abs() < 1e-12);
    }
}
