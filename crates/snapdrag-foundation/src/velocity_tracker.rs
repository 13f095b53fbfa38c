//! Release velocity estimation for hosts whose samples carry no velocity.
//!
//! Weighted least squares over the samples from the last 100 ms, newest
//! samples weighted highest.

use snapdrag_ui_graphics::{Offset, Velocity};

const HISTORY_SIZE: usize = 20;

/// Only samples within this window contribute.
const HORIZON_MS: i64 = 100;

/// Below `MIN_MOVEMENT` over a span longer than this, the pointer is at rest.
const ASSUME_STOPPED_MS: i64 = 40;

const MIN_MOVEMENT: f32 = 2.0;

/// Per-sample weight decay, newest first.
const DECAY: f32 = 0.95;

#[derive(Clone, Copy, Debug, Default)]
struct TimedSample {
    time_ms: i64,
    position: f32,
}

/// Ring buffer of positions along one axis.
#[derive(Clone, Debug)]
pub struct VelocityTracker1D {
    samples: [Option<TimedSample>; HISTORY_SIZE],
    index: usize,
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    pub fn add_data_point(&mut self, time_ms: i64, position: f32) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(TimedSample { time_ms, position });
    }

    /// Velocity in units per second; zero with fewer than two usable samples.
    pub fn calculate_velocity(&self) -> f32 {
        let Some(newest) = self.samples[self.index] else {
            return 0.0;
        };

        let mut positions = [0.0f32; HISTORY_SIZE];
        let mut times = [0.0f32; HISTORY_SIZE];
        let mut count = 0;
        let mut oldest = newest;
        let mut cursor = self.index;

        while count < HISTORY_SIZE {
            let Some(sample) = self.samples[cursor] else {
                break;
            };
            let age = newest.time_ms - sample.time_ms;
            if age > HORIZON_MS || age < 0 {
                break;
            }
            oldest = sample;
            positions[count] = sample.position;
            times[count] = -(age as f32);
            count += 1;
            cursor = (cursor + HISTORY_SIZE - 1) % HISTORY_SIZE;
        }

        if count < 2 {
            return 0.0;
        }

        let span = newest.time_ms - oldest.time_ms;
        if span > ASSUME_STOPPED_MS && (newest.position - oldest.position).abs() < MIN_MOVEMENT {
            return 0.0;
        }

        weighted_slope(&positions[..count], &times[..count]) * 1000.0
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Slope of `x = a + b*t`, in units per millisecond.
fn weighted_slope(positions: &[f32], times: &[f32]) -> f32 {
    let mut sum_w = 0.0f32;
    let mut sum_t = 0.0f32;
    let mut sum_x = 0.0f32;
    let mut sum_tt = 0.0f32;
    let mut sum_tx = 0.0f32;

    let mut weight = 1.0f32;
    for (&x, &t) in positions.iter().zip(times) {
        sum_w += weight;
        sum_t += weight * t;
        sum_x += weight * x;
        sum_tt += weight * t * t;
        sum_tx += weight * t * x;
        weight *= DECAY;
    }

    let denom = sum_w * sum_tt - sum_t * sum_t;
    if denom.abs() < f32::EPSILON {
        return 0.0;
    }
    (sum_w * sum_tx - sum_t * sum_x) / denom
}

/// Two independent axis trackers fed with cumulative translation.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    x: VelocityTracker1D,
    y: VelocityTracker1D,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_translation(&mut self, time_ms: i64, translation: Offset) {
        self.x.add_data_point(time_ms, translation.width);
        self.y.add_data_point(time_ms, translation.height);
    }

    pub fn velocity(&self) -> Velocity {
        Velocity {
            dx: self.x.calculate_velocity(),
            dy: self.y.calculate_velocity(),
        }
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_single_sample_report_zero() {
        let mut tracker = VelocityTracker1D::new();
        assert_eq!(tracker.calculate_velocity(), 0.0);
        tracker.add_data_point(0, 100.0);
        assert_eq!(tracker.calculate_velocity(), 0.0);
    }

    #[test]
    fn constant_motion_is_measured() {
        let mut tracker = VelocityTracker1D::new();
        for step in 0..4 {
            tracker.add_data_point(step * 10, step as f32 * 100.0);
        }
        let velocity = tracker.calculate_velocity();
        assert!(
            (velocity - 10_000.0).abs() < 1_000.0,
            "expected ~10000, got {velocity}"
        );
    }

    #[test]
    fn backwards_motion_is_negative() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_data_point(0, 300.0);
        tracker.add_data_point(10, 200.0);
        tracker.add_data_point(20, 100.0);
        assert!(tracker.calculate_velocity() < 0.0);
    }

    #[test]
    fn samples_past_the_horizon_are_ignored() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_data_point(0, 5_000.0);
        tracker.add_data_point(150, 100.0);
        tracker.add_data_point(160, 200.0);
        tracker.add_data_point(170, 300.0);
        let velocity = tracker.calculate_velocity();
        assert!(velocity > 0.0, "stale sample leaked in: {velocity}");
    }

    #[test]
    fn resting_pointer_reports_zero() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_data_point(0, 100.0);
        tracker.add_data_point(30, 100.5);
        tracker.add_data_point(60, 101.0);
        assert_eq!(tracker.calculate_velocity(), 0.0);
    }

    #[test]
    fn two_axis_tracker_reports_both_components() {
        let mut tracker = VelocityTracker::new();
        for step in 0..5 {
            let t = step as f32;
            tracker.add_translation(step * 16, Offset::new(t * 8.0, -t * 16.0));
        }
        let velocity = tracker.velocity();
        assert!(velocity.dx > 0.0);
        assert!(velocity.dy < 0.0);

        tracker.reset();
        assert_eq!(tracker.velocity(), Velocity::ZERO);
    }
}
