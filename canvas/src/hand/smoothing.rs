//! Exponential moving-average smoothing of tracked fingertip positions.
//!
//! Single-pole low-pass: each sample moves the estimate a fixed fraction
//! of the way toward the raw input.  Works in surface pixels.

use std::collections::HashMap;

use super::hand_tracking::Handedness;
use crate::geometry::Point;

/// Per-hand EMA filter state.
#[derive(Debug, Clone)]
pub struct PointSmoother {
    /// Fraction of the remaining error removed per sample (0.0-1.0].
    factor: f32,
    state: HashMap<Handedness, Point>,
}

impl PointSmoother {
    pub fn new(factor: f32) -> Self {
        Self {
            factor,
            state: HashMap::new(),
        }
    }

    /// Feed a raw sample and return the smoothed position.  The first
    /// sample for a key seeds the filter.
    pub fn filter(&mut self, key: Handedness, raw: Point) -> Point {
        let smoothed = self.state.entry(key).or_insert(raw);
        smoothed.x = lerp(smoothed.x, raw.x, self.factor);
        smoothed.y = lerp(smoothed.y, raw.y, self.factor);
        *smoothed
    }

    /// Last smoothed position for a key, if it has been seeded.
    pub fn current(&self, key: Handedness) -> Option<Point> {
        self.state.get(&key).copied()
    }
}

/// Linear interpolation helper.
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
