//! 2-D points and the normalized-camera to surface mapping.

use crate::error::ConfigError;

/// A 2-D point.  Normalized camera space or surface pixels depending on
/// where it came from; the type carries no unit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint between two points.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Result<Self, ConfigError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(ConfigError::Surface { width, height })
        }
    }

    /// Map a normalized camera point onto the mirrored display surface.
    pub fn map(&self, normalized: Point) -> Point {
        Point::new(
            (1.0 - normalized.x) * self.width,
            normalized.y * self.height,
        )
    }

    /// Scale a normalized camera point to surface size without mirroring.
    pub fn scale(&self, normalized: Point) -> Point {
        Point::new(normalized.x * self.width, normalized.y * self.height)
    }
}
