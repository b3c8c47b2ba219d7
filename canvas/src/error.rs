//! Error types for the gesture canvas.
//!
//! None of these are fatal to a session: a rejected hand is treated as
//! absent for its frame, and a failed stroke effect is logged and skipped.

use thiserror::Error;

use crate::hand::hand_tracking::LANDMARK_COUNT;
use crate::strokes::StrokeId;

/// Invalid session configuration or surface size.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A threshold, radius, or duration that must be positive and finite.
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive {
        /// Name of the offending field
        name: &'static str,
        /// The rejected value
        value: f64,
    },

    /// Smoothing factor outside (0, 1].
    #[error("smoothing must be in (0, 1], got {0}")]
    Smoothing(f32),

    /// Drawing surface with a zero, negative, or non-finite dimension.
    #[error("invalid surface size {width}x{height}")]
    Surface {
        /// Requested width in pixels
        width: f32,
        /// Requested height in pixels
        height: f32,
    },
}

/// Reasons a detected hand is dropped from a frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LandmarkError {
    /// Detector returned too few landmarks for this hand.
    #[error("expected {} landmarks, got {got}", LANDMARK_COUNT)]
    LandmarkCount {
        /// Number of landmarks actually supplied
        got: usize,
    },

    /// A landmark coordinate is NaN or infinite.
    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite {
        /// Landmark index (0-20)
        index: usize,
    },

    /// A landmark lies far outside the normalized camera frame.
    #[error("landmark {index} out of range at ({x}, {y})")]
    OutOfRange {
        /// Landmark index (0-20)
        index: usize,
        /// Normalized x
        x: f32,
        /// Normalized y
        y: f32,
    },

    /// Handedness label is neither "Left" nor "Right".
    #[error("unknown handedness label {0:?}")]
    Handedness(String),
}

/// Stroke store operation failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeError {
    /// A stroke with this id already exists.
    #[error("stroke {0} already exists")]
    DuplicateId(StrokeId),

    /// No stroke with this id exists.
    #[error("stroke {0} not found")]
    NotFound(StrokeId),
}
