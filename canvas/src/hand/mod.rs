//! Hand subsystem: landmark classification, fingertip smoothing, and
//! gesture mode resolution.
//!
//! Provides:
//! - `hand_tracking`: detector landmarks to per-hand pinch observations
//! - `smoothing`: EMA filter for the drawing fingertip
//! - `gesture`: priority-ordered mode state machine

pub mod gesture;
pub mod hand_tracking;
pub mod smoothing;

pub use gesture::{
    CanvasEvent, GestureMode, GestureResolver, ModeKind, Resolution, ResolverState, StrokeEffect,
};
pub use hand_tracking::{
    classify_frame, classify_hand, HandFrame, HandLandmark, HandObservation, Handedness, RawHand,
    LANDMARK_COUNT,
};
pub use smoothing::PointSmoother;
