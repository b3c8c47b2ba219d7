//! Gesture canvas: freehand drawing driven by hand-tracking landmarks.
//!
//! Per frame, detector landmarks for up to two hands are classified into
//! pinch signals, a priority state machine picks one gesture mode
//! (clear, move, erase, draw, or idle), the resulting mutations are
//! applied to an ordered stroke store, and a render descriptor is built
//! for whatever paints the surface.
//!
//! The detector and the renderer stay outside this crate; feed frames to
//! [`CanvasSession::process_frame`] and hand the returned descriptor to a
//! [`render::FrameRenderer`].

pub mod config;
pub mod error;
pub mod geometry;
pub mod hand;
pub mod render;
pub mod state;
pub mod strokes;

pub use config::{CanvasConfig, DrawStyle, Rgba};
pub use error::{ConfigError, LandmarkError, StrokeError};
pub use geometry::{Point, Surface};
pub use state::{CanvasSession, FrameReport};
pub use strokes::{Stroke, StrokeId, StrokeStore};
