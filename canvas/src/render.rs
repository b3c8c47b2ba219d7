//! Frame render descriptors: what the renderer should paint this frame.
//!
//! [`build_descriptor`] turns the stroke store, the classified hands and
//! the resolved mode into a declarative list of strokes, cursor markers,
//! and an optional clear-progress ring.  It never mutates anything, so
//! calling it twice on the same snapshot gives the same descriptor.

use std::f32::consts::{FRAC_PI_2, TAU};

use crate::config::{palette, CanvasConfig, DrawStyle, Rgba};
use crate::geometry::{Point, Surface};
use crate::hand::{GestureMode, HandFrame, HandObservation, Handedness, ModeKind};
use crate::strokes::{StrokeId, StrokeStore};

/// Title drawn above the clear-progress ring.
pub const PURGE_TITLE: &str = "SYSTEM PURGE";

// ── Descriptor types ───────────────────────────────────────

/// Two-pass stroke styling: a glowing main line plus a thin highlight.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub line_width: f32,
    pub glow_blur: f32,
    pub glow_color: Rgba,
    pub highlight_color: Rgba,
    pub highlight_width: f32,
    pub highlight_alpha: f32,
}

impl From<&DrawStyle> for StrokeStyle {
    fn from(style: &DrawStyle) -> Self {
        Self {
            line_width: style.line_width,
            glow_blur: style.glow_blur,
            glow_color: style.glow_color,
            highlight_color: style.highlight_color,
            highlight_width: style.highlight_width,
            highlight_alpha: style.highlight_alpha,
        }
    }
}

/// One polyline to paint, round caps and joins.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokePath {
    pub id: StrokeId,
    pub color: Rgba,
    pub points: Vec<Point>,
}

/// Text shown next to a hand cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorLabel {
    Drawing,
    PinchToDraw,
    EraserMode,
    EraseModeReady,
    InvertedMove,
    LeftHint,
}

impl CursorLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drawing => "DRAWING",
            Self::PinchToDraw => "PINCH TO DRAW",
            Self::EraserMode => "ERASER MODE",
            Self::EraseModeReady => "ERASE MODE READY",
            Self::InvertedMove => "H-INVERTED MOVE",
            Self::LeftHint => "T+I: MOVE | T+M: ERASE",
        }
    }
}

/// Glowing circle at a hand's index fingertip.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorMarker {
    pub hand: Handedness,
    pub position: Point,
    pub radius: f32,
    pub fill: Rgba,
    pub glow: Rgba,
    pub glow_blur: f32,
    pub label: CursorLabel,
    pub label_position: Point,
    pub label_color: Rgba,
}

/// Clear-all hold indicator between the two thumbs.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRing {
    pub center: Point,
    pub radius: f32,
    /// Hold fraction (0.0-1.0).
    pub progress: f32,
    /// Arc start angle in radians (12 o'clock).
    pub start_angle: f32,
    /// Arc end angle in radians, clockwise from `start_angle`.
    pub end_angle: f32,
    pub track_color: Rgba,
    pub track_width: f32,
    pub arc_color: Rgba,
    pub arc_width: f32,
    pub glow_blur: f32,
    pub title: &'static str,
    pub title_position: Point,
    /// Whole percent, e.g. `"42%"`.
    pub percent_text: String,
}

/// Everything the renderer needs for one frame, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDescriptor {
    pub surface: Surface,
    pub stroke_style: StrokeStyle,
    pub strokes: Vec<StrokePath>,
    pub cursors: Vec<CursorMarker>,
    pub progress_ring: Option<ProgressRing>,
}

/// Consumer of render descriptors (canvas, GPU, test recorder...).
pub trait FrameRenderer {
    fn draw(&mut self, frame: &RenderDescriptor);
}

// ── Builder ────────────────────────────────────────────────

/// Assemble the descriptor for the current frame.
pub fn build_descriptor(
    store: &StrokeStore,
    hands: &HandFrame,
    mode: &GestureMode,
    clear_progress: f32,
    surface: &Surface,
    config: &CanvasConfig,
) -> RenderDescriptor {
    let strokes = store
        .strokes()
        .iter()
        .filter(|s| s.is_drawable())
        .map(|s| StrokePath {
            id: s.id,
            color: s.color,
            points: s.points.clone(),
        })
        .collect();

    let cursors = hands
        .iter()
        .map(|hand| cursor_for(hand, mode.kind(), surface, &config.style))
        .collect();

    let progress_ring = match hands.both() {
        Some((left, right)) if clear_progress > 0.0 => Some(progress_ring(
            surface.map(left.thumb_tip),
            surface.map(right.thumb_tip),
            clear_progress,
            &config.style,
        )),
        _ => None,
    };

    RenderDescriptor {
        surface: *surface,
        stroke_style: StrokeStyle::from(&config.style),
        strokes,
        cursors,
        progress_ring,
    }
}

fn cursor_for(
    hand: &HandObservation,
    mode: ModeKind,
    surface: &Surface,
    style: &DrawStyle,
) -> CursorMarker {
    let (fill, glow, label) = match hand.hand {
        Handedness::Right => match mode {
            ModeKind::Drawing => (palette::NEON_CYAN, palette::NEON_CYAN, CursorLabel::Drawing),
            ModeKind::Erasing => (palette::ERASER_FILL, palette::RED, CursorLabel::EraserMode),
            _ => (palette::NEON_CYAN_FAINT, palette::NEON_CYAN, CursorLabel::PinchToDraw),
        },
        Handedness::Left => {
            if mode == ModeKind::Moving {
                (palette::MOVE_FILL, palette::YELLOW, CursorLabel::InvertedMove)
            } else if hand.is_middle_pinching {
                (palette::ERASE_READY_FILL, palette::RED, CursorLabel::EraseModeReady)
            } else {
                (palette::IDLE_FILL, palette::WHITE, CursorLabel::LeftHint)
            }
        }
    };

    let position = surface.map(hand.index_tip);
    CursorMarker {
        hand: hand.hand,
        position,
        radius: style.cursor_radius,
        fill,
        glow,
        glow_blur: style.cursor_glow_blur,
        label,
        label_position: Point::new(position.x + style.label_offset, position.y),
        label_color: style.label_color,
    }
}

fn progress_ring(left_thumb: Point, right_thumb: Point, progress: f32, style: &DrawStyle) -> ProgressRing {
    let progress = progress.clamp(0.0, 1.0);
    let center = left_thumb.midpoint(&right_thumb);
    let start_angle = -FRAC_PI_2;
    ProgressRing {
        center,
        radius: style.ring_radius,
        progress,
        start_angle,
        end_angle: start_angle + TAU * progress,
        track_color: palette::RING_TRACK,
        track_width: style.ring_track_width,
        arc_color: palette::PURGE,
        arc_width: style.ring_arc_width,
        glow_blur: style.ring_glow_blur,
        title: PURGE_TITLE,
        title_position: Point::new(center.x, center.y - style.ring_title_offset),
        percent_text: format!("{}%", (progress * 100.0).floor() as u32),
    }
}
