//! Canvas configuration: gesture thresholds, timings, and draw style.
//!
//! All values are fixed when a session is created.  Distances named
//! `*_threshold` are in normalized camera space (0.0-1.0); the erase
//! radius and every style dimension are in surface pixels.

use crate::error::ConfigError;

// ── Colour ─────────────────────────────────────────────────

/// An sRGB colour with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity (0.0-1.0).
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// CSS colour string, `#rrggbb` when opaque and `rgba(...)` otherwise.
    pub fn css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Named colours used by the canvas.
pub mod palette {
    use super::Rgba;

    pub const NEON_CYAN: Rgba = Rgba::opaque(0, 255, 255);
    pub const NEON_CYAN_GLOW: Rgba = Rgba::new(0, 255, 255, 0.8);
    pub const NEON_CYAN_FAINT: Rgba = Rgba::new(0, 255, 255, 0.2);
    pub const ERASER_FILL: Rgba = Rgba::new(255, 50, 50, 0.8);
    pub const MOVE_FILL: Rgba = Rgba::new(255, 255, 0, 0.6);
    pub const ERASE_READY_FILL: Rgba = Rgba::new(255, 0, 0, 0.6);
    pub const IDLE_FILL: Rgba = Rgba::new(255, 255, 255, 0.2);
    pub const PURGE: Rgba = Rgba::new(255, 255, 255, 0.9);
    pub const RING_TRACK: Rgba = Rgba::new(255, 255, 255, 0.2);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const RED: Rgba = Rgba::opaque(255, 0, 0);
    pub const YELLOW: Rgba = Rgba::opaque(255, 255, 0);
}

// ── Draw style ─────────────────────────────────────────────

/// Visual parameters handed through to the renderer.
#[derive(Debug, Clone)]
pub struct DrawStyle {
    /// Main stroke line width (px).
    pub line_width: f32,
    /// Glow blur radius of the main stroke pass (px).
    pub glow_blur: f32,
    /// Glow colour of the main stroke pass.
    pub glow_color: Rgba,
    /// Colour of the thin highlight pass drawn over each stroke.
    pub highlight_color: Rgba,
    /// Line width of the highlight pass (px).
    pub highlight_width: f32,
    /// Opacity of the highlight pass.
    pub highlight_alpha: f32,
    /// Cursor circle radius (px).
    pub cursor_radius: f32,
    /// Cursor glow blur (px).
    pub cursor_glow_blur: f32,
    /// Horizontal offset of the cursor label from the cursor centre (px).
    pub label_offset: f32,
    /// Cursor label colour.
    pub label_color: Rgba,
    /// Clear-progress ring radius (px).
    pub ring_radius: f32,
    /// Width of the faint full-circle track (px).
    pub ring_track_width: f32,
    /// Width of the progress arc (px).
    pub ring_arc_width: f32,
    /// Glow blur of the progress arc (px).
    pub ring_glow_blur: f32,
    /// Distance of the ring title above the ring centre (px).
    pub ring_title_offset: f32,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            line_width: 4.0,
            glow_blur: 15.0,
            glow_color: palette::NEON_CYAN_GLOW,
            highlight_color: palette::WHITE,
            highlight_width: 1.5,
            highlight_alpha: 0.4,
            cursor_radius: 12.0,
            cursor_glow_blur: 15.0,
            label_offset: 15.0,
            label_color: palette::NEON_CYAN_GLOW,
            ring_radius: 40.0,
            ring_track_width: 2.0,
            ring_arc_width: 4.0,
            ring_glow_blur: 20.0,
            ring_title_offset: 55.0,
        }
    }
}

// ── Config ─────────────────────────────────────────────────

/// Gesture and stroke configuration for one canvas session.
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Maximum fingertip-to-thumb distance (normalized) for a pinch.
    pub pinch_threshold: f32,
    /// Maximum left-thumb to right-thumb distance (normalized) for clear-all.
    pub thumbs_join_threshold: f32,
    /// Time (ms) the thumbs must stay joined before everything is cleared.
    pub clear_hold_ms: f64,
    /// EMA factor for the drawing fingertip (1.0 = no smoothing).
    pub smoothing: f32,
    /// Radius (px) around the eraser inside which points are removed.
    pub erase_radius: f32,
    /// Colour given to new strokes.
    pub stroke_color: Rgba,
    /// Renderer-facing style parameters.
    pub style: DrawStyle,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.05,
            thumbs_join_threshold: 0.08,
            clear_hold_ms: 1500.0,
            smoothing: 0.25,
            erase_radius: 25.0,
            stroke_color: palette::NEON_CYAN,
            style: DrawStyle::default(),
        }
    }
}

impl CanvasConfig {
    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("pinch_threshold", self.pinch_threshold as f64)?;
        positive("thumbs_join_threshold", self.thumbs_join_threshold as f64)?;
        positive("clear_hold_ms", self.clear_hold_ms)?;
        positive("erase_radius", self.erase_radius as f64)?;
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(ConfigError::Smoothing(self.smoothing));
        }
        Ok(())
    }

    /// Generate s-expression describing the configuration.
    pub fn config_sexp(&self) -> String {
        format!(
            "(:pinch-threshold {:.3} :thumbs-join-threshold {:.3} :clear-hold-ms {:.0} :smoothing {:.2} :erase-radius {:.1} :stroke-color \"{}\" :line-width {:.1})",
            self.pinch_threshold,
            self.thumbs_join_threshold,
            self.clear_hold_ms,
            self.smoothing,
            self.erase_radius,
            self.stroke_color.css(),
            self.style.line_width,
        )
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CanvasConfig::default();
        assert!((config.pinch_threshold - 0.05).abs() < f32::EPSILON);
        assert!((config.thumbs_join_threshold - 0.08).abs() < f32::EPSILON);
        assert_eq!(config.clear_hold_ms, 1500.0);
        assert!((config.smoothing - 0.25).abs() < f32::EPSILON);
        assert_eq!(config.erase_radius, 25.0);
        assert_eq!(config.stroke_color, palette::NEON_CYAN);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CanvasConfig::default();
        config.smoothing = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Smoothing(_))));

        let mut config = CanvasConfig::default();
        config.clear_hold_ms = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { name: "clear_hold_ms", .. })
        ));

        let mut config = CanvasConfig::default();
        config.erase_radius = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_css() {
        assert_eq!(palette::NEON_CYAN.css(), "#00ffff");
        assert_eq!(palette::ERASER_FILL.css(), "rgba(255, 50, 50, 0.8)");
    }

    #[test]
    fn test_config_sexp() {
        let sexp = CanvasConfig::default().config_sexp();
        assert!(sexp.contains(":pinch-threshold 0.050"));
        assert!(sexp.contains(":thumbs-join-threshold 0.080"));
        assert!(sexp.contains(":clear-hold-ms 1500"));
        assert!(sexp.contains(":stroke-color \"#00ffff\""));
    }
}
