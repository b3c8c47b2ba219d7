//! Canvas session: the single owner of all per-session state.
//!
//! A `CanvasSession` holds the gesture resolver, the stroke store and the
//! surface size.  Each detector frame goes through `process_frame`, which
//! classifies the hands, resolves the mode, applies the resulting store
//! mutations and builds the render descriptor, strictly in that order.

use tracing::{info, trace, warn};

use crate::config::CanvasConfig;
use crate::error::ConfigError;
use crate::geometry::Surface;
use crate::hand::{
    classify_frame, CanvasEvent, GestureMode, GestureResolver, HandFrame, RawHand, StrokeEffect,
};
use crate::render::{build_descriptor, RenderDescriptor};
use crate::strokes::StrokeStore;

/// Outcome of one processed frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub mode: GestureMode,
    pub clear_progress: f32,
    pub events: Vec<CanvasEvent>,
    pub render: RenderDescriptor,
}

/// One drawing session.
#[derive(Debug)]
pub struct CanvasSession {
    resolver: GestureResolver,
    store: StrokeStore,
    surface: Surface,
    frames: u64,
}

impl CanvasSession {
    pub fn new(config: CanvasConfig, width: f32, height: f32) -> Result<Self, ConfigError> {
        config.validate()?;
        let surface = Surface::new(width, height)?;
        info!("Canvas session created ({}x{})", width, height);
        Ok(Self {
            resolver: GestureResolver::new(config),
            store: StrokeStore::new(),
            surface,
            frames: 0,
        })
    }

    /// Change the surface size.  Existing strokes keep their pixel
    /// coordinates; only future mapping is affected.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        self.surface = Surface::new(width, height)?;
        info!("Canvas resized to {}x{}", width, height);
        Ok(())
    }

    /// Run one detector frame through the pipeline.
    pub fn process_frame(&mut self, raw_hands: &[RawHand], now_ms: f64) -> FrameReport {
        let hands = classify_frame(raw_hands, self.resolver.config().pinch_threshold);
        self.process_hands(&hands, now_ms)
    }

    /// Same as [`process_frame`](Self::process_frame) for hands that are
    /// already classified.
    pub fn process_hands(&mut self, hands: &HandFrame, now_ms: f64) -> FrameReport {
        self.frames += 1;
        let resolution = self.resolver.resolve(hands, &self.surface, now_ms);

        let mut events = resolution.events;
        for effect in &resolution.effects {
            self.apply(effect, &mut events);
        }

        let render = build_descriptor(
            &self.store,
            hands,
            &resolution.mode,
            resolution.clear_progress,
            &self.surface,
            self.resolver.config(),
        );

        trace!(
            "frame {} mode={} progress={:.2} strokes={} cursors={}",
            self.frames,
            resolution.mode.kind().as_str(),
            resolution.clear_progress,
            render.strokes.len(),
            render.cursors.len(),
        );

        FrameReport {
            mode: resolution.mode,
            clear_progress: resolution.clear_progress,
            events,
            render,
        }
    }

    fn apply(&mut self, effect: &StrokeEffect, events: &mut Vec<CanvasEvent>) {
        match *effect {
            StrokeEffect::ClearAll => {
                let removed = self.store.clear_all();
                info!("Purged {} strokes", removed);
            }
            StrokeEffect::TranslateAll { dx, dy } => self.store.translate_all(dx, dy),
            StrokeEffect::EraseNear { center, radius } => {
                let summary = self.store.erase_near(center, radius);
                if summary.points_removed > 0 || summary.strokes_removed > 0 {
                    events.push(CanvasEvent::Erased {
                        points: summary.points_removed,
                        strokes: summary.strokes_removed,
                    });
                }
            }
            StrokeEffect::BeginStroke {
                id,
                color,
                created_at_ms,
            } => {
                if let Err(e) = self.store.create_stroke(id, color, created_at_ms) {
                    warn!("Failed to begin stroke: {}", e);
                }
            }
            StrokeEffect::AppendPoint { id, point } => {
                if let Err(e) = self.store.append_point(id, point) {
                    warn!("Failed to extend stroke: {}", e);
                }
            }
        }
    }

    pub fn store(&self) -> &StrokeStore {
        &self.store
    }

    pub fn mode(&self) -> GestureMode {
        self.resolver.state().mode()
    }

    pub fn clear_progress(&self) -> f32 {
        self.resolver.state().clear_progress()
    }

    pub fn config(&self) -> &CanvasConfig {
        self.resolver.config()
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Frames processed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Generate s-expression for session status.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:mode {} :clear-progress {:.2} :strokes {} :points {} :frames {} :surface ({:.0} . {:.0}))",
            self.mode().kind().as_str(),
            self.clear_progress(),
            self.store.len(),
            self.store.total_points(),
            self.frames,
            self.surface.width,
            self.surface.height,
        )
    }
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
#[derive(Clone, Copy)]
enum Pose {
    Open,
    Pinch,
    MiddlePinch,
}

/// Detector hand for the given display side with the index tip at
/// `index`.  The thumb and middle tips are placed to produce `pose`.
#[cfg(test)]
fn detector_hand(hand: crate::hand::Handedness, index: (f32, f32), pose: Pose) -> RawHand {
    use crate::hand::hand_tracking::make_raw_hand;
    use crate::hand::HandLandmark;

    let (ix, iy) = index;
    let (thumb, middle) = match pose {
        Pose::Open => ((ix, iy + 0.1), (ix + 0.1, iy)),
        Pose::Pinch => ((ix + 0.01, iy), (ix + 0.1, iy)),
        Pose::MiddlePinch => ((ix, iy + 0.1), (ix + 0.01, iy + 0.1)),
    };
    make_raw_hand(
        hand.detector_label(),
        &[
            (HandLandmark::Wrist, ix, iy + 0.3),
            (HandLandmark::ThumbTip, thumb.0, thumb.1),
            (HandLandmark::IndexTip, ix, iy),
            (HandLandmark::MiddleTip, middle.0, middle.1),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::hand::{Handedness, ModeKind};
    use crate::strokes::StrokeId;

    fn session() -> CanvasSession {
        CanvasSession::new(CanvasConfig::default(), 1000.0, 1000.0).unwrap()
    }

    fn right(index: (f32, f32), pose: Pose) -> RawHand {
        detector_hand(Handedness::Right, index, pose)
    }

    fn left(index: (f32, f32), pose: Pose) -> RawHand {
        detector_hand(Handedness::Left, index, pose)
    }

    #[test]
    fn test_rejects_bad_config() {
        let mut config = CanvasConfig::default();
        config.smoothing = 0.0;
        assert!(CanvasSession::new(config, 1000.0, 1000.0).is_err());
        assert!(CanvasSession::new(CanvasConfig::default(), 0.0, 1000.0).is_err());
    }

    #[test]
    fn test_draw_steady_pinch() {
        let mut s = session();
        for i in 0..5 {
            let report = s.process_frame(&[right((0.5, 0.5), Pose::Pinch)], i as f64 * 16.0);
            assert_eq!(report.mode.kind(), ModeKind::Drawing);
        }
        assert_eq!(s.store().len(), 1);
        let stroke = &s.store().strokes()[0];
        assert_eq!(stroke.id, StrokeId(1));
        assert_eq!(stroke.points.len(), 5);
        for p in &stroke.points {
            assert!(p.distance(&Point::new(500.0, 500.0)) < 1e-3, "point {:?}", p);
        }
    }

    #[test]
    fn test_reengagement_starts_new_stroke() {
        let mut s = session();
        let mut t = 0.0;
        let mut frame = |s: &mut CanvasSession, hands: &[RawHand]| {
            t += 16.0;
            s.process_frame(hands, t)
        };

        frame(&mut s, &[right((0.5, 0.5), Pose::Pinch)]);
        frame(&mut s, &[right((0.5, 0.5), Pose::Pinch)]);
        let released = frame(&mut s, &[right((0.5, 0.5), Pose::Open)]);
        assert_eq!(released.mode, GestureMode::Idle);
        assert!(released.events.contains(&CanvasEvent::ModeExited(ModeKind::Drawing)));

        let again = frame(&mut s, &[right((0.4, 0.5), Pose::Pinch)]);
        assert!(again.events.contains(&CanvasEvent::StrokeStarted(StrokeId(2))));
        frame(&mut s, &[right((0.4, 0.5), Pose::Pinch)]);

        let ids: Vec<StrokeId> = s.store().strokes().iter().map(|st| st.id).collect();
        assert_eq!(ids, vec![StrokeId(1), StrokeId(2)]);
        assert_eq!(s.store().strokes()[1].points.len(), 2);
    }

    #[test]
    fn test_erase_shrinks_then_removes_stroke() {
        let mut s = session();
        // Surface x = 100, 300, 600 smooth to 100, 150, 262.5.
        for (i, nx) in [0.9_f32, 0.7, 0.4].iter().enumerate() {
            s.process_frame(&[right((*nx, 0.5), Pose::Pinch)], i as f64 * 16.0);
        }
        assert_eq!(s.store().total_points(), 3);

        let report = s.process_frame(
            &[
                left((0.1, 0.2), Pose::MiddlePinch),
                right((0.7375, 0.5), Pose::Open),
            ],
            100.0,
        );
        assert_eq!(report.mode.kind(), ModeKind::Erasing);
        assert!(report.events.contains(&CanvasEvent::Erased { points: 1, strokes: 0 }));
        assert_eq!(s.store().len(), 1);
        assert_eq!(s.store().total_points(), 2);

        let report = s.process_frame(
            &[
                left((0.1, 0.2), Pose::MiddlePinch),
                right((0.85, 0.5), Pose::Open),
            ],
            116.0,
        );
        assert!(report.events.contains(&CanvasEvent::Erased { points: 1, strokes: 1 }));
        assert!(s.store().is_empty());
        assert!(report.render.strokes.is_empty());
    }

    #[test]
    fn test_erase_miss_emits_nothing() {
        let mut s = session();
        s.process_frame(&[right((0.5, 0.5), Pose::Pinch)], 0.0);
        s.process_frame(&[right((0.5, 0.5), Pose::Pinch)], 16.0);

        let report = s.process_frame(
            &[
                left((0.1, 0.2), Pose::MiddlePinch),
                right((0.1, 0.1), Pose::Open),
            ],
            32.0,
        );
        assert_eq!(report.mode.kind(), ModeKind::Erasing);
        assert!(!report
            .events
            .iter()
            .any(|e| matches!(e, CanvasEvent::Erased { .. })));
        assert_eq!(s.store().total_points(), 2);
    }

    #[test]
    fn test_move_translates_inverted() {
        let mut s = session();
        s.process_frame(&[right((0.5, 0.5), Pose::Pinch)], 0.0);
        s.process_frame(&[right((0.5, 0.5), Pose::Pinch)], 16.0);

        // First moving frame only anchors.
        let report = s.process_frame(&[left((0.2, 0.3), Pose::Pinch)], 32.0);
        assert_eq!(report.mode, GestureMode::Moving);
        let p = s.store().strokes()[0].points[0];
        assert!(p.distance(&Point::new(500.0, 500.0)) < 1e-3);

        // Camera wrist moves +0.05 in x and +0.02 in y.
        s.process_frame(&[left((0.25, 0.32), Pose::Pinch)], 48.0);
        for p in &s.store().strokes()[0].points {
            assert!((p.x - 450.0).abs() < 1e-2, "x {}", p.x);
            assert!((p.y - 520.0).abs() < 1e-2, "y {}", p.y);
        }
    }

    #[test]
    fn test_purge_after_hold() {
        let mut s = session();
        s.process_frame(&[right((0.5, 0.5), Pose::Pinch)], 0.0);
        s.process_frame(&[right((0.5, 0.5), Pose::Pinch)], 16.0);
        assert_eq!(s.store().len(), 1);

        // Thumbs at (0.5, 0.5) and (0.52, 0.5), exact 60fps spacing.  The
        // hold starts on the first joined frame, so 90 frames span 89
        // intervals (~1483ms) and the 91st frame reaches 1500ms.
        let joined = [left((0.5, 0.4), Pose::Open), right((0.52, 0.4), Pose::Open)];
        let at = |i: u32| 100.0 + f64::from(i) * 1000.0 / 60.0;
        let mut purges = 0;
        let mut last_progress = 0.0;
        for i in 0..90 {
            let report = s.process_frame(&joined, at(i));
            purges += report
                .events
                .iter()
                .filter(|e| **e == CanvasEvent::Purged)
                .count();
            if i == 45 {
                let ring = report.render.progress_ring.as_ref().expect("ring mid-hold");
                assert!(ring.progress > 0.4 && ring.progress < 0.6);
            }
            last_progress = report.clear_progress;
        }
        assert_eq!(purges, 0, "purged before the hold elapsed");
        assert_eq!(s.store().len(), 1);
        assert!(last_progress > 0.98 && last_progress < 1.0, "got {}", last_progress);

        let report = s.process_frame(&joined, at(90));
        assert!(report.events.contains(&CanvasEvent::Purged));
        assert!(s.store().is_empty());
        assert_eq!(report.clear_progress, 0.0);
        assert!(report.render.progress_ring.is_none());
    }

    #[test]
    fn test_malformed_hands_are_ignored() {
        let mut s = session();
        let truncated = RawHand {
            label: "Left".to_string(),
            landmarks: vec![Point::new(0.5, 0.5); 5],
        };
        let mut garbage = right((0.5, 0.5), Pose::Pinch);
        garbage.landmarks[8] = Point::new(f32::NAN, 0.5);

        let report = s.process_frame(&[truncated, garbage], 0.0);
        assert_eq!(report.mode, GestureMode::Idle);
        assert!(report.render.cursors.is_empty());
        assert!(s.store().is_empty());
    }

    #[test]
    fn test_no_hands_is_idle() {
        let mut s = session();
        let report = s.process_frame(&[], 0.0);
        assert_eq!(report.mode, GestureMode::Idle);
        assert!(report.events.is_empty());
        assert_eq!(s.frames(), 1);
    }

    #[test]
    fn test_resize_changes_mapping() {
        let mut s = session();
        assert!(s.resize(0.0, 10.0).is_err());
        assert_eq!(s.surface().width, 1000.0);

        s.resize(2000.0, 1000.0).unwrap();
        s.process_frame(&[right((0.5, 0.5), Pose::Pinch)], 0.0);
        let p = s.store().strokes()[0].points[0];
        assert!(p.distance(&Point::new(1000.0, 500.0)) < 1e-3);
    }

    #[test]
    fn test_status_sexp() {
        let mut s = session();
        assert_eq!(
            s.status_sexp(),
            "(:mode idle :clear-progress 0.00 :strokes 0 :points 0 :frames 0 :surface (1000 . 1000))"
        );
        s.process_frame(&[right((0.5, 0.5), Pose::Pinch)], 0.0);
        assert!(s.status_sexp().starts_with("(:mode drawing"));
        assert!(s.status_sexp().contains(":strokes 1 :points 1 :frames 1"));
    }
}
