//! Headless backend: scripted synthetic hands and a logging renderer.
//!
//! Used for CI and for exercising the gesture pipeline without a camera
//! or a display.  A scenario is a fixed sequence of timed gesture phases;
//! every frame synthesizes a full 21-landmark detector result.

use std::f32::consts::TAU;

use anyhow::{bail, Context};
use clap::ValueEnum;
use gesture_canvas::geometry::Point;
use gesture_canvas::hand::{HandLandmark, Handedness, RawHand, LANDMARK_COUNT};
use gesture_canvas::render::{FrameRenderer, RenderDescriptor};
use gesture_canvas::{CanvasConfig, CanvasSession};
use tracing::{debug, info, trace};

use super::{run_loop, LandmarkSource, LoopConfig};

// ── Scenarios ──────────────────────────────────────────────

/// Scripted gesture sequence to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Draw one circle.
    Draw,
    /// Draw a circle, then sweep the eraser through it.
    Erase,
    /// Draw a circle, then drag it with the left hand.
    Move,
    /// Draw a circle, then hold the thumbs together until it clears.
    Purge,
    /// Every gesture in turn.
    Tour,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draw => "draw",
            Self::Erase => "erase",
            Self::Move => "move",
            Self::Purge => "purge",
            Self::Tour => "tour",
        }
    }

    fn phases(&self) -> Vec<Phase> {
        use Gesture::*;
        let script: &[(Gesture, f64)] = match self {
            Self::Draw => &[(Circle, 2000.0)],
            Self::Erase => &[(Circle, 2000.0), (Lift, 200.0), (Sweep, 1500.0)],
            Self::Move => &[(Circle, 2000.0), (Lift, 200.0), (Drag, 1000.0)],
            Self::Purge => &[(Circle, 2000.0), (Lift, 200.0), (ThumbsJoined, 1800.0)],
            Self::Tour => &[
                (Circle, 2000.0),
                (Lift, 200.0),
                (Drag, 1000.0),
                (Lift, 200.0),
                (Sweep, 1500.0),
                (Lift, 200.0),
                (Circle, 1000.0),
                (Lift, 200.0),
                (ThumbsJoined, 1800.0),
            ],
        };
        script
            .iter()
            .map(|&(gesture, duration_ms)| Phase {
                gesture,
                duration_ms,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum Gesture {
    /// Right hand pinching, tracing a circle.
    Circle,
    /// Right hand open and resting.
    Lift,
    /// Left thumb+middle pinch, right index sweeping across the middle.
    Sweep,
    /// Left thumb+index pinch, wrist drifting sideways.
    Drag,
    /// Both hands open with thumb tips touching.
    ThumbsJoined,
}

#[derive(Debug, Clone, Copy)]
struct Phase {
    gesture: Gesture,
    duration_ms: f64,
}

#[derive(Debug, Clone, Copy)]
enum Pose {
    Open,
    Pinch,
    MiddlePinch,
}

// ── Scripted source ────────────────────────────────────────

/// Synthetic detector that plays back a [`Scenario`].
#[derive(Debug)]
pub struct ScriptedSource {
    phases: Vec<Phase>,
    frame_interval_ms: f64,
    frame: u64,
    closed: bool,
}

impl ScriptedSource {
    pub fn new(scenario: Scenario, frame_interval_ms: f64) -> Self {
        Self {
            phases: scenario.phases(),
            frame_interval_ms,
            frame: 0,
            closed: false,
        }
    }

    /// Script length in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.phases.iter().map(|p| p.duration_ms).sum()
    }

    fn hands_at(&self, t_ms: f64) -> Option<Vec<RawHand>> {
        let mut start = 0.0;
        for phase in &self.phases {
            if t_ms < start + phase.duration_ms {
                let u = ((t_ms - start) / phase.duration_ms) as f32;
                return Some(pose_hands(phase.gesture, u));
            }
            start += phase.duration_ms;
        }
        None
    }
}

impl LandmarkSource for ScriptedSource {
    fn next_frame(&mut self) -> Option<Vec<RawHand>> {
        if self.closed {
            return None;
        }
        let hands = self.hands_at(self.frame as f64 * self.frame_interval_ms)?;
        self.frame += 1;
        Some(hands)
    }

    fn close(&mut self) {
        debug!("Scripted source closed after {} frames", self.frame);
        self.closed = true;
    }
}

/// Hands for `gesture` at phase fraction `u` (0.0-1.0).
fn pose_hands(gesture: Gesture, u: f32) -> Vec<RawHand> {
    match gesture {
        Gesture::Circle => {
            let angle = TAU * u;
            let index = Point::new(0.5 + 0.15 * angle.cos(), 0.5 + 0.15 * angle.sin());
            vec![synthetic_hand(Handedness::Right, index, Pose::Pinch)]
        }
        Gesture::Lift => vec![synthetic_hand(
            Handedness::Right,
            Point::new(0.5, 0.6),
            Pose::Open,
        )],
        Gesture::Sweep => vec![
            synthetic_hand(Handedness::Left, Point::new(0.2, 0.3), Pose::MiddlePinch),
            synthetic_hand(Handedness::Right, Point::new(0.3 + 0.4 * u, 0.5), Pose::Open),
        ],
        Gesture::Drag => vec![synthetic_hand(
            Handedness::Left,
            Point::new(0.2 + 0.15 * u, 0.3),
            Pose::Pinch,
        )],
        Gesture::ThumbsJoined => vec![
            synthetic_hand(Handedness::Left, Point::new(0.5, 0.4), Pose::Open),
            synthetic_hand(Handedness::Right, Point::new(0.52, 0.4), Pose::Open),
        ],
    }
}

/// A full detector hand with the index tip at `index`.  Unscripted
/// landmarks sit on the wrist.
fn synthetic_hand(hand: Handedness, index: Point, pose: Pose) -> RawHand {
    let wrist = Point::new(index.x, index.y + 0.3);
    let (thumb, middle) = match pose {
        Pose::Open => (
            Point::new(index.x, index.y + 0.1),
            Point::new(index.x + 0.1, index.y),
        ),
        Pose::Pinch => (
            Point::new(index.x + 0.01, index.y),
            Point::new(index.x + 0.1, index.y),
        ),
        Pose::MiddlePinch => (
            Point::new(index.x, index.y + 0.1),
            Point::new(index.x + 0.01, index.y + 0.1),
        ),
    };

    let mut landmarks = vec![wrist; LANDMARK_COUNT];
    landmarks[HandLandmark::ThumbTip.index()] = thumb;
    landmarks[HandLandmark::IndexTip.index()] = index;
    landmarks[HandLandmark::MiddleTip.index()] = middle;

    RawHand {
        label: hand.detector_label().to_string(),
        landmarks,
    }
}

// ── Trace renderer ─────────────────────────────────────────

/// Renderer that logs descriptors instead of painting them.
#[derive(Debug, Default)]
pub struct TraceRenderer {
    frames: u64,
    peak_strokes: usize,
    peak_points: usize,
    ring_frames: u64,
}

impl FrameRenderer for TraceRenderer {
    fn draw(&mut self, frame: &RenderDescriptor) {
        let points: usize = frame.strokes.iter().map(|s| s.points.len()).sum();
        self.frames += 1;
        self.peak_strokes = self.peak_strokes.max(frame.strokes.len());
        self.peak_points = self.peak_points.max(points);
        if let Some(ring) = &frame.progress_ring {
            self.ring_frames += 1;
            trace!("{} {}", ring.title, ring.percent_text);
        }
        for cursor in &frame.cursors {
            trace!(
                "{} cursor at ({:.0}, {:.0}): {}",
                cursor.hand.as_str(),
                cursor.position.x,
                cursor.position.y,
                cursor.label.as_str(),
            );
        }
    }
}

impl TraceRenderer {
    pub fn summary(&self) -> String {
        format!(
            "{} frame(s), peak {} stroke(s) / {} point(s), {} frame(s) with purge ring",
            self.frames, self.peak_strokes, self.peak_points, self.ring_frames
        )
    }
}

// ── Entry point ────────────────────────────────────────────

/// Headless run configuration.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub scenario: Scenario,
    /// Virtual surface width in pixels.
    pub width: f32,
    /// Virtual surface height in pixels.
    pub height: f32,
    pub fps: f64,
    /// Frame cap; the script length applies when unset.
    pub max_frames: Option<u64>,
    pub realtime: bool,
    pub canvas: CanvasConfig,
}

/// Play a scenario through a fresh session.
pub fn run(config: HeadlessConfig) -> anyhow::Result<()> {
    if !(config.fps.is_finite() && config.fps > 0.0) {
        bail!("fps must be a positive number, got {}", config.fps);
    }
    let frame_interval_ms = 1000.0 / config.fps;

    let mut session = CanvasSession::new(config.canvas, config.width, config.height)
        .context("failed to create canvas session")?;
    info!("Canvas config: {}", session.config().config_sexp());

    let mut source = ScriptedSource::new(config.scenario, frame_interval_ms);
    info!(
        "Headless run: scenario {} ({:.0}ms at {} fps)",
        config.scenario.as_str(),
        source.duration_ms(),
        config.fps
    );

    let mut renderer = TraceRenderer::default();
    let loop_config = LoopConfig {
        frame_interval_ms,
        max_frames: config.max_frames,
        realtime: config.realtime,
    };
    run_loop(&mut session, &mut source, &mut renderer, &loop_config)?;

    info!("Headless run complete: {}", renderer.summary());
    info!("Session status: {}", session.status_sexp());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: f64 = 1000.0 / 60.0;

    fn play(scenario: Scenario) -> (CanvasSession, TraceRenderer) {
        let mut session = CanvasSession::new(CanvasConfig::default(), 1280.0, 720.0).unwrap();
        let mut source = ScriptedSource::new(scenario, INTERVAL);
        let mut renderer = TraceRenderer::default();
        let config = LoopConfig {
            frame_interval_ms: INTERVAL,
            max_frames: None,
            realtime: false,
        };
        run_loop(&mut session, &mut source, &mut renderer, &config).unwrap();
        (session, renderer)
    }

    #[test]
    fn test_synthetic_hands_are_complete() {
        let mut source = ScriptedSource::new(Scenario::Tour, INTERVAL);
        let mut frames = 0;
        while let Some(hands) = source.next_frame() {
            for hand in &hands {
                assert_eq!(hand.landmarks.len(), LANDMARK_COUNT);
                assert!(Handedness::from_detector_label(&hand.label).is_some());
            }
            frames += 1;
        }
        assert!(frames > 400);
    }

    #[test]
    fn test_close_ends_stream() {
        let mut source = ScriptedSource::new(Scenario::Draw, INTERVAL);
        assert!(source.next_frame().is_some());
        source.close();
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn test_frame_cap() {
        let mut session = CanvasSession::new(CanvasConfig::default(), 1280.0, 720.0).unwrap();
        let mut source = ScriptedSource::new(Scenario::Draw, INTERVAL);
        let mut renderer = TraceRenderer::default();
        let config = LoopConfig {
            frame_interval_ms: INTERVAL,
            max_frames: Some(10),
            realtime: false,
        };
        assert_eq!(run_loop(&mut session, &mut source, &mut renderer, &config).unwrap(), 10);
        assert_eq!(session.store().total_points(), 10);
    }

    #[test]
    fn test_draw_scenario() {
        let (session, renderer) = play(Scenario::Draw);
        assert_eq!(session.store().len(), 1);
        assert!(session.store().total_points() > 100);
        assert_eq!(renderer.peak_strokes, 1);
        assert_eq!(renderer.ring_frames, 0);
    }

    #[test]
    fn test_erase_scenario_removes_points() {
        let (drawn, _) = play(Scenario::Draw);
        let (erased, _) = play(Scenario::Erase);
        assert_eq!(erased.store().len(), 1);
        assert!(erased.store().total_points() < drawn.store().total_points());
    }

    #[test]
    fn test_move_scenario_shifts_left() {
        let (drawn, _) = play(Scenario::Draw);
        let (moved, _) = play(Scenario::Move);
        let before = drawn.store().strokes()[0].points[0];
        let after = moved.store().strokes()[0].points[0];
        // Wrist drifts right in camera space; inverted, strokes go left.
        assert!(before.x - after.x > 150.0, "{} -> {}", before.x, after.x);
        assert!((before.y - after.y).abs() < 1e-2);
    }

    #[test]
    fn test_purge_scenario_clears() {
        let (session, renderer) = play(Scenario::Purge);
        assert!(session.store().is_empty());
        assert!(renderer.ring_frames > 60);
    }

    #[test]
    fn test_tour() {
        let (session, renderer) = play(Scenario::Tour);
        assert!(session.store().is_empty());
        assert_eq!(renderer.peak_strokes, 2);
        assert!(renderer.summary().contains("peak 2 stroke(s)"));
    }

    #[test]
    fn test_run_rejects_bad_fps() {
        let config = HeadlessConfig {
            scenario: Scenario::Draw,
            width: 1280.0,
            height: 720.0,
            fps: 0.0,
            max_frames: None,
            realtime: false,
            canvas: CanvasConfig::default(),
        };
        assert!(run(config.clone()).is_err());

        // Positive but so small the frame interval overflows a Duration.
        let tiny = HeadlessConfig { fps: 1e-300, ..config };
        assert!(run(tiny).is_err());
    }

    #[test]
    fn test_loop_rejects_unrepresentable_interval() {
        let mut session = CanvasSession::new(CanvasConfig::default(), 1280.0, 720.0).unwrap();
        let mut source = ScriptedSource::new(Scenario::Draw, INTERVAL);
        let mut renderer = TraceRenderer::default();
        let config = LoopConfig {
            frame_interval_ms: 1e303,
            max_frames: None,
            realtime: false,
        };
        assert!(run_loop(&mut session, &mut source, &mut renderer, &config).is_err());
        assert_eq!(session.frames(), 0);
        assert_eq!(renderer.frames, 0);
    }
}
