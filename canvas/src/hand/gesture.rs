//! Gesture mode resolution from classified hands.
//!
//! Each frame selects exactly one mode, checked in priority order:
//!
//! 1. Clearing: both thumbs joined and held; any progress suppresses the rest.
//! 2. Moving: left thumb+index pinch (not middle) drags every stroke.
//! 3. Erasing: left thumb+middle pinch with a right hand present; the
//!    right index tip is the eraser.
//! 4. Drawing: right thumb+index pinch extends the active stroke.
//! 5. Idle.
//!
//! The resolver owns all cross-frame hysteresis (clear hold timer, last
//! wrist position, fingertip smoothing, active stroke) and never touches
//! strokes itself: it returns [`StrokeEffect`]s for the caller to apply.

use tracing::{debug, info};

use super::hand_tracking::{HandFrame, HandObservation, Handedness};
use super::smoothing::PointSmoother;
use crate::config::{CanvasConfig, Rgba};
use crate::geometry::{Point, Surface};
use crate::strokes::StrokeId;

// ── Modes ──────────────────────────────────────────────────

/// Mode discriminant, for logging, events, and status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    Idle,
    Clearing,
    Moving,
    Erasing,
    Drawing,
}

impl ModeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Clearing => "clearing",
            Self::Moving => "moving",
            Self::Erasing => "erasing",
            Self::Drawing => "drawing",
        }
    }
}

/// The single active mode of a frame, with its mode-specific data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureMode {
    Idle,
    /// Thumbs joined; `progress` is the hold fraction (1.0 on the purge frame).
    Clearing { progress: f32 },
    Moving,
    /// Eraser centre in surface pixels.
    Erasing { eraser: Point },
    /// The stroke being extended.
    Drawing { stroke: StrokeId },
}

impl GestureMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Self::Idle => ModeKind::Idle,
            Self::Clearing { .. } => ModeKind::Clearing,
            Self::Moving => ModeKind::Moving,
            Self::Erasing { .. } => ModeKind::Erasing,
            Self::Drawing { .. } => ModeKind::Drawing,
        }
    }

    /// Stroke currently growing, only while drawing.
    pub fn active_stroke(&self) -> Option<StrokeId> {
        match self {
            Self::Drawing { stroke } => Some(*stroke),
            _ => None,
        }
    }
}

// ── Effects and events ─────────────────────────────────────

/// A stroke store mutation requested by the resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeEffect {
    /// Remove every stroke.
    ClearAll,
    /// Offset every point of every stroke.
    TranslateAll { dx: f32, dy: f32 },
    /// Remove points within `radius` of `center` and prune short strokes.
    EraseNear { center: Point, radius: f32 },
    /// Start a new empty stroke on top.
    BeginStroke {
        id: StrokeId,
        color: Rgba,
        created_at_ms: f64,
    },
    /// Extend a stroke.
    AppendPoint { id: StrokeId, point: Point },
}

/// Notable things that happened during a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// A non-idle mode became active.
    ModeEntered(ModeKind),
    /// A non-idle mode stopped being active.
    ModeExited(ModeKind),
    /// The clear hold completed and all strokes were removed.
    Purged,
    /// A new stroke was started.
    StrokeStarted(StrokeId),
    /// The eraser removed something.
    Erased { points: usize, strokes: usize },
}

/// Output of one resolver step.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub mode: GestureMode,
    /// Clear hold progress after this frame (0.0-1.0); 0.0 right after a purge.
    pub clear_progress: f32,
    /// Mutations to apply to the stroke store, in order.
    pub effects: Vec<StrokeEffect>,
    pub events: Vec<CanvasEvent>,
}

// ── State ──────────────────────────────────────────────────

/// Cross-frame hysteresis.  Mutated only by [`GestureResolver::resolve`].
#[derive(Debug, Clone)]
pub struct ResolverState {
    mode: GestureMode,
    /// Frame time (ms) at which the current thumbs join began.
    clear_hold_started_ms: Option<f64>,
    clear_progress: f32,
    /// Left wrist of the previous moving frame, scaled to the surface
    /// without mirroring.
    last_left_wrist: Option<Point>,
    smoother: PointSmoother,
    next_stroke_id: u64,
}

impl ResolverState {
    fn new(smoothing: f32) -> Self {
        Self {
            mode: GestureMode::Idle,
            clear_hold_started_ms: None,
            clear_progress: 0.0,
            last_left_wrist: None,
            smoother: PointSmoother::new(smoothing),
            next_stroke_id: 1,
        }
    }

    fn allocate_stroke_id(&mut self) -> StrokeId {
        let id = StrokeId(self.next_stroke_id);
        self.next_stroke_id += 1;
        id
    }

    pub fn mode(&self) -> GestureMode {
        self.mode
    }

    pub fn clear_progress(&self) -> f32 {
        self.clear_progress
    }

    pub fn clear_hold_started_ms(&self) -> Option<f64> {
        self.clear_hold_started_ms
    }

    pub fn last_left_wrist(&self) -> Option<Point> {
        self.last_left_wrist
    }

    /// Smoothed right index tip in surface pixels.
    pub fn smoothed_right_index(&self) -> Option<Point> {
        self.smoother.current(Handedness::Right)
    }
}

/// Per-session gesture state machine.
#[derive(Debug, Clone)]
pub struct GestureResolver {
    config: CanvasConfig,
    state: ResolverState,
}

impl GestureResolver {
    pub fn new(config: CanvasConfig) -> Self {
        let state = ResolverState::new(config.smoothing);
        Self { config, state }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn state(&self) -> &ResolverState {
        &self.state
    }

    /// Advance one frame.  `now_ms` is a monotonic frame timestamp.
    pub fn resolve(&mut self, hands: &HandFrame, surface: &Surface, now_ms: f64) -> Resolution {
        let previous = self.state.mode;
        let mut effects = Vec::new();
        let mut events = Vec::new();

        let purged = self.update_clear_hold(hands, now_ms);
        if purged {
            info!("Thumbs held together, clearing all strokes");
            effects.push(StrokeEffect::ClearAll);
            events.push(CanvasEvent::Purged);
        }

        let mode = self.select_mode(hands, surface, previous, purged);

        // Move hysteresis: the wrist anchor only lives while moving.
        match (mode, hands.hand(Handedness::Left)) {
            (GestureMode::Moving, Some(left)) => {
                let wrist = surface.scale(left.wrist);
                if let Some(last) = self.state.last_left_wrist {
                    let dx = wrist.x - last.x;
                    let dy = wrist.y - last.y;
                    if dx != 0.0 || dy != 0.0 {
                        effects.push(StrokeEffect::TranslateAll { dx: -dx, dy });
                    }
                }
                self.state.last_left_wrist = Some(wrist);
            }
            _ => self.state.last_left_wrist = None,
        }

        match mode {
            GestureMode::Erasing { eraser } => {
                effects.push(StrokeEffect::EraseNear {
                    center: eraser,
                    radius: self.config.erase_radius,
                });
            }
            GestureMode::Drawing { stroke } => {
                if previous.active_stroke() != Some(stroke) {
                    effects.push(StrokeEffect::BeginStroke {
                        id: stroke,
                        color: self.config.stroke_color,
                        created_at_ms: now_ms,
                    });
                    events.push(CanvasEvent::StrokeStarted(stroke));
                }
                if let Some(right) = hands.hand(Handedness::Right) {
                    let raw = surface.map(right.index_tip);
                    let point = self.state.smoother.filter(Handedness::Right, raw);
                    effects.push(StrokeEffect::AppendPoint { id: stroke, point });
                }
            }
            _ => {}
        }

        if previous.kind() != mode.kind() {
            if previous.kind() != ModeKind::Idle {
                debug!("Mode exited: {}", previous.kind().as_str());
                events.push(CanvasEvent::ModeExited(previous.kind()));
            }
            if mode.kind() != ModeKind::Idle {
                info!("Mode entered: {}", mode.kind().as_str());
                events.push(CanvasEvent::ModeEntered(mode.kind()));
            }
        }

        self.state.mode = mode;
        Resolution {
            mode,
            clear_progress: self.state.clear_progress,
            effects,
            events,
        }
    }

    /// Advance the thumbs-join hold timer.  Returns true on the frame the
    /// hold completes; progress is back at 0.0 afterwards.
    fn update_clear_hold(&mut self, hands: &HandFrame, now_ms: f64) -> bool {
        let joined = hands
            .both()
            .map(|(left, right)| {
                left.thumb_tip.distance(&right.thumb_tip) < self.config.thumbs_join_threshold
            })
            .unwrap_or(false);

        if !joined {
            self.state.clear_hold_started_ms = None;
            self.state.clear_progress = 0.0;
            return false;
        }

        let started = *self.state.clear_hold_started_ms.get_or_insert(now_ms);
        let elapsed = (now_ms - started).max(0.0);
        if elapsed >= self.config.clear_hold_ms {
            self.state.clear_hold_started_ms = None;
            self.state.clear_progress = 0.0;
            return true;
        }

        self.state.clear_progress = (elapsed / self.config.clear_hold_ms) as f32;
        false
    }

    /// Pick the mode for this frame in priority order.
    fn select_mode(
        &mut self,
        hands: &HandFrame,
        surface: &Surface,
        previous: GestureMode,
        purged: bool,
    ) -> GestureMode {
        if purged {
            return GestureMode::Clearing { progress: 1.0 };
        }
        if self.state.clear_progress > 0.0 {
            return GestureMode::Clearing {
                progress: self.state.clear_progress,
            };
        }

        let left = hands.hand(Handedness::Left);
        let right = hands.hand(Handedness::Right);

        if left.is_some_and(is_move_pose) {
            return GestureMode::Moving;
        }

        if let (Some(l), Some(r)) = (left, right) {
            if l.is_middle_pinching {
                return GestureMode::Erasing {
                    eraser: surface.map(r.index_tip),
                };
            }
        }

        if right.is_some_and(|r| r.is_pinching) {
            let stroke = match previous.active_stroke() {
                Some(id) => id,
                None => self.state.allocate_stroke_id(),
            };
            return GestureMode::Drawing { stroke };
        }

        GestureMode::Idle
    }
}

/// Thumb+index pinch without the middle finger.
fn is_move_pose(hand: &HandObservation) -> bool {
    hand.is_pinching && !hand.is_middle_pinching
}

// ── Test helpers ───────────────────────────────────────────

/// A relaxed hand: no pinches, thumbs far enough apart that two default
/// hands never count as joined.
#[cfg(test)]
pub(crate) fn make_hand(hand: Handedness) -> HandObservation {
    let thumb_x = match hand {
        Handedness::Left => 0.3,
        Handedness::Right => 0.7,
    };
    HandObservation {
        hand,
        wrist: Point::new(thumb_x, 0.8),
        thumb_tip: Point::new(thumb_x, 0.5),
        index_tip: Point::new(thumb_x, 0.4),
        middle_tip: Point::new(thumb_x + 0.05, 0.4),
        is_pinching: false,
        is_middle_pinching: false,
    }
}

#[cfg(test)]
pub(crate) fn make_frame(
    left: Option<HandObservation>,
    right: Option<HandObservation>,
) -> HandFrame {
    HandFrame { left, right }
}

// ── Tests ──────────────────────────────────────────────────
