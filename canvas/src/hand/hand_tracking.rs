//! Per-frame hand classification from detector landmarks.
//!
//! Models the 21-point hand landmark layout produced by the external
//! detector.  Each frame the raw landmark sets are reduced to the four
//! points the canvas cares about (wrist, thumb, index, and middle tips)
//! plus two pinch signals.  Stateless; nothing here survives a frame.

use tracing::debug;

use crate::error::LandmarkError;
use crate::geometry::Point;

// ── Landmark definitions ───────────────────────────────────

/// The 21 hand landmarks in detector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Total number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl HandLandmark {
    /// Convert landmark enum to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Landmarks further than this outside the unit square are treated as
/// detector garbage rather than a hand partially out of frame.
const NORMALIZED_SLACK: f32 = 0.5;

// ── Hand enum ──────────────────────────────────────────────

/// Which hand, as seen on the mirrored display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Interpret a detector label.  The detector labels hands from the
    /// camera's point of view, so the label is swapped for the mirrored
    /// display: detector "Right" is the user's on-screen left hand.
    pub fn from_detector_label(label: &str) -> Option<Self> {
        match label {
            "Right" => Some(Self::Left),
            "Left" => Some(Self::Right),
            _ => None,
        }
    }

    /// The label the detector uses for this on-screen hand.
    pub fn detector_label(&self) -> &'static str {
        match self {
            Self::Left => "Right",
            Self::Right => "Left",
        }
    }
}

// ── Detector input ─────────────────────────────────────────

/// One hand as reported by the detector for a frame.
#[derive(Debug, Clone)]
pub struct RawHand {
    /// Handedness label exactly as the detector reported it.
    pub label: String,
    /// Landmarks in normalized camera coordinates, detector order.
    pub landmarks: Vec<Point>,
}

// ── Classified hand ────────────────────────────────────────

/// A validated hand with its pinch signals.  Positions are normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    pub hand: Handedness,
    pub wrist: Point,
    pub thumb_tip: Point,
    pub index_tip: Point,
    pub middle_tip: Point,
    /// Thumb and index fingertips touching.
    pub is_pinching: bool,
    /// Thumb and middle fingertips touching.
    pub is_middle_pinching: bool,
}

/// The hands present in one frame, at most one per side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandFrame {
    pub left: Option<HandObservation>,
    pub right: Option<HandObservation>,
}

impl HandFrame {
    pub fn hand(&self, hand: Handedness) -> Option<&HandObservation> {
        match hand {
            Handedness::Left => self.left.as_ref(),
            Handedness::Right => self.right.as_ref(),
        }
    }

    fn slot_mut(&mut self, hand: Handedness) -> &mut Option<HandObservation> {
        match hand {
            Handedness::Left => &mut self.left,
            Handedness::Right => &mut self.right,
        }
    }

    /// Both hands, if both are present.
    pub fn both(&self) -> Option<(&HandObservation, &HandObservation)> {
        Some((self.left.as_ref()?, self.right.as_ref()?))
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Present hands, left first.
    pub fn iter(&self) -> impl Iterator<Item = &HandObservation> {
        self.left.iter().chain(self.right.iter())
    }
}

// ── Classification ─────────────────────────────────────────

/// Validate one detected hand and derive its pinch signals.
pub fn classify_hand(raw: &RawHand, pinch_threshold: f32) -> Result<HandObservation, LandmarkError> {
    let hand = Handedness::from_detector_label(&raw.label)
        .ok_or_else(|| LandmarkError::Handedness(raw.label.clone()))?;

    if raw.landmarks.len() != LANDMARK_COUNT {
        return Err(LandmarkError::LandmarkCount {
            got: raw.landmarks.len(),
        });
    }

    let range = -NORMALIZED_SLACK..=1.0 + NORMALIZED_SLACK;
    for (index, p) in raw.landmarks.iter().enumerate() {
        if !p.is_finite() {
            return Err(LandmarkError::NonFinite { index });
        }
        if !range.contains(&p.x) || !range.contains(&p.y) {
            return Err(LandmarkError::OutOfRange { index, x: p.x, y: p.y });
        }
    }

    let at = |lm: HandLandmark| raw.landmarks[lm.index()];
    let wrist = at(HandLandmark::Wrist);
    let thumb_tip = at(HandLandmark::ThumbTip);
    let index_tip = at(HandLandmark::IndexTip);
    let middle_tip = at(HandLandmark::MiddleTip);

    Ok(HandObservation {
        hand,
        wrist,
        thumb_tip,
        index_tip,
        middle_tip,
        is_pinching: index_tip.distance(&thumb_tip) < pinch_threshold,
        is_middle_pinching: middle_tip.distance(&thumb_tip) < pinch_threshold,
    })
}

/// Classify every detected hand of a frame.  Rejected hands are treated
/// as absent; if the detector reports the same side twice the first
/// one is kept.
pub fn classify_frame(raw_hands: &[RawHand], pinch_threshold: f32) -> HandFrame {
    let mut frame = HandFrame::default();

    for raw in raw_hands {
        let obs = match classify_hand(raw, pinch_threshold) {
            Ok(obs) => obs,
            Err(e) => {
                debug!("Hand dropped from frame: {}", e);
                continue;
            }
        };
        let slot = frame.slot_mut(obs.hand);
        if slot.is_some() {
            debug!("Duplicate {} hand in frame, keeping the first", obs.hand.as_str());
            continue;
        }
        *slot = Some(obs);
    }

    frame
}

// ── Test helpers ───────────────────────────────────────────

/// Build a detector hand with every landmark at `(0.5, 0.5)` except the
/// ones overridden.  `label` is the detector label (pre-mirroring).
#[cfg(test)]
pub(crate) fn make_raw_hand(label: &str, overrides: &[(HandLandmark, f32, f32)]) -> RawHand {
    let mut landmarks = vec![Point::new(0.5, 0.5); LANDMARK_COUNT];
    for &(lm, x, y) in overrides {
        landmarks[lm.index()] = Point::new(x, y);
    }
    RawHand {
        label: label.to_string(),
        landmarks,
    }
}

// ── Tests ──────────────────────────────────────────────────
