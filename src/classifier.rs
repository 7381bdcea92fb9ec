//! Gesture classification: one frame of landmarks → an optional symbolic
//! gesture.
//!
//! The classifier is a pure function of its input and config. It fails
//! closed: no hand, or a hand below `confidence_min`, yields `None`.

use crate::landmarks::{index, HandFrame, HandObservation};
use crate::types::Handedness;
use log::trace;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Gesture types
// ---------------------------------------------------------------------------

/// The closed set of gesture kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Open,
    Fist,
    Pinch,
    Point,
    TwoFingers,
    ThreeFingers,
    FourFingers,
}

impl GestureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Fist => "fist",
            Self::Pinch => "pinch",
            Self::Point => "point",
            Self::TwoFingers => "two_fingers",
            Self::ThreeFingers => "three_fingers",
            Self::FourFingers => "four_fingers",
        }
    }
}

/// A classified gesture with its kind-specific data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Open,
    Fist,
    /// `strength` in `[0, 1]`; 1 means the fingertips touch.
    Pinch { strength: f32 },
    /// `direction` is −1 for a left hand, +1 otherwise.
    Point { direction: f32 },
    TwoFingers,
    ThreeFingers,
    FourFingers,
}

impl Gesture {
    pub fn kind(&self) -> GestureKind {
        match self {
            Self::Open => GestureKind::Open,
            Self::Fist => GestureKind::Fist,
            Self::Pinch { .. } => GestureKind::Pinch,
            Self::Point { .. } => GestureKind::Point,
            Self::TwoFingers => GestureKind::TwoFingers,
            Self::ThreeFingers => GestureKind::ThreeFingers,
            Self::FourFingers => GestureKind::FourFingers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub gesture: Gesture,
    pub hand: Handedness,
    pub confidence: f32,
}

impl GestureEvent {
    pub fn new(gesture: Gesture, hand: Handedness, confidence: f32) -> Self {
        Self {
            gesture,
            hand,
            confidence,
        }
    }

    pub fn kind(&self) -> GestureKind {
        self.gesture.kind()
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Thumb-tip to index-tip distance (normalised units) below which a
    /// pinch is reported.
    pub pinch_threshold: f32,
    /// Minimum detector confidence for a hand to be classified.
    pub confidence_min: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.06,
            confidence_min: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    config: ClassifierConfig,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify the first hand of a frame. Additional hands are ignored.
    pub fn classify(&self, frame: &HandFrame) -> Option<GestureEvent> {
        self.classify_hand(frame.primary()?)
    }

    pub fn classify_hand(&self, hand: &HandObservation) -> Option<GestureEvent> {
        if hand.confidence < self.config.confidence_min {
            return None;
        }

        let extended = extended_digits(hand);
        let total = extended.iter().filter(|up| **up).count();

        let pinch_distance = hand
            .landmark(index::THUMB_TIP)
            .distance(hand.landmark(index::INDEX_TIP));
        let threshold = self.config.pinch_threshold;

        let gesture = if pinch_distance < threshold {
            Gesture::Pinch {
                strength: ((threshold - pinch_distance) / threshold).clamp(0.0, 1.0),
            }
        } else {
            match total {
                5 => Gesture::Open,
                0 => Gesture::Fist,
                2 if extended[1] && extended[2] => Gesture::TwoFingers,
                3 => Gesture::ThreeFingers,
                4 => Gesture::FourFingers,
                1 if extended[1] => Gesture::Point {
                    direction: if hand.handedness == Handedness::Left {
                        -1.0
                    } else {
                        1.0
                    },
                },
                _ => {
                    trace!("Unclassified hand pose: {:?}", extended);
                    return None;
                }
            }
        };

        Some(GestureEvent::new(gesture, hand.handedness, hand.confidence))
    }
}

/// Extended state per digit, thumb first.
///
/// Fingers are extended when the tip is above its PIP joint in image space.
/// The thumb moves laterally, so it compares x against its IP joint, mirrored
/// by handedness (anything not labelled Right is treated as a left hand).
pub fn extended_digits(hand: &HandObservation) -> [bool; 5] {
    let mut up = [false; 5];
    for (digit, (tip, joint)) in index::TIPS.iter().zip(index::JOINTS.iter()).enumerate() {
        let tip = hand.landmark(*tip);
        let joint = hand.landmark(*joint);
        up[digit] = if digit == 0 {
            match hand.handedness {
                Handedness::Right => tip.x > joint.x,
                _ => tip.x < joint.x,
            }
        } else {
            tip.y < joint.y
        };
    }
    up
}
