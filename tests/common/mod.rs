//! Landmark fixtures shared by the integration tests.

#![allow(dead_code)]

use gesture_world::landmarks::{index, HandFrame, HandObservation, Landmark, LANDMARK_COUNT};
use gesture_world::types::Handedness;

/// A hand with the given digits extended (thumb first), well clear of a pinch.
pub fn hand(handedness: Handedness, up: [bool; 5]) -> HandObservation {
    let mut points = [Landmark::new(0.5, 0.5); LANDMARK_COUNT];

    // Thumb: lateral, mirrored by handedness.
    points[index::THUMB_IP] = Landmark::new(0.5, 0.9);
    let outward = match handedness {
        Handedness::Right => 0.6,
        _ => 0.4,
    };
    let inward = 1.0 - outward;
    points[index::THUMB_TIP] = Landmark::new(if up[0] { outward } else { inward }, 0.9);

    // Fingers: tip above (extended) or below (curled) the PIP joint.
    for digit in 1..5 {
        points[index::JOINTS[digit]] = Landmark::new(0.5, 0.5);
        points[index::TIPS[digit]] = Landmark::new(0.5, if up[digit] { 0.3 } else { 0.6 });
    }

    HandObservation::new(points, handedness, 0.9)
}

/// A hand whose thumb and index tips are `distance` apart.
pub fn pinch_hand(handedness: Handedness, up: [bool; 5], distance: f32) -> HandObservation {
    let mut h = hand(handedness, up);
    let index_tip = h.landmarks[index::INDEX_TIP];
    h.landmarks[index::THUMB_TIP] = Landmark::new(index_tip.x + distance, index_tip.y);
    h
}

pub fn frame(hand: HandObservation) -> HandFrame {
    HandFrame::single(hand)
}

pub const OPEN: [bool; 5] = [true; 5];
pub const FIST: [bool; 5] = [false; 5];
pub const POINT: [bool; 5] = [false, true, false, false, false];
pub const TWO: [bool; 5] = [false, true, true, false, false];
pub const THREE: [bool; 5] = [false, true, true, true, false];
pub const FOUR: [bool; 5] = [false, true, true, true, true];
