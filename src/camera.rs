//! Follow camera and the four-view projection rig.

use crate::protocol::{CameraTransform, CameraView};
use crate::types::Vec3;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Follow camera
// ---------------------------------------------------------------------------

/// Camera rigidly parented to the actor at `offset` (actor-local space).
///
/// Only the offset persists between ticks. Position and aim are recomputed
/// from the actor pose every tick, so turning never leaves the camera drifting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    offset: Vec3,
}

impl FollowCamera {
    pub fn new(offset: Vec3) -> Self {
        Self { offset }
    }

    /// World pose for an actor at `position` facing `heading` degrees.
    pub fn pose(&self, position: Vec3, heading: f32) -> CameraTransform {
        let eye = position + self.offset.rotated_z(heading);
        let (yaw, pitch) = look_at(eye, position);
        CameraTransform {
            position: eye,
            target: position,
            heading: yaw,
            pitch,
        }
    }
}

/// Heading and pitch (degrees) of a camera at `eye` aimed at `target`.
///
/// Heading 0 looks along +Y; positive heading turns toward −X.
pub fn look_at(eye: Vec3, target: Vec3) -> (f32, f32) {
    let dir = target - eye;
    let horizontal = (dir.x * dir.x + dir.y * dir.y).sqrt();
    if horizontal == 0.0 && dir.z == 0.0 {
        return (0.0, 0.0);
    }
    let heading = (-dir.x).atan2(dir.y).to_degrees();
    let pitch = dir.z.atan2(horizontal).to_degrees();
    (heading, pitch)
}

// ---------------------------------------------------------------------------
// Projection rig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraRig {
    pub distance: f32,
    pub height: f32,
    pub fov: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            distance: 2.5,
            height: 0.8,
            fov: 60.0,
        }
    }
}

impl CameraRig {
    pub fn new(distance: f32, height: f32) -> Self {
        Self {
            distance,
            height,
            ..Default::default()
        }
    }

    /// Front, back, left and right views, all aimed at the origin.
    pub fn build_views(&self) -> Vec<CameraView> {
        let d = self.distance;
        let h = self.height;
        [
            ("front", Vec3::new(0.0, h, d)),
            ("back", Vec3::new(0.0, h, -d)),
            ("left", Vec3::new(-d, h, 0.0)),
            ("right", Vec3::new(d, h, 0.0)),
        ]
        .into_iter()
        .map(|(name, position)| CameraView {
            name: name.to_string(),
            position,
            target: Vec3::zero(),
            fov: self.fov,
        })
        .collect()
    }
}
