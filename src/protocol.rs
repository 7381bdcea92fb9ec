//! Intent commands and renderer output.
//!
//! This module owns **every record that crosses a process boundary**: the
//! single persisted bridge message (producer → viewer) and the per-tick frame
//! snapshot (viewer → external renderer).
//!
//! ## Actions
//!
//! | Action        | Payload keys            | Handled by                     |
//! |---------------|-------------------------|--------------------------------|
//! | `boot`        | scene                   | producer pipeline (scene load) |
//! | `load_scene`  | scene                   | producer pipeline (scene load) |
//! | `move`        | direction, speed        | viewer simulation              |
//! | `rotate`      | axis, degrees           | viewer simulation              |
//! | `zoom`        | delta                   | viewer simulation              |
//! | `pause`       | target                  | viewer simulation              |
//! | `resume`      | target                  | viewer simulation              |
//! | `accelerate`  | factor                  | viewer simulation              |
//! | `render_frame`| *(empty)*               | producer pipeline              |
//! | `shutdown`    | *(empty)*               | producer pipeline              |
//!
//! ## Design rules
//!
//! 1. The persisted record is `{action, payload, timestamp}` in snake_case
//!    JSON; unknown fields are ignored and unknown actions decode to
//!    [`Action::Unknown`] so a newer producer never wedges an older viewer.
//! 2. `timestamp` is seconds since the Unix epoch, non-decreasing per producer.
//! 3. Renderer output carries `frame: u64` and `dt: f32` so consumers can
//!    interpolate.

use crate::types::{TileCoord, Vec3};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Boot,
    LoadScene,
    Move,
    Rotate,
    Zoom,
    Pause,
    Resume,
    Accelerate,
    RenderFrame,
    Shutdown,
    #[serde(other)]
    Unknown,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boot => "boot",
            Self::LoadScene => "load_scene",
            Self::Move => "move",
            Self::Rotate => "rotate",
            Self::Zoom => "zoom",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Accelerate => "accelerate",
            Self::RenderFrame => "render_frame",
            Self::Shutdown => "shutdown",
            Self::Unknown => "unknown",
        }
    }

    /// Actions the viewer interprets; only these cross the bridge.
    pub fn crosses_bridge(&self) -> bool {
        matches!(
            self,
            Self::Move | Self::Rotate | Self::Zoom | Self::Pause | Self::Resume | Self::Accelerate
        )
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Small string-keyed payload. Values are numbers or short strings.
pub type Payload = Map<String, Value>;

/// Build a [`Payload`] from `(key, value)` pairs.
pub fn payload<I, K, V>(pairs: I) -> Payload
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// A `null` payload decodes as an empty one.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Payload, D::Error> {
    Ok(Option::<Payload>::deserialize(deserializer)?.unwrap_or_default())
}

/// Values of the `move` action's `direction` field.
pub mod direction {
    pub const FORWARD: &str = "forward";
    pub const BACK: &str = "back";
    pub const STOP: &str = "stop";
}

// ---------------------------------------------------------------------------
// Intent
// ---------------------------------------------------------------------------

/// An action plus its payload, before it is stamped for the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub action: Action,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub payload: Payload,
}

impl Intent {
    pub fn new(action: Action, payload: Payload) -> Self {
        Self { action, payload }
    }

    pub fn bare(action: Action) -> Self {
        Self::new(action, Payload::new())
    }

    pub fn number(&self, key: &str) -> Option<f32> {
        self.payload.get(key).and_then(Value::as_f64).map(|v| v as f32)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}

/// The persisted bridge record: an [`Intent`] stamped with source and time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentCommand {
    pub action: Action,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub payload: Payload,
    #[serde(default)]
    pub source: String,
    #[serde(alias = "ts")]
    pub timestamp: f64,
}

impl IntentCommand {
    pub fn new(intent: Intent, source: impl Into<String>, timestamp: f64) -> Self {
        Self {
            action: intent.action,
            payload: intent.payload,
            source: source.into(),
            timestamp,
        }
    }

    pub fn number(&self, key: &str) -> Option<f32> {
        self.payload.get(key).and_then(Value::as_f64).map(|v| v as f32)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}

// ---------------------------------------------------------------------------
// Producer pipeline responses
// ---------------------------------------------------------------------------

/// Outcome of a bridge write. Failures are reported here, never as `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ack {
    Written,
    Dropped,
}

/// One of the four display views of the projection rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    pub name: String,
    pub position: Vec3,
    pub target: Vec3,
    pub fov: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<String>,
    pub views: Vec<CameraView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandResponse {
    SceneLoaded {
        scene: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        asset: Option<String>,
    },
    Queued {
        action: Action,
        ack: Ack,
    },
    Frame {
        layout: RenderLayout,
    },
    Stopped,
    Ignored {
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Renderer output (viewer → renderer)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorTransform {
    pub position: Vec3,
    /// Degrees about +Z.
    pub heading: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraTransform {
    pub position: Vec3,
    pub target: Vec3,
    /// Degrees about +Z.
    pub heading: f32,
    /// Degrees; negative looks down.
    pub pitch: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileTransform {
    pub index: TileCoord,
    pub position: Vec3,
}

/// Everything the external renderer needs for one tick. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub dt: f32,
    pub actor: ActorTransform,
    pub camera: CameraTransform,
    pub tiles: Vec<TileTransform>,
    /// True when the tile grid was rebuilt this tick.
    pub tiles_rebuilt: bool,
}
