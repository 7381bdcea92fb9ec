//! Gesture → intent mapping with per-action cooldown.
//!
//! | Gesture         | Action   | Payload                                  |
//! |-----------------|----------|------------------------------------------|
//! | `open`          | `move`   | direction=forward, speed=1.0             |
//! | `two_fingers`   | `move`   | direction=back, speed=1.0                |
//! | `fist`          | `pause`  | target=actor                             |
//! | `three_fingers` | `resume` | target=actor                             |
//! | `pinch`         | `zoom`   | delta=strength                           |
//! | `point`         | `rotate` | axis=y, degrees=rotate_degrees×direction |
//! | `four_fingers`  | *(none)* |                                          |

use crate::classifier::{Gesture, GestureEvent};
use crate::protocol::{direction, payload, Action, Intent};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Minimum seconds between two accepted sends of the same action.
    pub cooldown_secs: f64,
    /// Turn applied by one `point` gesture.
    pub rotate_degrees: f32,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 0.5,
            rotate_degrees: 12.0,
        }
    }
}

/// Owns the action → last-sent table; one instance per producer.
#[derive(Debug, Clone, Default)]
pub struct GestureDispatcher {
    config: DispatcherConfig,
    last_sent: HashMap<Action, f64>,
}

impl GestureDispatcher {
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            config,
            last_sent: HashMap::new(),
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Pure mapping from a gesture to the intent it requests.
    pub fn map(&self, event: &GestureEvent) -> Option<Intent> {
        let intent = match event.gesture {
            Gesture::Open => Intent::new(
                Action::Move,
                payload([
                    ("direction", direction::FORWARD.into()),
                    ("speed", serde_json::Value::from(1.0_f64)),
                ]),
            ),
            Gesture::TwoFingers => Intent::new(
                Action::Move,
                payload([
                    ("direction", direction::BACK.into()),
                    ("speed", serde_json::Value::from(1.0_f64)),
                ]),
            ),
            Gesture::Fist => Intent::new(Action::Pause, payload([("target", "actor")])),
            Gesture::ThreeFingers => Intent::new(Action::Resume, payload([("target", "actor")])),
            Gesture::Pinch { strength } => Intent::new(Action::Zoom, payload([("delta", strength)])),
            Gesture::Point { direction } => Intent::new(
                Action::Rotate,
                payload([
                    ("axis", serde_json::Value::from("y")),
                    (
                        "degrees",
                        serde_json::Value::from(self.config.rotate_degrees * direction),
                    ),
                ]),
            ),
            // Reserved; classified but bound to nothing.
            Gesture::FourFingers => return None,
        };
        Some(intent)
    }

    /// Cooldown gate with the configured cooldown. Records `now` on accept.
    pub fn can_send(&mut self, action: Action, now: f64) -> bool {
        self.can_send_with_cooldown(action, self.config.cooldown_secs, now)
    }

    pub fn can_send_with_cooldown(&mut self, action: Action, cooldown_secs: f64, now: f64) -> bool {
        if let Some(last) = self.last_sent.get(&action) {
            if now - last < cooldown_secs {
                return false;
            }
        }
        self.last_sent.insert(action, now);
        true
    }

    /// Map and gate in one step. `None` when unmapped or cooling down.
    pub fn dispatch(&mut self, event: &GestureEvent, now: f64) -> Option<Intent> {
        let Some(intent) = self.map(event) else {
            debug!("Gesture ignored: {}", event.kind().as_str());
            return None;
        };
        if !self.can_send(intent.action, now) {
            debug!("Suppressed {} (cooldown)", intent.action);
            return None;
        }
        Some(intent)
    }
}
