//! Layered configuration for the controller and viewer processes.
//!
//! Sources, lowest precedence first:
//!
//! | Source                      | Example                                        |
//! |-----------------------------|------------------------------------------------|
//! | built-in defaults           | `#[serde(default)]` on every section           |
//! | TOML file (`--config`)      | `[simulation]\nmove_speed = 4.0`               |
//! | environment                 | `GESTURE__SIMULATION__MOVE_SPEED=4.0`          |
//!
//! Command-line flags are applied by the binaries on top of the result.

use crate::bridge::DEFAULT_BRIDGE_FILE;
use crate::classifier::ClassifierConfig;
use crate::dispatcher::DispatcherConfig;
use crate::error::ConfigError;
use crate::simulation::SimulationConfig;
use crate::types::{Aabb, Vec3};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "GESTURE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Shared bridge file.
    pub bridge_path: PathBuf,
    /// Frames skipped at startup while the detector settles.
    pub warmup_frames: u32,
    /// Source tag stamped on every command.
    pub source: String,
    /// Scene requested with `boot` on start.
    pub boot_scene: String,
    pub classifier: ClassifierConfig,
    pub dispatcher: DispatcherConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            bridge_path: PathBuf::from(DEFAULT_BRIDGE_FILE),
            warmup_frames: 5,
            source: "gesture_controller".into(),
            boot_scene: "default".into(),
            classifier: ClassifierConfig::default(),
            dispatcher: DispatcherConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Shared bridge file.
    pub bridge_path: PathBuf,
    /// Simulation tick rate.
    pub tick_rate_hz: f32,
    /// Write one JSON frame snapshot per tick to stdout.
    pub emit_frames: bool,
    /// Actor model bounds reported by the renderer.
    pub actor_bounds: Option<Aabb>,
    /// Terrain model bounds reported by the renderer; no terrain when unset.
    pub terrain_bounds: Option<Aabb>,
    pub simulation: SimulationConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            bridge_path: PathBuf::from(DEFAULT_BRIDGE_FILE),
            tick_rate_hz: 60.0,
            emit_frames: false,
            actor_bounds: Some(Aabb::new(
                Vec3::new(-0.5, -1.0, 0.0),
                Vec3::new(0.5, 1.0, 1.0),
            )),
            terrain_bounds: None,
            simulation: SimulationConfig::default(),
        }
    }
}

/// Load `T` from defaults, an optional TOML file and the environment.
pub fn load<T: DeserializeOwned>(file: Option<&Path>) -> Result<T, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(file) = file {
        builder = builder.add_source(config::File::from(file).required(true));
    }
    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder.build()?.try_deserialize()?)
}
