//! Command interpreter and per-tick simulation step (viewer side).
//!
//! [`Simulation`] exclusively owns the actor, camera and tile state. Each
//! tick it folds in at most one fresh bridge command and the held control
//! input, integrates over `dt`, then re-aims the camera and re-centres the
//! tile grid. Nothing else mutates that state, so a renderer never observes a
//! half-updated tick.

use crate::camera::FollowCamera;
use crate::error::{AssetError, SimulationError};
use crate::protocol::{direction, Action, ActorTransform, FrameSnapshot, IntentCommand};
use crate::terrain::{actor_rest_height, align_terrain, TerrainConfig, TerrainTiler, TileRebuild};
use crate::types::{Aabb, Vec3};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

pub const MIN_SPEED_MULTIPLIER: f32 = 0.5;
pub const MAX_SPEED_MULTIPLIER: f32 = 3.0;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Actor speed in world units per second at multiplier 1.0.
    pub move_speed: f32,
    /// Turn rate for held left/right input, degrees per second.
    pub turn_rate: f32,
    /// Initial camera offset in actor-local space.
    pub follow_offset: Vec3,
    /// Heading the actor faces after load.
    pub initial_heading: f32,
    /// Refuse to start without terrain bounds.
    pub require_terrain: bool,
    pub terrain: TerrainConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            turn_rate: 90.0,
            follow_offset: Vec3::new(0.0, -6.5, 2.8),
            initial_heading: 90.0,
            require_terrain: false,
            terrain: TerrainConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Held keys from the direct control surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorState {
    pub position: Vec3,
    /// Degrees about +Z.
    pub heading: f32,
    pub paused: bool,
    /// Bridge-driven movement: −1 back, 0 stopped, +1 forward.
    pub move_direction: i8,
    /// Always within `[MIN_SPEED_MULTIPLIER, MAX_SPEED_MULTIPLIER]`.
    pub speed_multiplier: f32,
    /// Camera offset in actor-local space; rescaled by `zoom`.
    pub camera_offset: Vec3,
    /// Product of every zoom factor applied so far.
    pub zoom_factor: f32,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

pub struct Simulation {
    config: SimulationConfig,
    state: ActorState,
    tiler: Option<TerrainTiler>,
    frame: u64,
}

impl Simulation {
    /// Set up the actor (and terrain, if any) from model bounds supplied by
    /// the asset collaborator.
    ///
    /// Fails without actor bounds, on any terrain load failure, and without
    /// terrain bounds when `require_terrain` is set.
    pub fn new(
        config: SimulationConfig,
        actor_bounds: Result<Aabb, AssetError>,
        terrain_bounds: Option<Result<Aabb, AssetError>>,
    ) -> Result<Self, SimulationError> {
        let actor = actor_bounds.map_err(SimulationError::Actor)?;

        let terrain = match terrain_bounds {
            Some(bounds) => Some(bounds.map_err(SimulationError::Terrain)?),
            None if config.require_terrain => {
                return Err(SimulationError::Terrain(AssetError::Missing(
                    "terrain".into(),
                )))
            }
            None => None,
        };

        let aligned = terrain.map(|t| align_terrain(&t, &config.terrain));
        let tiler = aligned
            .as_ref()
            .map(|t| TerrainTiler::new(t, &config.terrain))
            .transpose()?;

        let z = actor_rest_height(
            &actor,
            aligned.as_ref().map(|t| &t.bounds),
            config.terrain.actor_clearance,
        );

        let state = ActorState {
            position: Vec3::new(0.0, 0.0, z),
            heading: config.initial_heading,
            paused: false,
            move_direction: 0,
            speed_multiplier: 1.0,
            camera_offset: config.follow_offset,
            zoom_factor: 1.0,
        };

        info!(
            "Simulation ready: actor at {}, terrain {}",
            state.position,
            if tiler.is_some() { "tiled" } else { "none" }
        );

        Ok(Self {
            config,
            state,
            tiler,
            frame: 0,
        })
    }

    pub fn state(&self) -> &ActorState {
        &self.state
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn tiler(&self) -> Option<&TerrainTiler> {
        self.tiler.as_ref()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advance one tick.
    pub fn step(
        &mut self,
        input: &ControlInput,
        command: Option<&IntentCommand>,
        dt: f32,
    ) -> FrameSnapshot {
        self.frame += 1;

        if let Some(command) = command {
            self.apply_command(command);
        }

        let turn = match (input.left, input.right) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };
        self.state.heading += turn * self.config.turn_rate * dt;

        if !self.state.paused {
            let mut move_vec = f32::from(self.state.move_direction);
            if input.forward {
                move_vec += 1.0;
            }
            if input.back {
                move_vec -= 1.0;
            }
            if move_vec != 0.0 {
                let dist =
                    move_vec * self.config.move_speed * self.state.speed_multiplier * dt;
                // Local forward is −Y.
                self.state.position += Vec3::new(0.0, -dist, 0.0).rotated_z(self.state.heading);
            }
        }

        let rebuild = self.update_tiles();
        self.snapshot(dt, rebuild.is_some())
    }

    /// Apply one bridge command to the actor state.
    pub fn apply_command(&mut self, command: &IntentCommand) {
        let state = &mut self.state;
        match command.action {
            Action::Move => match command.text("direction") {
                Some(direction::FORWARD) => {
                    state.move_direction = 1;
                    state.paused = false;
                }
                Some(direction::BACK) => {
                    state.move_direction = -1;
                    state.paused = false;
                }
                _ => state.move_direction = 0,
            },
            Action::Rotate => {
                state.heading += command.number("degrees").unwrap_or(0.0);
            }
            Action::Zoom => {
                let delta = command.number("delta").unwrap_or(0.0);
                let factor = zoom_factor(delta);
                let offset = state.camera_offset;
                state.camera_offset = Vec3::new(offset.x, offset.y * factor, offset.z * factor);
                state.zoom_factor *= factor;
            }
            Action::Pause => {
                state.paused = true;
                state.move_direction = 0;
            }
            Action::Resume => state.paused = false,
            Action::Accelerate => {
                let factor = command.number("factor").unwrap_or(0.5);
                state.speed_multiplier = (state.speed_multiplier + factor)
                    .clamp(MIN_SPEED_MULTIPLIER, MAX_SPEED_MULTIPLIER);
            }
            Action::Boot | Action::LoadScene | Action::RenderFrame | Action::Shutdown => {
                debug!("{} is handled by the producer; ignored", command.action);
                return;
            }
            Action::Unknown => {
                warn!("Ignoring unknown action from '{}'", command.source);
                return;
            }
        }
        info!("Applied {} @ {:.3}", command.action, command.timestamp);
    }

    fn update_tiles(&mut self) -> Option<TileRebuild> {
        let position = self.state.position;
        self.tiler.as_mut()?.update(position)
    }

    /// Renderer view of the current state.
    pub fn snapshot(&self, dt: f32, tiles_rebuilt: bool) -> FrameSnapshot {
        let camera = FollowCamera::new(self.state.camera_offset);
        FrameSnapshot {
            frame: self.frame,
            dt,
            actor: ActorTransform {
                position: self.state.position,
                heading: self.state.heading,
            },
            camera: camera.pose(self.state.position, self.state.heading),
            tiles: self
                .tiler
                .as_ref()
                .map(TerrainTiler::transforms)
                .unwrap_or_default(),
            tiles_rebuilt,
        }
    }
}

/// Offset scale for a zoom `delta`: positive pulls the camera in (down to
/// 0.3), negative pushes it out (up to 3.0).
pub fn zoom_factor(delta: f32) -> f32 {
    if delta >= 0.0 {
        (1.0 - delta * 0.5).max(0.3)
    } else {
        (1.0 + delta.abs() * 0.5).min(3.0)
    }
}
