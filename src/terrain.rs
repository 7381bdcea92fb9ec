//! Terrain subsystem: model alignment, actor placement and the infinite tile
//! grid that follows the actor.

use crate::error::SimulationError;
use crate::protocol::TileTransform;
use crate::types::{Aabb, TileCoord, Vec3};
use log::info;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Footprint multiplier (≥ 1.0) so neighbouring tiles overlap slightly
    /// and float rounding never leaves a gap.
    pub tile_overlap: f32,
    /// Chebyshev radius of the grid; 1 gives a 3×3 block.
    pub span: i32,
    /// Vertical scale applied to the terrain model.
    pub flatten: f32,
    /// Distance the terrain's lowest point sits below the origin.
    pub drop: f32,
    /// Gap left between the terrain top and the actor's lowest point.
    pub actor_clearance: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            tile_overlap: 1.0,
            span: 1,
            flatten: 0.70,
            drop: 0.8,
            actor_clearance: 0.05,
        }
    }
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Terrain model placement: the node's Z offset and its resulting world bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedTerrain {
    pub z_offset: f32,
    pub bounds: Aabb,
}

/// Flatten the terrain model and drop it so its lowest point sits at `-drop`.
pub fn align_terrain(model: &Aabb, config: &TerrainConfig) -> AlignedTerrain {
    let flattened = Aabb::new(
        Vec3::new(model.min.x, model.min.y, model.min.z * config.flatten),
        Vec3::new(model.max.x, model.max.y, model.max.z * config.flatten),
    );
    let z_offset = -flattened.min.z - config.drop;
    AlignedTerrain {
        z_offset,
        bounds: flattened.translated(Vec3::new(0.0, 0.0, z_offset)),
    }
}

/// Actor origin height that rests its lowest point just above the terrain's
/// highest point, whatever the model-space origin of either.
pub fn actor_rest_height(actor: &Aabb, terrain: Option<&Aabb>, clearance: f32) -> f32 {
    let terrain_top = terrain.map(|t| t.max.z).unwrap_or(0.0);
    terrain_top - actor.min.z + clearance
}

// ---------------------------------------------------------------------------
// Tile grid
// ---------------------------------------------------------------------------

/// A placed copy of the terrain model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileInstance {
    pub index: TileCoord,
    pub position: Vec3,
    /// The base model itself rather than a clone of it.
    pub origin: bool,
}

impl TileInstance {
    pub fn transform(&self) -> TileTransform {
        TileTransform {
            index: self.index,
            position: self.position,
        }
    }
}

/// Report of one full grid rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRebuild {
    pub from: TileCoord,
    pub to: TileCoord,
    /// Clone tiles destroyed.
    pub removed: usize,
    /// Clone tiles created.
    pub spawned: usize,
}

/// Keeps `(2·span+1)²` tiles centred on the actor's tile index.
///
/// When the actor enters a new tile the grid is rebuilt from scratch rather
/// than shifted, so it never passes through a partially covered state.
pub struct TerrainTiler {
    tile_width: f32,
    tile_depth: f32,
    base_z: f32,
    span: i32,
    center: TileCoord,
    tiles: Vec<TileInstance>,
}

impl TerrainTiler {
    /// Build the grid around tile (0, 0) from the aligned terrain.
    pub fn new(terrain: &AlignedTerrain, config: &TerrainConfig) -> Result<Self, SimulationError> {
        let overlap = config.tile_overlap.max(1.0);
        let width = terrain.bounds.width() * overlap;
        let depth = terrain.bounds.depth() * overlap;
        if !(width > 0.0 && depth > 0.0) {
            return Err(SimulationError::DegenerateTerrain { width, depth });
        }

        let mut tiler = Self {
            tile_width: width,
            tile_depth: depth,
            base_z: terrain.z_offset,
            span: config.span.max(1),
            center: TileCoord::default(),
            tiles: Vec::new(),
        };
        tiler.rebuild(TileCoord::default());
        Ok(tiler)
    }

    pub fn tile_size(&self) -> (f32, f32) {
        (self.tile_width, self.tile_depth)
    }

    pub fn center(&self) -> TileCoord {
        self.center
    }

    pub fn span(&self) -> i32 {
        self.span
    }

    pub fn tiles(&self) -> &[TileInstance] {
        &self.tiles
    }

    pub fn transforms(&self) -> Vec<TileTransform> {
        self.tiles.iter().map(TileInstance::transform).collect()
    }

    /// Tile index containing `position`: component-wise `round(pos / size)`.
    pub fn tile_index(&self, position: Vec3) -> TileCoord {
        TileCoord::new(
            (position.x / self.tile_width).round() as i32,
            (position.y / self.tile_depth).round() as i32,
        )
    }

    /// Re-centre on the actor. Returns the rebuild when the index changed.
    pub fn update(&mut self, actor_position: Vec3) -> Option<TileRebuild> {
        let index = self.tile_index(actor_position);
        if index == self.center {
            return None;
        }

        let from = self.center;
        let removed = self.tiles.iter().filter(|t| !t.origin).count();
        self.rebuild(index);
        let spawned = self.tiles.iter().filter(|t| !t.origin).count();

        info!("Terrain grid re-centred {} -> {}", from, index);
        Some(TileRebuild {
            from,
            to: index,
            removed,
            spawned,
        })
    }

    fn rebuild(&mut self, center: TileCoord) {
        self.tiles.clear();
        self.tiles.push(TileInstance {
            index: center,
            position: self.tile_position(center),
            origin: true,
        });
        for dx in -self.span..=self.span {
            for dy in -self.span..=self.span {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let index = center.offset(dx, dy);
                self.tiles.push(TileInstance {
                    index,
                    position: self.tile_position(index),
                    origin: false,
                });
            }
        }
        self.center = center;
    }

    fn tile_position(&self, index: TileCoord) -> Vec3 {
        Vec3::new(
            index.x as f32 * self.tile_width,
            index.y as f32 * self.tile_depth,
            self.base_z,
        )
    }
}
