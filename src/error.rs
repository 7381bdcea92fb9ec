//! Error types.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to read or write the persisted bridge slot.
///
/// Callers on both sides of the bridge downgrade these: the producer logs and
/// drops the write, the viewer treats them as "no new command".
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("bridge I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed bridge message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Outcome of asking the asset collaborator for a model's bounds.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssetError {
    #[error("asset '{0}' not found")]
    Missing(String),
    #[error("asset '{name}' failed to load: {reason}")]
    LoadFailed { name: String, reason: String },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("actor bounds unavailable: {0}")]
    Actor(AssetError),
    #[error("terrain bounds unavailable: {0}")]
    Terrain(AssetError),
    #[error("terrain footprint is degenerate ({width} x {depth})")]
    DegenerateTerrain { width: f32, depth: f32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}
