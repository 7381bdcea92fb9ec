//! gesture-viewer binary
//!
//! Runs the fixed-tick simulation, polling the bridge file once per tick.
//! With `--emit-frames` every tick's renderer snapshot is written to stdout
//! as one JSON line.
//!
//! ## Configuration (flags / env / TOML via `config` crate)
//!
//! | Key                          | Default           | Description                     |
//! |------------------------------|-------------------|---------------------------------|
//! | `GESTURE_CONFIG`             | *(none)*          | TOML config file                |
//! | `GESTURE_BRIDGE_PATH`        | `.commands.json`  | Shared bridge file              |
//! | `GESTURE_TICK_RATE_HZ`       | `60`              | Simulation tick rate            |
//! | `GESTURE_EMIT_FRAMES`        | `false`           | Write frame snapshots to stdout |
//! | `GESTURE_MOVE_SPEED`         | `3.0`             | Actor speed (units/s)           |
//! | `GESTURE__SIMULATION__*`     |                   | see `SimulationConfig`          |

use anyhow::{Context, Result};
use clap::Parser;
use gesture_world::{
    bridge::{BridgeReceiver, FileSlot},
    config::{self, ViewerConfig},
    error::AssetError,
    simulation::Simulation,
    viewer::{write_frame, ViewerAgent},
};
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "gesture-viewer", about = "Gesture-driven actor simulation", version)]
struct Args {
    /// TOML configuration file
    #[arg(long, env = "GESTURE_CONFIG")]
    config: Option<PathBuf>,

    /// Shared bridge file
    #[arg(long, env = "GESTURE_BRIDGE_PATH")]
    bridge_path: Option<PathBuf>,

    /// Tick rate (Hz)
    #[arg(long, env = "GESTURE_TICK_RATE_HZ")]
    tick_rate_hz: Option<f32>,

    /// Write one JSON frame snapshot per tick to stdout
    #[arg(long, env = "GESTURE_EMIT_FRAMES")]
    emit_frames: bool,

    /// Actor speed (world units per second)
    #[arg(long, env = "GESTURE_MOVE_SPEED")]
    move_speed: Option<f32>,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise logging (stderr; stdout carries frames)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gesture_world=debug".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut cfg: ViewerConfig =
        config::load(args.config.as_deref()).context("Failed to load viewer config")?;
    if let Some(path) = args.bridge_path {
        cfg.bridge_path = path;
    }
    if let Some(hz) = args.tick_rate_hz {
        cfg.tick_rate_hz = hz;
    }
    if let Some(speed) = args.move_speed {
        cfg.simulation.move_speed = speed;
    }
    cfg.emit_frames |= args.emit_frames;

    log::info!(
        "Starting gesture-viewer (bridge='{}', tick={}Hz, terrain={})",
        cfg.bridge_path.display(),
        cfg.tick_rate_hz,
        cfg.terrain_bounds.is_some(),
    );

    let actor = cfg
        .actor_bounds
        .ok_or_else(|| AssetError::Missing("actor".into()));
    let terrain = cfg.terrain_bounds.map(Ok);
    let simulation = Simulation::new(cfg.simulation.clone(), actor, terrain)
        .context("Refusing to start simulation")?;

    let receiver = BridgeReceiver::new(FileSlot::new(&cfg.bridge_path));
    let agent = ViewerAgent::new(cfg.tick_rate_hz, simulation, receiver);

    // Run until shutdown
    let emit = cfg.emit_frames;
    let mut stdout = std::io::stdout().lock();
    agent
        .run(move |frame| {
            if emit {
                write_frame(&mut stdout, frame);
            }
        })
        .await
}
