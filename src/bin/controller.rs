//! gesture-controller binary
//!
//! Reads hand-landmark frames (one JSON `HandFrame` per line) from stdin,
//! classifies them and writes intent commands to the bridge file.
//!
//! ## Configuration (flags / env / TOML via `config` crate)
//!
//! | Key                        | Default           | Description                       |
//! |----------------------------|-------------------|-----------------------------------|
//! | `GESTURE_CONFIG`           | *(none)*          | TOML config file                  |
//! | `GESTURE_BRIDGE_PATH`      | `.commands.json`  | Shared bridge file                |
//! | `GESTURE_WARMUP_FRAMES`    | `5`               | Frames ignored at startup         |
//! | `GESTURE_SCENE`            | `default`         | Scene requested on boot           |
//! | `GESTURE__CLASSIFIER__*`   |                   | `pinch_threshold`, `confidence_min` |
//! | `GESTURE__DISPATCHER__*`   |                   | `cooldown_secs`, `rotate_degrees` |

use anyhow::{Context, Result};
use clap::Parser;
use gesture_world::{
    bridge::{unix_now, BridgeSender, FileSlot},
    config::{self, ControllerConfig},
    controller::GestureController,
    pipeline::CommandPipeline,
};
use std::collections::HashMap;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "gesture-controller", about = "Gesture → command producer", version)]
struct Args {
    /// TOML configuration file
    #[arg(long, env = "GESTURE_CONFIG")]
    config: Option<PathBuf>,

    /// Shared bridge file
    #[arg(long, env = "GESTURE_BRIDGE_PATH")]
    bridge_path: Option<PathBuf>,

    /// Frames ignored while the detector settles
    #[arg(long, env = "GESTURE_WARMUP_FRAMES")]
    warmup_frames: Option<u32>,

    /// Scene requested on boot
    #[arg(long, env = "GESTURE_SCENE")]
    scene: Option<String>,

    /// Known assets as `id=path` (repeatable)
    #[arg(long = "asset", value_parser = parse_asset)]
    assets: Vec<(String, PathBuf)>,
}

fn parse_asset(raw: &str) -> Result<(String, PathBuf), String> {
    raw.split_once('=')
        .map(|(id, path)| (id.to_string(), PathBuf::from(path)))
        .ok_or_else(|| format!("expected id=path, got '{}'", raw))
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gesture_world=debug".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut cfg: ControllerConfig =
        config::load(args.config.as_deref()).context("Failed to load controller config")?;
    if let Some(path) = args.bridge_path {
        cfg.bridge_path = path;
    }
    if let Some(frames) = args.warmup_frames {
        cfg.warmup_frames = frames;
    }
    if let Some(scene) = args.scene {
        cfg.boot_scene = scene;
    }

    log::info!(
        "Starting gesture-controller (bridge='{}', warmup={}, cooldown={}s)",
        cfg.bridge_path.display(),
        cfg.warmup_frames,
        cfg.dispatcher.cooldown_secs,
    );

    let assets: HashMap<String, PathBuf> = args.assets.into_iter().collect();
    let sender = BridgeSender::new(FileSlot::new(&cfg.bridge_path), cfg.source.clone());
    let pipeline = CommandPipeline::new(sender, assets);
    let mut controller = GestureController::new(&cfg, pipeline);

    let boot = controller.start(unix_now());
    log::info!("Boot: {:?}", boot);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stats = controller.run(stdin).await?;

    controller.stop(unix_now());
    log::info!(
        "Processed {} frames: {} gestures, {} commands, {} rejected lines",
        stats.frames,
        stats.gestures,
        stats.commands,
        stats.rejected_lines,
    );
    Ok(())
}
