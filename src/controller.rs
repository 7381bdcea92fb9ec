//! Producer loop – landmark frames in, bridge writes out.
//!
//! ```text
//! HandFrame (JSON line) → GestureClassifier → GestureDispatcher (cooldown)
//!                       → CommandPipeline → BridgeSender → slot
//! ```
//!
//! Classification and cooldown state live only in this loop, so nothing here
//! is shared or locked. The loop never waits on the viewer.

use crate::bridge::{unix_now, Slot};
use crate::classifier::GestureClassifier;
use crate::config::ControllerConfig;
use crate::dispatcher::GestureDispatcher;
use crate::landmarks::HandFrame;
use crate::pipeline::{AssetResolver, CommandPipeline};
use crate::protocol::{payload, Action, CommandResponse, Intent};
use anyhow::Result;
use log::{debug, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Counters reported when the input stream ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerStats {
    pub frames: u64,
    pub rejected_lines: u64,
    pub gestures: u64,
    pub commands: u64,
}

pub struct GestureController<S: Slot, R: AssetResolver> {
    classifier: GestureClassifier,
    dispatcher: GestureDispatcher,
    pipeline: CommandPipeline<S, R>,
    warmup_frames: u64,
    boot_scene: String,
    stats: ControllerStats,
}

impl<S: Slot, R: AssetResolver> GestureController<S, R> {
    pub fn new(config: &ControllerConfig, pipeline: CommandPipeline<S, R>) -> Self {
        Self {
            classifier: GestureClassifier::new(config.classifier.clone()),
            dispatcher: GestureDispatcher::new(config.dispatcher.clone()),
            pipeline,
            warmup_frames: u64::from(config.warmup_frames),
            boot_scene: config.boot_scene.clone(),
            stats: ControllerStats::default(),
        }
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    pub fn pipeline(&self) -> &CommandPipeline<S, R> {
        &self.pipeline
    }

    /// Request the boot scene.
    pub fn start(&mut self, now: f64) -> CommandResponse {
        info!("Starting gesture loop (scene '{}')", self.boot_scene);
        let boot = Intent::new(Action::Boot, payload([("scene", self.boot_scene.as_str())]));
        self.pipeline.apply(boot, now)
    }

    pub fn stop(&mut self, now: f64) -> CommandResponse {
        info!("Stopping gesture loop");
        self.pipeline.apply(Intent::bare(Action::Shutdown), now)
    }

    /// Classify one frame and forward the resulting intent, if any.
    pub fn handle_frame(&mut self, frame: &HandFrame, now: f64) -> Option<CommandResponse> {
        self.stats.frames += 1;
        if self.stats.frames <= self.warmup_frames {
            return None;
        }

        let event = self.classifier.classify(frame)?;
        self.stats.gestures += 1;

        let intent = self.dispatcher.dispatch(&event, now)?;
        let action = intent.action;
        let response = self.pipeline.apply(intent, now);
        self.stats.commands += 1;
        info!(
            "Gesture {} ({}) -> {}: {:?}",
            event.kind().as_str(),
            event.hand,
            action,
            response
        );
        Some(response)
    }

    /// Consume newline-delimited JSON [`HandFrame`]s until EOF.
    ///
    /// Lines that fail to parse are logged and skipped.
    #[tracing::instrument(skip_all)]
    pub async fn run<I: AsyncBufRead + Unpin>(&mut self, input: I) -> Result<ControllerStats> {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<HandFrame>(line) {
                Ok(frame) => {
                    self.handle_frame(&frame, unix_now());
                }
                Err(e) => {
                    self.stats.rejected_lines += 1;
                    warn!("Skipping malformed landmark frame: {}", e);
                }
            }
        }
        debug!("Landmark stream ended after {} frames", self.stats.frames);
        Ok(self.stats)
    }
}
