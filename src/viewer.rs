//! Viewer loop – fixed-tick simulation driven by the command bridge.
//!
//! ## Per tick
//!
//! | Step | Effect                                                        |
//! |------|---------------------------------------------------------------|
//! | 1    | `BridgeReceiver::receive` – at most one fresh command          |
//! | 2    | snapshot the shared [`ControlInput`]                           |
//! | 3    | `Simulation::step(input, command, dt)`                         |
//! | 4    | hand the [`FrameSnapshot`] to the renderer callback            |
//!
//! The bridge read never blocks and never fails the loop.

use crate::bridge::{BridgeReceiver, Slot};
use crate::protocol::FrameSnapshot;
use crate::simulation::{ControlInput, Simulation};
use anyhow::Result;
use log::{info, warn};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

pub struct ViewerAgent<S: Slot> {
    tick_rate_hz: f32,
    simulation: Simulation,
    receiver: BridgeReceiver<S>,
    input: Arc<Mutex<ControlInput>>,
}

impl<S: Slot> ViewerAgent<S> {
    pub fn new(tick_rate_hz: f32, simulation: Simulation, receiver: BridgeReceiver<S>) -> Self {
        Self {
            tick_rate_hz,
            simulation,
            receiver,
            input: Arc::new(Mutex::new(ControlInput::default())),
        }
    }

    /// Shared handle the windowing shell updates as keys go up and down.
    pub fn control_handle(&self) -> Arc<Mutex<ControlInput>> {
        self.input.clone()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Poll the bridge and advance the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> FrameSnapshot {
        let command = self.receiver.receive();
        let input = *self.input.lock();
        self.simulation.step(&input, command.as_ref(), dt)
    }

    /// Tick at `tick_rate_hz` until Ctrl-C, passing every frame to `publish`.
    #[tracing::instrument(skip_all)]
    pub async fn run<F: FnMut(&FrameSnapshot)>(mut self, mut publish: F) -> Result<()> {
        let period = Duration::from_secs_f32(1.0 / self.tick_rate_hz.max(1.0));
        let mut timer = tokio::time::interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        info!("Viewer ticking at {:.0}Hz", self.tick_rate_hz);
        let mut last = Instant::now();
        loop {
            tokio::select! {
                _ = timer.tick() => {
                    let now = Instant::now();
                    let dt = now.duration_since(last).as_secs_f32();
                    last = now;
                    let frame = self.tick(dt);
                    publish(&frame);
                }
                _ = &mut shutdown => {
                    info!("Viewer shutting down (SIGINT) after {} frames", self.simulation.frame());
                    break;
                }
            }
        }
        Ok(())
    }
}

/// Serialise `frame` as one JSON line.
///
/// Errors are logged and swallowed; the tick loop keeps running.
pub fn write_frame<W: Write>(out: &mut W, frame: &FrameSnapshot) {
    let result = serde_json::to_writer(&mut *out, frame)
        .map_err(std::io::Error::from)
        .and_then(|()| out.write_all(b"\n"))
        .and_then(|()| out.flush());
    if let Err(e) = result {
        warn!("Failed to write frame {}: {}", frame.frame, e);
    }
}
