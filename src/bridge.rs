//! Command bridge – single-slot, last-write-wins channel between the gesture
//! producer and the viewer process.
//!
//! ## Contract
//!
//! ```text
//! producer process                     │  viewer process
//! ─────────────────────────────────── │ ──────────────────────────────
//! BridgeSender::send(intent, now)      │  BridgeReceiver::receive()
//!   → stamp timestamp                  │    → Slot::read()  (tolerant)
//!   → Slot::write()  (replace, atomic) │    → skip if ts <= last consumed
//!   → Ack::Written | Ack::Dropped      │    → Some(command) once per write
//! ```
//!
//! There is exactly one live message. A write replaces it; a command that is
//! overwritten before the viewer polls is lost. Commands describe desired
//! state, so the next write supersedes anything dropped.

use crate::error::BridgeError;
use crate::protocol::{Ack, Intent, IntentCommand};
use log::{debug, warn};
use parking_lot::Mutex;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default file name of the persisted slot.
pub const DEFAULT_BRIDGE_FILE: &str = ".commands.json";

/// Seconds since the Unix epoch.
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Slot storage
// ---------------------------------------------------------------------------

/// Storage for the single live message.
pub trait Slot {
    /// Replace the stored message as one unit.
    fn write(&self, command: &IntentCommand) -> Result<(), BridgeError>;

    /// Current message, `Ok(None)` when nothing has been written yet.
    fn read(&self) -> Result<Option<IntentCommand>, BridgeError>;
}

/// JSON file shared by both processes. Writes go to a sibling temp file and
/// are renamed into place so a reader never sees a partial record.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> BridgeError {
        BridgeError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Slot for FileSlot {
    fn write(&self, command: &IntentCommand) -> Result<(), BridgeError> {
        let bytes = serde_json::to_vec(command)?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, bytes).map_err(|e| self.io_error(e))?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(self.io_error(e));
        }
        Ok(())
    }

    fn read(&self) -> Result<Option<IntentCommand>, BridgeError> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        Ok(Some(serde_json::from_slice(&data)?))
    }
}

/// In-process slot, for embedding both ends in one process and for tests.
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    inner: Arc<Mutex<Option<IntentCommand>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Slot for MemorySlot {
    fn write(&self, command: &IntentCommand) -> Result<(), BridgeError> {
        *self.inner.lock() = Some(command.clone());
        Ok(())
    }

    fn read(&self) -> Result<Option<IntentCommand>, BridgeError> {
        Ok(self.inner.lock().clone())
    }
}

// ---------------------------------------------------------------------------
// Producer side
// ---------------------------------------------------------------------------

pub struct BridgeSender<S: Slot> {
    slot: S,
    source: String,
    last_timestamp: f64,
}

impl<S: Slot> BridgeSender<S> {
    pub fn new(slot: S, source: impl Into<String>) -> Self {
        Self {
            slot,
            source: source.into(),
            last_timestamp: 0.0,
        }
    }

    /// Stamp `intent` at `now` and overwrite the slot.
    ///
    /// Each stamp is strictly above the previous successful one, even when
    /// the wall clock stalls or steps back, so the receiver's freshness gate
    /// never discards a new write.
    pub fn send(&mut self, intent: Intent, now: f64) -> Ack {
        let timestamp = if now > self.last_timestamp {
            now
        } else {
            next_up(self.last_timestamp)
        };
        let command = IntentCommand::new(intent, self.source.clone(), timestamp);
        let ack = self.publish(&command);
        if ack == Ack::Written {
            self.last_timestamp = timestamp;
        }
        ack
    }

    /// Write an already-stamped command. Failures are logged and swallowed.
    pub fn publish(&mut self, command: &IntentCommand) -> Ack {
        match self.slot.write(command) {
            Ok(()) => {
                debug!("Bridge write: {} @ {:.3}", command.action, command.timestamp);
                Ack::Written
            }
            Err(e) => {
                warn!("Dropped {} command: {}", command.action, e);
                Ack::Dropped
            }
        }
    }
}

/// Smallest `f64` above `v`.
fn next_up(v: f64) -> f64 {
    if v.is_nan() || v == f64::INFINITY {
        return v;
    }
    if v == 0.0 {
        return f64::from_bits(1);
    }
    let bits = v.to_bits();
    f64::from_bits(if v > 0.0 { bits + 1 } else { bits - 1 })
}

// ---------------------------------------------------------------------------
// Consumer side
// ---------------------------------------------------------------------------

pub struct BridgeReceiver<S: Slot> {
    slot: S,
    last_consumed: f64,
}

impl<S: Slot> BridgeReceiver<S> {
    pub fn new(slot: S) -> Self {
        Self {
            slot,
            last_consumed: 0.0,
        }
    }

    /// The latest command not yet consumed, if any.
    ///
    /// Read failures (missing file, torn or malformed record) are "nothing
    /// new". A command is returned at most once; anything stamped at or
    /// before the last consumed timestamp is skipped.
    pub fn receive(&mut self) -> Option<IntentCommand> {
        let command = match self.slot.read() {
            Ok(Some(command)) => command,
            Ok(None) => return None,
            Err(e) => {
                debug!("Bridge read skipped: {}", e);
                return None;
            }
        };

        if command.timestamp <= self.last_consumed {
            return None;
        }
        self.last_consumed = command.timestamp;
        Some(command)
    }

    pub fn last_consumed(&self) -> f64 {
        self.last_consumed
    }
}
