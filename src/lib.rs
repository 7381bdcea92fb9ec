//! Gesture World
//!
//! Hand-landmark gestures drive a simulated actor across infinite tiled
//! terrain, with the gesture producer and the viewer in separate processes.
//!
//! ## Architecture
//!
//! ```text
//! producer process                         viewer process
//! GestureController  (controller.rs)       ViewerAgent  (viewer.rs)
//!   ├── GestureClassifier (classifier.rs)    └── Simulation  (simulation.rs)
//!   ├── GestureDispatcher (dispatcher.rs)          ├── FollowCamera  (camera.rs)
//!   └── CommandPipeline   (pipeline.rs)            └── TerrainTiler  (terrain.rs)
//!         └── BridgeSender ──── slot ──── BridgeReceiver   (bridge.rs)
//! ```
//!
//! The bridge is a single last-write-wins slot gated by timestamp: the viewer
//! applies each write at most once and tolerates missing or torn records.

// Core types are always available (no runtime feature needed).
pub mod bridge;
pub mod camera;
pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod landmarks;
pub mod pipeline;
pub mod protocol;
pub mod simulation;
pub mod terrain;
pub mod types;

// Producer/consumer loops require the `runtime` feature.
#[cfg(feature = "runtime")]
pub mod controller;
#[cfg(feature = "runtime")]
pub mod viewer;

// Convenience re-exports
pub use bridge::{BridgeReceiver, BridgeSender, FileSlot, MemorySlot, Slot};
pub use classifier::{Gesture, GestureClassifier, GestureEvent, GestureKind};
pub use dispatcher::GestureDispatcher;
pub use protocol::{Action, FrameSnapshot, Intent, IntentCommand};
pub use simulation::{ActorState, ControlInput, Simulation};
pub use terrain::TerrainTiler;
pub use types::{Aabb, Handedness, TileCoord, Vec3};

#[cfg(feature = "runtime")]
pub use controller::GestureController;
#[cfg(feature = "runtime")]
pub use viewer::ViewerAgent;
