//! Producer-side command pipeline.
//!
//! Every accepted intent passes through [`CommandPipeline::apply`]. Scene
//! loading, frame layout and shutdown are answered here; simulation actions
//! are stamped and written through the bridge for the viewer to pick up.

use crate::bridge::{BridgeSender, Slot};
use crate::camera::CameraRig;
use crate::protocol::{Action, CommandResponse, Intent, RenderLayout};
use log::{debug, info};
use std::collections::HashMap;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Scene resolution
// ---------------------------------------------------------------------------

/// Resolves an asset id to a model path. Backed by the external asset
/// registry; the pipeline never interprets the path.
pub trait AssetResolver {
    fn resolve(&self, asset_id: &str) -> Option<PathBuf>;
}

impl AssetResolver for HashMap<String, PathBuf> {
    fn resolve(&self, asset_id: &str) -> Option<PathBuf> {
        self.get(asset_id).cloned()
    }
}

/// Preset scene ids and the asset each one shows.
#[derive(Debug, Clone)]
pub struct SceneCatalog {
    presets: HashMap<String, String>,
}

impl SceneCatalog {
    pub fn new() -> Self {
        Self {
            presets: HashMap::new(),
        }
    }

    pub fn with_preset(mut self, scene: impl Into<String>, asset_id: impl Into<String>) -> Self {
        self.presets.insert(scene.into(), asset_id.into());
        self
    }

    /// Asset id for a scene; unknown scenes name their asset directly.
    pub fn asset_id<'a>(&'a self, scene: &'a str) -> &'a str {
        self.presets.get(scene).map(String::as_str).unwrap_or(scene)
    }
}

impl Default for SceneCatalog {
    fn default() -> Self {
        Self::new()
            .with_preset("default", "ground_terrain_part_1")
            .with_preset("machinery", "excavator")
            .with_preset("truck", "dump_truck")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneInfo {
    pub id: String,
    pub asset_id: Option<String>,
    pub asset: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

pub struct CommandPipeline<S: Slot, R: AssetResolver> {
    sender: BridgeSender<S>,
    resolver: R,
    catalog: SceneCatalog,
    rig: CameraRig,
    current_scene: Option<SceneInfo>,
}

impl<S: Slot, R: AssetResolver> CommandPipeline<S, R> {
    pub fn new(sender: BridgeSender<S>, resolver: R) -> Self {
        Self {
            sender,
            resolver,
            catalog: SceneCatalog::default(),
            rig: CameraRig::default(),
            current_scene: None,
        }
    }

    pub fn with_catalog(mut self, catalog: SceneCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_rig(mut self, rig: CameraRig) -> Self {
        self.rig = rig;
        self
    }

    pub fn current_scene(&self) -> Option<&SceneInfo> {
        self.current_scene.as_ref()
    }

    pub fn apply(&mut self, intent: Intent, now: f64) -> CommandResponse {
        match intent.action {
            Action::Boot | Action::LoadScene => {
                let scene = intent.text("scene").unwrap_or("default").to_string();
                let info = self.load_scene(&scene);
                let asset = info.asset.as_ref().map(|p| p.display().to_string());
                info!("Scene '{}' loaded (asset: {:?})", scene, asset);
                self.current_scene = Some(info);
                CommandResponse::SceneLoaded { scene, asset }
            }
            action if action.crosses_bridge() => {
                let ack = self.sender.send(intent, now);
                CommandResponse::Queued { action, ack }
            }
            Action::RenderFrame => CommandResponse::Frame {
                layout: RenderLayout {
                    scene: self.current_scene.as_ref().map(|s| s.id.clone()),
                    views: self.rig.build_views(),
                },
            },
            Action::Shutdown => {
                self.current_scene = None;
                CommandResponse::Stopped
            }
            action => {
                debug!("Ignored action {}", action);
                CommandResponse::Ignored {
                    reason: format!("unknown action: {}", action),
                }
            }
        }
    }

    fn load_scene(&self, scene: &str) -> SceneInfo {
        let preset = self.catalog.asset_id(scene);
        let resolved = [preset, scene]
            .into_iter()
            .find_map(|id| self.resolver.resolve(id).map(|path| (id.to_string(), path)));

        match resolved {
            Some((asset_id, asset)) => SceneInfo {
                id: scene.to_string(),
                asset_id: Some(asset_id),
                asset: Some(asset),
            },
            None => SceneInfo {
                id: scene.to_string(),
                asset_id: None,
                asset: None,
            },
        }
    }
}
