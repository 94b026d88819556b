//! Scripted snapshot sequences for replaying the bot tick by tick.

use crate::profiles::load_config_file;
use crate::settings::resolve_config;
use anyhow::{anyhow, Context, Result};
use playerbot_core::{BodySegment, BotConfig, ControlledPlayer, EntityId, PlayerState, VisibleEntity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BotSetup {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub skin: Option<String>,
    #[serde(default = "default_seed")]
    pub seed: u32,
}

impl Default for BotSetup {
    fn default() -> Self {
        Self {
            name: None,
            skin: None,
            seed: default_seed(),
        }
    }
}

fn default_seed() -> u32 {
    1
}

fn default_repeat() -> u32 {
    1
}

/// Changes applied to the player before a tick. Omitted fields carry over.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScenarioFrame {
    #[serde(default = "default_repeat")]
    pub repeat: u32,
    #[serde(default)]
    pub state: Option<PlayerState>,
    #[serde(default)]
    pub owned_cells: Option<Vec<BodySegment>>,
    #[serde(default)]
    pub visible_cells: Option<BTreeMap<EntityId, VisibleEntity>>,
    #[serde(default)]
    pub exists: Option<bool>,
    #[serde(default)]
    pub has_world: Option<bool>,
}

impl ScenarioFrame {
    pub fn apply(&self, player: &mut ControlledPlayer) {
        if let Some(state) = self.state {
            player.state = state;
        }
        if let Some(cells) = &self.owned_cells {
            player.owned_cells = cells.clone();
        }
        if let Some(visible) = &self.visible_cells {
            player.visible_cells = visible.clone();
        }
        if let Some(exists) = self.exists {
            player.exists = exists;
        }
        if let Some(has_world) = self.has_world {
            player.has_world = has_world;
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    /// Inline server settings; takes precedence over `settings_file` and `profile`.
    #[serde(default)]
    pub config: Option<BotConfig>,
    /// Settings file, relative to the scenario file.
    #[serde(default)]
    pub settings_file: Option<PathBuf>,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub bot: BotSetup,
    pub player: ControlledPlayer,
    #[serde(default)]
    pub frames: Vec<ScenarioFrame>,
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read(path).with_context(|| format!("failed reading scenario {}", path.display()))?;
        let mut scenario: Scenario = serde_json::from_slice(&raw)
            .with_context(|| format!("invalid scenario json in {}", path.display()))?;
        scenario.base_dir = path.parent().map(Path::to_path_buf);
        if scenario.name.is_empty() {
            scenario.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(scenario)
    }

    pub fn resolve_config(&self) -> Result<BotConfig> {
        if let Some(config) = &self.config {
            config
                .validate()
                .map_err(|err| anyhow!("scenario '{}' has invalid settings: {err}", self.name))?;
            return Ok(config.clone());
        }
        if let Some(file) = &self.settings_file {
            let path = match &self.base_dir {
                Some(dir) if file.is_relative() => dir.join(file),
                _ => file.clone(),
            };
            return load_config_file(&path);
        }
        resolve_config(None, self.profile.as_deref())
    }

    pub fn tick_count(&self) -> u64 {
        self.frames.iter().map(|frame| frame.repeat as u64).sum()
    }
}
