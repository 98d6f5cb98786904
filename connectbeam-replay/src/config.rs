//! Persistent defaults for the replay tool
//!
//! Stored as JSON in the platform config directory. Command-line flags
//! override what is loaded here.

use anyhow::{anyhow, Context};
use connectbeam_core::resources::ToolResources;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const MAX_RECENT_SCENES: usize = 10;

/// Settings remembered between runs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Defaults for grab distance, handle size and connector type
    #[serde(default)]
    pub resources: ToolResources,

    /// Newest first
    #[serde(default)]
    pub recent_scenes: Vec<PathBuf>,
}

impl AppConfig {
    /// Stored settings, or the defaults when there are none or they are unusable
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring replay config: {:#}", e);
                Self::default()
            }
        }
    }

    fn try_load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&contents)
    }

    /// Parse settings and reject unusable tool resources
    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        let config: AppConfig =
            serde_json::from_str(contents).context("parsing replay config")?;
        config.resources.validate()?;
        Ok(config)
    }

    /// Store the settings; failure is only logged
    pub fn save(&self) {
        if let Err(e) = self.try_save() {
            log::warn!("Could not store replay config: {:#}", e);
        }
    }

    /// Written to a sibling temp file first, then renamed over the old one
    fn try_save(&self) -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }

        let staged = path.with_extension("json.tmp");
        std::fs::write(&staged, serde_json::to_string_pretty(self)?)?;
        std::fs::rename(&staged, &path)?;
        log::debug!("Stored replay config in {}", path.display());
        Ok(())
    }

    fn config_path() -> anyhow::Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "connectbeam")
            .ok_or_else(|| anyhow!("no config directory for this platform"))?;
        Ok(dirs.config_dir().join("replay.json"))
    }

    /// Put a scene at the front of the recent list
    ///
    /// Paths are canonicalized; duplicates are dropped and the list is
    /// capped at 10 entries. Does not save.
    pub fn add_recent_scene(&mut self, path: PathBuf) {
        let scene = match path.canonicalize() {
            Ok(scene) => scene,
            Err(e) => {
                log::debug!("Not remembering {}: {}", path.display(), e);
                return;
            }
        };

        self.recent_scenes.retain(|known| known != &scene);
        self.recent_scenes.insert(0, scene);
        self.recent_scenes.truncate(MAX_RECENT_SCENES);
    }
}
