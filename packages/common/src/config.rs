use crate::error::CommonError;
use crate::result::CommonResult;
use crate::ids::DEFAULT_ID_PREFIX;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of undo levels (0 = unlimited)
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,

    /// Autosave behaviour
    #[serde(default)]
    pub autosave: AutosaveConfig,

    /// Prefix for generated block IDs
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutosaveConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Quiet period after the last change before a save fires
    #[serde(default = "default_quiet_period_ms")]
    pub quiet_period_ms: u64,

    /// How long `just_saved` stays set after a successful save
    #[serde(default = "default_saved_indicator_ms")]
    pub saved_indicator_ms: u64,
}

fn default_history_depth() -> usize {
    50
}

fn default_id_prefix() -> String {
    DEFAULT_ID_PREFIX.to_string()
}

fn default_true() -> bool {
    true
}

fn default_quiet_period_ms() -> u64 {
    2000
}

fn default_saved_indicator_ms() -> u64 {
    2000
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults when absent
    pub fn load(cwd: impl AsRef<Path>) -> CommonResult<Self> {
        let config_path = Self::path_in(cwd);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: EditorConfig = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(EditorConfig::default())
        }
    }

    pub fn validate(&self) -> CommonResult<()> {
        if self.id_prefix.is_empty() {
            return Err(CommonError::from("idPrefix must not be empty"));
        }
        Ok(())
    }

    /// Write config into a directory
    pub fn write(&self, cwd: impl AsRef<Path>) -> CommonResult<PathBuf> {
        let config_path = Self::path_in(cwd);
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }

    pub fn path_in(cwd: impl AsRef<Path>) -> PathBuf {
        cwd.as_ref().join(DEFAULT_CONFIG_NAME)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: default_history_depth(),
            autosave: AutosaveConfig::default(),
            id_prefix: default_id_prefix(),
        }
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            quiet_period_ms: default_quiet_period_ms(),
            saved_indicator_ms: default_saved_indicator_ms(),
        }
    }
}
