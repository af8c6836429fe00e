use crate::error::{IoOp, NutrackError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";

/// Keys accepted by [`NutrackConfig::get`] and [`NutrackConfig::set`].
pub const KEYS: &[&str] = &["data-dir"];

/// Configuration for nutrack, stored as `config.json` in the platform config
/// directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct NutrackConfig {
    /// Folder holding `data/`. Unset means the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl NutrackConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(&config_path).map_err(NutrackError::io(IoOp::Read, &config_path))?;
        let config: NutrackConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(NutrackError::io(IoOp::Create, config_dir))?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, content).map_err(NutrackError::io(IoOp::Write, &config_path))?;
        Ok(())
    }

    /// Value of `key` for display; `None` for an unknown key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "data-dir" => Some(
                self.data_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            _ => None,
        }
    }

    /// Sets `key`. An empty value unsets it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data-dir" => {
                self.data_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
                Ok(())
            }
            _ => Err(NutrackError::Config(format!(
                "Unknown config key: {} (known keys: {})",
                key,
                KEYS.join(", ")
            ))),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "nutrack", "nutrack")
        .ok_or_else(|| NutrackError::Config("Could not determine home directory".to_string()))
}

/// Platform config directory, e.g. `~/.config/nutrack`.
pub fn default_config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// Platform data directory, e.g. `~/.local/share/nutrack`.
pub fn default_home_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}
