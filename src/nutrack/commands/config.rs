use crate::commands::{CmdMessage, CmdResult, NutrackPaths};
use crate::config::{NutrackConfig, KEYS};
use crate::error::{NutrackError, Result};

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    /// An empty value clears the key.
    Set(String, String),
}

fn unknown_key(key: &str) -> NutrackError {
    NutrackError::Config(format!(
        "Unknown config key: {} (known keys: {})",
        key,
        KEYS.join(", ")
    ))
}

/// Reads or updates `config.json` in the config folder. Unknown keys are
/// errors and leave the file untouched.
pub fn run(paths: &NutrackPaths, action: ConfigAction) -> Result<CmdResult> {
    let mut config = NutrackConfig::load(&paths.config)?;

    let (key, value) = match action {
        ConfigAction::ShowAll => return Ok(CmdResult::default().with_config(config)),
        ConfigAction::ShowKey(key) => {
            let value = config.get(&key).ok_or_else(|| unknown_key(&key))?;
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info(value));
            return Ok(result);
        }
        ConfigAction::Set(key, value) => (key, value),
    };

    config.set(&key, &value)?;
    config.save(&paths.config)?;

    let message = match config.get(&key) {
        Some(current) if !current.is_empty() => format!("{} set to {}", key, current),
        _ => format!("{} cleared", key),
    };
    let mut result = CmdResult::default().with_config(config);
    result.add_message(CmdMessage::success(message));
    Ok(result)
}
