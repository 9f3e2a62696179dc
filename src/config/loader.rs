use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::AppConfig;

const CONFIG_DIR: &str = "ecoindex-dialog";
const CONFIG_FILE: &str = "config.toml";

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Load the user config, falling back to defaults when there is none.
pub fn load() -> color_eyre::Result<AppConfig> {
    let Some(path) = config_path() else {
        debug!("No config directory found, using defaults");
        return Ok(AppConfig::default());
    };
    load_from(&path)
}

pub fn load_from(path: &Path) -> color_eyre::Result<AppConfig> {
    if !path.exists() {
        debug!(?path, "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config = parse(&content)?;
    debug!(?path, "Loaded config");
    Ok(config)
}

pub fn parse(content: &str) -> color_eyre::Result<AppConfig> {
    let config: AppConfig = toml::from_str(content)?;
    config.analysis.validate()?;
    Ok(config)
}
