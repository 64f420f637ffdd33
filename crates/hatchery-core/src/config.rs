//! Loading tunable game configuration from JSON

use std::io::Read;

pub use hatchery_logic::config::GameConfig;

/// Errors that can occur while loading a config
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a JSON config. Missing fields keep their defaults.
pub fn load_config<R: Read>(mut reader: R) -> Result<GameConfig, ConfigError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let config: GameConfig = serde_json::from_str(&text)?;
    config.validate().map_err(ConfigError::Invalid)?;
    log::debug!(
        "Loaded config: {} egg types, {} habitats",
        config.catalog.eggs.len(),
        config.catalog.habitats.len()
    );
    Ok(config)
}
