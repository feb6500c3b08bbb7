mod types;

pub use types::*;

use crate::Result;
use std::{env, path::Path};
use tracing::{debug, warn};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Loads the configuration file named by `CONFIG_PATH` (default
/// `config.yaml`) and applies environment overrides.
pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    let config = load_from_path(&config_path).await?;

    Ok(config.with_api_key_override(env::var(API_KEY_ENV).ok()))
}

/// Reads a YAML config file. A missing file yields the defaults.
pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();

    if !tokio::fs::try_exists(path).await? {
        warn!(
            "Configuration file {} not found, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

impl Config {
    /// Replaces the realtime API key when a non-empty override is given.
    pub fn with_api_key_override(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|key| !key.trim().is_empty()) {
            self.realtime.api_key = Some(key);
        }
        self
    }
}
