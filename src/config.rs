use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::api::ClientOptions;

/// Configuration keys enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Host,
    TimeoutSecs,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::Host => "host",
            ConfigKey::TimeoutSecs => "timeout_secs",
        }
    }

    /// Get all config keys
    pub fn all() -> &'static [ConfigKey] {
        &[ConfigKey::Host, ConfigKey::TimeoutSecs]
    }
}

/// Filename for the project-specific configuration within the .weeklog directory.
pub const PROJECT_CONFIG_FILENAME: &str = "config.json";
/// Directory name for project-specific configuration.
pub const PROJECT_CONFIG_DIR: &str = ".weeklog";

/// Parses a JSON configuration file content into a map of configuration values.
///
/// Expects `content` to be a JSON object with configuration keys
/// (e.g., {"host": "https://ghe.example.com/api/v3", "timeout_secs": 30}).
///
/// - Returns `Ok(HashMap<ConfigKey, Value>)` containing the known keys; unknown keys are skipped.
/// - Returns an empty HashMap if the input `content` is empty or contains only whitespace.
/// - Returns an `Err` if the JSON parsing fails or the top level is not an object.
pub fn parse_config(content: &[u8]) -> Result<HashMap<ConfigKey, Value>> {
    if content.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(HashMap::new());
    }

    let value: Value = serde_json::from_slice(content).context("Failed to parse config JSON")?;

    if let Value::Object(map) = &value {
        let config_map = ConfigKey::all()
            .iter()
            .filter_map(|key| map.get(key.as_str()).map(|val| (*key, val.clone())))
            .collect();
        return Ok(config_map);
    }

    Err(anyhow::anyhow!("Config must be a JSON object"))
}

/// Reads `<dir>/.weeklog/config.json`. A missing file is an empty config.
pub fn load_project_config(dir: &Path) -> Result<HashMap<ConfigKey, Value>> {
    let path = dir.join(PROJECT_CONFIG_DIR).join(PROJECT_CONFIG_FILENAME);
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = std::fs::read(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Merges `updates` into `base_config` and returns a new configuration map.
///
/// - Keys from `updates` are added to a clone of `base_config`.
/// - If a key exists in both, the value from `updates` overwrites the value in the cloned `base_config`.
pub fn update_config(
    base_config: &HashMap<ConfigKey, Value>,
    updates: &HashMap<ConfigKey, Value>,
) -> HashMap<ConfigKey, Value> {
    let mut new_config = base_config.clone();
    for (key, value) in updates {
        new_config.insert(*key, value.clone());
    }
    new_config
}

/// Layers the project config in `cwd` over the user config in `home`.
///
/// Both live at `<dir>/.weeklog/config.json`; project keys win.
pub fn load_config(home: Option<&Path>, cwd: &Path) -> Result<HashMap<ConfigKey, Value>> {
    let user_config = match home {
        Some(home) if home != cwd => load_project_config(home)?,
        _ => HashMap::new(),
    };
    let project_config = load_project_config(cwd)?;
    Ok(update_config(&user_config, &project_config))
}

/// Builds transport options from a parsed config and an optional token.
///
/// Keys that are absent fall back to `ClientOptions::default()`.
pub fn client_options(
    config: &HashMap<ConfigKey, Value>,
    auth_token: Option<String>,
) -> Result<ClientOptions> {
    let mut opts = ClientOptions {
        auth_token,
        ..Default::default()
    };

    if let Some(host) = config.get(&ConfigKey::Host) {
        opts.host = host
            .as_str()
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("`host` must be a non-empty string"))?
            .to_string();
    }
    if let Some(timeout) = config.get(&ConfigKey::TimeoutSecs) {
        let secs = timeout
            .as_u64()
            .filter(|s| *s > 0)
            .ok_or_else(|| anyhow::anyhow!("`timeout_secs` must be a positive integer"))?;
        opts.timeout = Some(Duration::from_secs(secs));
    }
    Ok(opts)
}
