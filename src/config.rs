use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "cut-release.toml";

/// Represents the complete configuration for cut-release.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub self_update: SelfUpdateConfig,
}

fn default_tag() -> String {
    "latest".to_string()
}

fn default_preid_choices() -> Vec<String> {
    vec!["rc".to_string(), "alpha".to_string(), "beta".to_string()]
}

/// Defaults for the release prompts and the version-bump command.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    /// Distribution tag used when none is given or prompted for
    #[serde(default = "default_tag")]
    pub default_tag: String,

    /// Choices offered by the prerelease identifier prompt
    #[serde(default = "default_preid_choices")]
    pub preid_choices: Vec<String>,

    /// Commit message template; `%s` is replaced with the version by npm
    #[serde(default)]
    pub message: Option<String>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            default_tag: default_tag(),
            preid_choices: default_preid_choices(),
            message: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_registry() -> String {
    "https://crates.io/api/v1/crates".to_string()
}

/// Controls the check for a newer cut-release before releasing.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SelfUpdateConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_registry")]
    pub registry: String,
}

impl Default for SelfUpdateConfig {
    fn default() -> Self {
        SelfUpdateConfig {
            enabled: default_true(),
            timeout_ms: default_timeout_ms(),
            registry: default_registry(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `cut-release.toml` in current directory
/// 3. `cut-release.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    if let Some(path) = config_path {
        return read_config(Path::new(path));
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return read_config(&local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user = config_dir.join(CONFIG_FILE_NAME);
        if user.exists() {
            return read_config(&user);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        ReleaseError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    let config = parse_config(&content)
        .map_err(|e| ReleaseError::config(format!("{}: {}", path.display(), e)))?;
    if config.release.default_tag.trim().is_empty() {
        return Err(ReleaseError::config(format!(
            "{}: release.default_tag must not be empty",
            path.display()
        )));
    }
    Ok(config)
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(content)
}
