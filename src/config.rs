use crate::error::{GrowOpsError, Result};
use crate::logic::automation::light::DEFAULT_LIGHT_START_HOUR;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "GROWOPS_DATA_DIR";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub grow: GrowConfig,
    #[serde(default)]
    pub automation: AutomationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GrowConfig {
    #[serde(default = "default_grow_name")]
    pub name: String,
}

impl Default for GrowConfig {
    fn default() -> Self {
        Self {
            name: default_grow_name(),
        }
    }
}

fn default_grow_name() -> String {
    "Main Grow".into()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AutomationConfig {
    /// Local hour the photoperiod starts
    #[serde(default = "default_light_start_hour")]
    pub light_start_hour: u32,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            light_start_hour: default_light_start_hour(),
        }
    }
}

fn default_light_start_hour() -> u32 {
    DEFAULT_LIGHT_START_HOUR
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load config from an explicit path, or from the first standard
    /// location that exists. Without any config file the defaults apply.
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) if !p.exists() => {
                return Err(GrowOpsError::Config(format!(
                    "Config file not found at {:?}",
                    p
                )));
            }
            Some(p) => p.clone(),
            None => match Self::find_config_path() {
                Some(p) => p,
                None => {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        tracing::debug!(path = %config_path.display(), "Loading config");
        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| GrowOpsError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    /// Parse YAML after `${VAR}` substitution from the process environment.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = substitute_env_vars(content, |name| std::env::var(name).ok())?;

        // An empty file deserializes to unit, not a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| GrowOpsError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.automation.light_start_hour > 23 {
            return Err(GrowOpsError::Config(format!(
                "automation.light_start_hour must be 0-23, got {}",
                self.automation.light_start_hour
            )));
        }
        Ok(())
    }

    /// `config/config.yaml` in the working directory, then the XDG config dir.
    fn find_config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("growops").join("config.yaml"))
            .filter(|p| p.exists())
    }

    /// Resolve the data directory: CLI flag, then `GROWOPS_DATA_DIR`, then
    /// `storage.data_dir`, then the XDG data dir. The directory is created.
    pub fn data_dir(&self, data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        let dir = if let Some(dir) = data_dir_override {
            dir.clone()
        } else if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(dir)
        } else if let Some(dir) = &self.storage.data_dir {
            dir.clone()
        } else {
            dirs::data_dir()
                .ok_or_else(|| GrowOpsError::Config("Cannot determine data directory".into()))?
                .join("growops")
        };

        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn db_path(&self, data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(self.data_dir(data_dir_override)?.join("growops.db"))
    }
}

/// Replace every `${VAR_NAME}` whose variable is set. Unset variables are
/// left in place so the YAML error points at them.
fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| GrowOpsError::Config(format!("Invalid substitution pattern: {}", e)))?;

    let mut result = content.to_string();
    for cap in re.captures_iter(content) {
        if let Some(value) = lookup(&cap[1]) {
            result = result.replace(&cap[0], &value);
        }
    }
    Ok(result)
}
