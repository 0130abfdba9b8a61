use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use textdelta_engine::{CleanupPolicy, DiffConfig, DiffEngine, Validation};
use thiserror::Error;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "TEXTDELTA_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub diff: DiffSettings,
    pub patch: PatchSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffSettings {
    pub cleanup: CleanupPolicy,
    /// Cost of an edit in characters, used by efficiency cleanup.
    pub edit_cost: usize,
    /// Time limit for a single diff; 0 disables it.
    pub timeout_ms: u64,
}

impl Default for DiffSettings {
    fn default() -> Self {
        let defaults = DiffConfig::default();
        Self {
            cleanup: CleanupPolicy::default(),
            edit_cost: defaults.edit_cost,
            timeout_ms: defaults
                .timeout
                .map_or(0, |timeout| timeout.as_millis() as u64),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchSettings {
    /// Compare removed spans against the source before skipping them.
    pub validate: bool,
}

impl Default for PatchSettings {
    fn default() -> Self {
        Self { validate: true }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    /// `$TEXTDELTA_CONFIG` if set, otherwise `~/.config/textdelta/config.toml`.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            return Self::expand_path(&path).unwrap_or(path);
        }
        let config_dir = shellexpand::tilde("~/.config/textdelta");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn diff_engine(&self) -> DiffEngine {
        let timeout = match self.diff.timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        DiffEngine::new(DiffConfig {
            edit_cost: self.diff.edit_cost,
            timeout,
        })
    }

    pub fn validation(&self) -> Validation {
        if self.patch.validate {
            Validation::Strict
        } else {
            Validation::Lenient
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
