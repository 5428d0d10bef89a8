use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::value_table::ModelFormat;

/// Shape of the board; passed explicitly to every `GameState` and `Game`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig { board_size: 3 }
    }
}

/// Hyperparameters of a value-table agent, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub learning_rate: f64,
    pub exploration_prob: f64,
    pub discount_factor: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            learning_rate: 0.2,
            exploration_prob: 0.0,
            discount_factor: 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub episodes: usize,
    /// Log progress every this many episodes.
    pub log_interval: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            episodes: 50_000,
            log_interval: 5_000,
        }
    }
}

/// Where trained value tables are written and read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub model_dir: PathBuf,
    pub format: ModelFormat,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            model_dir: PathBuf::from("."),
            format: ModelFormat::Json,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub agent: AgentConfig,
    pub training: TrainingConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.board_size == 0 {
            return Err(ConfigError::Validation(
                "game.board_size must be > 0".into(),
            ));
        }
        self.agent.validate()?;
        if self.training.log_interval == 0 {
            return Err(ConfigError::Validation(
                "training.log_interval must be > 0".into(),
            ));
        }
        Ok(())
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(ConfigError::Validation(
                "agent.learning_rate must be in (0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.exploration_prob) {
            return Err(ConfigError::Validation(
                "agent.exploration_prob must be in [0, 1]".into(),
            ));
        }
        if !(self.discount_factor > 0.0 && self.discount_factor <= 1.0) {
            return Err(ConfigError::Validation(
                "agent.discount_factor must be in (0, 1]".into(),
            ));
        }
        Ok(())
    }
}
