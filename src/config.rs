use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::DEFAULT_CONFIG_PATH;
use crate::error::{Result, TrackerError};
use crate::pipeline::PipelineConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the rotated JSON log files
    pub directory: String,
    pub file_name: String,
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            file_name: "tracker.log".to_string(),
            default_filter: "rejected_article_tracker=info,warn".to_string(),
        }
    }
}

impl Config {
    /// Load `tracker.toml` from the working directory, or defaults when it
    /// does not exist.
    pub fn load() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config_path = path.as_ref();
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            TrackerError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.pipeline.draft_sentinel.is_empty() {
            return Err(TrackerError::Config("pipeline.draft_sentinel must not be empty".to_string()));
        }
        if self.pipeline.accept_decision.is_empty() {
            return Err(TrackerError::Config("pipeline.accept_decision must not be empty".to_string()));
        }
        Ok(())
    }
}
