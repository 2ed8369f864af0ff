//! Runtime configuration.
//!
//! The story lifetime is not configurable; see `STORY_TTL`.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CircleConfig {
    pub reaper: ReaperConfig,
    pub feed: FeedConfig,
}

/// Background purge of expired stories. Visibility never depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaperConfig {
    pub enabled: bool,
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Truncate the feed after sorting. `None` keeps every visible story.
    pub max_items: Option<usize>,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 300,
        }
    }
}

impl ReaperConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl CircleConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: CircleConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reaper.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "reaper.interval_secs must be greater than zero".into(),
            ));
        }
        if self.feed.max_items == Some(0) {
            return Err(ConfigError::Invalid("feed.max_items must be at least 1".into()));
        }
        Ok(())
    }
}
