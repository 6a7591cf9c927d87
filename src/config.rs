//! Program configuration: an optional JSON file plus command-line overrides

use anyhow::{Context, Result};
use pokertable_core::EngineConfig;
use pokertable_cv::DetectionConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub detection: DetectionConfig,
}

/// Values given on the command line take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub ttl_ms: Option<u64>,
    pub interval_ms: Option<u64>,
}

impl AppConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file at {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file at {}", path.display()))
    }

    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(data_dir) = overrides.data_dir {
            self.engine.data_dir = data_dir;
        }
        if let Some(ttl_ms) = overrides.ttl_ms {
            self.detection.ttl_ms = ttl_ms;
        }
        if let Some(interval_ms) = overrides.interval_ms {
            self.engine.poll_interval_ms = interval_ms;
        }
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.detection.ttl_ms > 0, "ttl_ms must be positive");
        anyhow::ensure!(self.engine.poll_interval_ms > 0, "poll interval must be positive");
        anyhow::ensure!(self.detection.hole_cards > 0, "hole_cards must be at least 1");
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.detection.occupancy.placeholder_confidence),
            "placeholder_confidence must lie in [0, 1]"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_then_overrides() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("pokertable.json");
        fs::write(
            &path,
            r#"{"engine": {"poll_interval_ms": 250}, "detection": {"ttl_ms": 3000, "hole_cards": 4}}"#,
        )?;

        let config = AppConfig::load(
            Some(&path),
            Overrides {
                ttl_ms: Some(6000),
                ..Overrides::default()
            },
        )?;

        assert_eq!(config.engine.poll_interval_ms, 250);
        assert_eq!(config.detection.ttl_ms, 6000);
        assert_eq!(config.detection.hole_cards, 4);
        assert_eq!(config.engine.data_dir, PathBuf::from("data"));
        Ok(())
    }

    #[test]
    fn rejects_zero_interval() {
        let overrides = Overrides {
            interval_ms: Some(0),
            ..Overrides::default()
        };
        assert!(AppConfig::load(None, overrides).is_err());
    }
}
