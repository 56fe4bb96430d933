//! Main BhittiConfig and loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigLoadError;
use super::service::ServiceSection;
use crate::engine::TrackerConfig;
use crate::sensors::FitterConfig;
use crate::sim::SimulationConfig;

/// Default config location, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "configs/bhitti-sense.toml";

/// Full BhittiSense configuration loaded from TOML
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BhittiConfig {
    /// Grid, thresholds and identity matching
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Built-in plane fit primitive
    #[serde(default)]
    pub fitter: FitterConfig,

    /// Threading and display settings
    #[serde(default)]
    pub service: ServiceSection,

    /// Simulated device
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl BhittiConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigLoadError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Load from the default config path, or defaults if it doesn't exist
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigLoadError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String, ConfigLoadError> {
        toml::to_string_pretty(self).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let sections = [
            ("tracker", self.tracker.validate()),
            ("fitter", self.fitter.validate()),
            ("service", self.service.validate()),
            ("simulation", self.simulation.validate()),
        ];
        for (name, result) in sections {
            result.map_err(|msg| ConfigLoadError::Invalid(format!("[{}] {}", name, msg)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DisplayRotation;
    use crate::engine::OffsetCheck;

    #[test]
    fn test_default_config() {
        let config = BhittiConfig::default();
        assert_eq!(config.tracker.grid_size(), 49);
        assert_eq!(config.tracker.inlier_epsilon, 0.001);
        assert_eq!(config.service.idle_poll_ms, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(
            BhittiConfig::from_toml("").unwrap(),
            BhittiConfig::default()
        );
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = BhittiConfig::default();
        config.tracker = TrackerConfig::interactive();
        config.service.display_rotation = DisplayRotation::Rotation270;
        let text = config.to_toml().unwrap();
        assert_eq!(BhittiConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_sections() {
        let config = BhittiConfig::from_toml(
            r#"
            [tracker]
            verticality_threshold = 0.04
            offset_check = "offset_d"

            [service]
            display_rotation = 90
            "#,
        )
        .unwrap();
        assert_eq!(config.tracker.verticality_threshold, 0.04);
        assert_eq!(config.tracker.offset_check, OffsetCheck::OffsetD);
        assert_eq!(config.service.display_rotation, DisplayRotation::Rotation90);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            BhittiConfig::from_toml("[tracker\n"),
            Err(ConfigLoadError::Parse(_))
        ));
        assert!(matches!(
            BhittiConfig::from_toml("[service]\ndisplay_rotation = 45\n"),
            Err(ConfigLoadError::Parse(_))
        ));
        match BhittiConfig::from_toml("[tracker]\ninlier_epsilon = -1.0\n") {
            Err(ConfigLoadError::Invalid(msg)) => assert!(msg.starts_with("[tracker]")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            BhittiConfig::load(Path::new("/nonexistent/bhitti.toml")),
            Err(ConfigLoadError::Io(_))
        ));
    }
}
