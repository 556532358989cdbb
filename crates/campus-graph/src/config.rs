//! Engine and project configuration.
//!
//! Configuration lives in a JSON file (`.campus/config.json` by default).
//! Every field has a default, so a partial file is fine.

use campus_core::{CanvasTransform, ConfigError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What to do with a pathway whose endpoints do not resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Reject the whole dataset.
    #[default]
    Strict,

    /// Drop the pathway and record it in the load report.
    Lenient,
}

impl std::fmt::Display for EdgePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgePolicy::Strict => write!(f, "strict"),
            EdgePolicy::Lenient => write!(f, "lenient"),
        }
    }
}

impl std::str::FromStr for EdgePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(EdgePolicy::Strict),
            "lenient" => Ok(EdgePolicy::Lenient),
            other => Err(format!("unknown edge policy: {}", other)),
        }
    }
}

/// Settings for loading and routing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Walking time per map unit, in minutes.
    pub minutes_per_unit: f64,

    /// Handling of pathways with dangling endpoints.
    pub edge_policy: EdgePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            minutes_per_unit: 0.1,
            edge_policy: EdgePolicy::Strict,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.minutes_per_unit.is_finite() || self.minutes_per_unit <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "minutesPerUnit must be a positive number, got {}",
                self.minutes_per_unit
            )));
        }
        Ok(())
    }
}

/// The project configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CampusConfig {
    pub version: String,

    /// Dataset location, relative paths resolve against the working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,

    pub engine: EngineConfig,

    pub canvas: CanvasTransform,
}

impl Default for CampusConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            dataset: Some(PathBuf::from("data/pathways.json")),
            engine: EngineConfig::default(),
            canvas: CanvasTransform::default(),
        }
    }
}

impl CampusConfig {
    /// Reads and validates a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: CampusConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;

        let t = &self.canvas;
        let values = [t.scale_x, t.scale_y, t.offset_x, t.offset_y];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid(
                "canvas transform values must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = CampusConfig::default();
        assert_eq!(config.engine.edge_policy, EdgePolicy::Strict);
        assert!((config.engine.minutes_per_unit - 0.1).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file() {
        let config: CampusConfig =
            serde_json::from_str(r#"{"engine": {"edgePolicy": "lenient"}}"#).unwrap();
        assert_eq!(config.engine.edge_policy, EdgePolicy::Lenient);
        assert!((config.engine.minutes_per_unit - 0.1).abs() < 1e-12);
        assert_eq!(config.canvas, CanvasTransform::default());
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let engine = EngineConfig {
                minutes_per_unit: bad,
                ..EngineConfig::default()
            };
            assert!(engine.validate().is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_save_load_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".campus").join("config.json");

        let mut config = CampusConfig::default();
        config.engine.minutes_per_unit = 0.25;
        config.save(&path).unwrap();

        let loaded = CampusConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"engine": {"minutesPerUnit": -2}}"#).unwrap();

        assert!(matches!(
            CampusConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));
    }
}
