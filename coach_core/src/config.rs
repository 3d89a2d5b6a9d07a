//! Configuration file support for the coaching engine.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/coach/config.toml`.
//! Every field has a default, so a partial file (or none at all) is fine.

use crate::{Error, Reps, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub pain: PainConfig,

    #[serde(default)]
    pub autoregulation: AutoregulationConfig,

    #[serde(default)]
    pub program: ProgramConfig,
}

/// Pain ladder and severe-pain thresholds
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PainConfig {
    /// Reports at or above this level step the ladder
    #[serde(default = "default_ladder_threshold")]
    pub ladder_threshold: u8,

    #[serde(default = "default_load_reduction_percent")]
    pub load_reduction_percent: u32,

    #[serde(default = "default_rep_reduction_percent")]
    pub rep_reduction_percent: u32,

    /// Suspensions in one session before screening is required
    #[serde(default = "default_suspensions_for_screening")]
    pub suspensions_for_screening: u32,

    #[serde(default = "default_moderate_threshold")]
    pub moderate_threshold: u8,

    #[serde(default = "default_strong_warning_threshold")]
    pub strong_warning_threshold: u8,

    /// Reports at or above this level force a block
    #[serde(default = "default_hard_block_threshold")]
    pub hard_block_threshold: u8,
}

impl Default for PainConfig {
    fn default() -> Self {
        Self {
            ladder_threshold: default_ladder_threshold(),
            load_reduction_percent: default_load_reduction_percent(),
            rep_reduction_percent: default_rep_reduction_percent(),
            suspensions_for_screening: default_suspensions_for_screening(),
            moderate_threshold: default_moderate_threshold(),
            strong_warning_threshold: default_strong_warning_threshold(),
            hard_block_threshold: default_hard_block_threshold(),
        }
    }
}

/// Autoregulation parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AutoregulationConfig {
    /// Load cut applied when a decrease has no easier variant to move to
    #[serde(default = "default_autoreg_load_reduction_percent")]
    pub load_reduction_percent: u32,
}

impl Default for AutoregulationConfig {
    fn default() -> Self {
        Self {
            load_reduction_percent: default_autoreg_load_reduction_percent(),
        }
    }
}

/// Fallback prescription for slots the selector cannot fill
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgramConfig {
    #[serde(default = "default_fallback_sets")]
    pub fallback_sets: u32,

    #[serde(default = "default_fallback_reps")]
    pub fallback_reps: Reps,

    #[serde(default = "default_fallback_rest_seconds")]
    pub fallback_rest_seconds: u32,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            fallback_sets: default_fallback_sets(),
            fallback_reps: default_fallback_reps(),
            fallback_rest_seconds: default_fallback_rest_seconds(),
        }
    }
}

// Default value functions
fn default_ladder_threshold() -> u8 {
    5
}

fn default_load_reduction_percent() -> u32 {
    20
}

fn default_rep_reduction_percent() -> u32 {
    30
}

fn default_suspensions_for_screening() -> u32 {
    2
}

fn default_moderate_threshold() -> u8 {
    4
}

fn default_strong_warning_threshold() -> u8 {
    7
}

fn default_hard_block_threshold() -> u8 {
    8
}

fn default_autoreg_load_reduction_percent() -> u32 {
    10
}

fn default_fallback_sets() -> u32 {
    3
}

fn default_fallback_reps() -> Reps {
    Reps::Range(8, 12)
}

fn default_fallback_rest_seconds() -> u32 {
    90
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("coach")
            .join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject thresholds that would make the engines incoherent
    pub fn validate(&self) -> Result<()> {
        let pain = &self.pain;
        let mut errors = Vec::new();

        if !(pain.moderate_threshold < pain.strong_warning_threshold
            && pain.strong_warning_threshold < pain.hard_block_threshold)
        {
            errors.push(format!(
                "pain thresholds must increase: moderate {} < strong {} < block {}",
                pain.moderate_threshold, pain.strong_warning_threshold, pain.hard_block_threshold
            ));
        }
        if pain.hard_block_threshold > 10 {
            errors.push(format!(
                "hard_block_threshold {} is above the 0-10 scale",
                pain.hard_block_threshold
            ));
        }
        if pain.ladder_threshold == 0 || pain.ladder_threshold > pain.hard_block_threshold {
            errors.push(format!(
                "ladder_threshold {} must be in 1..={}",
                pain.ladder_threshold, pain.hard_block_threshold
            ));
        }
        if pain.suspensions_for_screening == 0 {
            errors.push("suspensions_for_screening must be at least 1".to_string());
        }

        for (name, value) in [
            ("pain.load_reduction_percent", pain.load_reduction_percent),
            ("pain.rep_reduction_percent", pain.rep_reduction_percent),
            (
                "autoregulation.load_reduction_percent",
                self.autoregulation.load_reduction_percent,
            ),
        ] {
            if !(1..=90).contains(&value) {
                errors.push(format!("{} {} must be in 1..=90", name, value));
            }
        }

        if self.program.fallback_sets == 0 {
            errors.push("program.fallback_sets must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(errors.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pain.ladder_threshold, 5);
        assert_eq!(config.pain.load_reduction_percent, 20);
        assert_eq!(config.pain.rep_reduction_percent, 30);
        assert_eq!(config.pain.hard_block_threshold, 8);
        assert_eq!(config.autoregulation.load_reduction_percent, 10);
        assert_eq!(config.program.fallback_reps, Reps::Range(8, 12));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[pain]
hard_block_threshold = 9

[program]
fallback_reps = "10-15"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.pain.hard_block_threshold, 9);
        assert_eq!(config.pain.strong_warning_threshold, 7); // default
        assert_eq!(config.program.fallback_reps, Reps::Range(10, 15));
        assert_eq!(config.program.fallback_sets, 3);
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let mut config = Config::default();
        config.pain.hard_block_threshold = 7;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.pain.rep_reduction_percent = 95;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("rep_reduction_percent"));
    }

    #[test]
    fn test_save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.autoregulation.load_reduction_percent = 15;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.autoregulation.load_reduction_percent, 15);
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pain]\nsuspensions_for_screening = 0\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
