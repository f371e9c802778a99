//! Engine constants and server settings
//!
//! Engine constants are fixed for the lifetime of the process. They default to
//! the calibrated values below and may be overridden by a JSON file named in
//! `PERSUADE_ENGINE_CONFIG`.

use crate::engine::Strategy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unsupported session variant: {0}")]
    UnsupportedVariant(String),
    #[error("Invalid engine setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
    #[error("Failed to read engine config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse engine config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Numeric constants driving the decision engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub initial_belief: f64,
    pub initial_trust: f64,
    /// Below this trust the session is in recovery mode
    pub trust_threshold: f64,
    /// Below this trust the guardrail ends the session
    pub trust_floor: f64,
    /// Belief learning rate
    pub alpha: f64,
    /// Trust erosion rate
    pub beta: f64,
    /// Trust recovery rate
    pub gamma: f64,
    pub hard_rejection_penalty: f64,
    pub soft_rejection_penalty: f64,
    pub min_strategy_weight: f64,
    pub max_turns: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_belief: 0.15,
            initial_trust: 0.9,
            trust_threshold: 0.5,
            trust_floor: 0.3,
            alpha: 0.35,
            beta: 0.4,
            gamma: 0.15,
            hard_rejection_penalty: 0.6,
            soft_rejection_penalty: 0.35,
            min_strategy_weight: 0.05,
            max_turns: 15,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, or the file named by `PERSUADE_ENGINE_CONFIG` when set
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var("PERSUADE_ENGINE_CONFIG") {
            Ok(path) if !path.is_empty() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = [
            ("initial_belief", self.initial_belief),
            ("initial_trust", self.initial_trust),
            ("trust_threshold", self.trust_threshold),
            ("trust_floor", self.trust_floor),
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
            ("hard_rejection_penalty", self.hard_rejection_penalty),
            ("soft_rejection_penalty", self.soft_rejection_penalty),
            ("min_strategy_weight", self.min_strategy_weight),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidSetting {
                    name,
                    reason: format!("{value} is outside [0, 1]"),
                });
            }
        }

        if self.trust_floor > self.trust_threshold {
            return Err(ConfigError::InvalidSetting {
                name: "trust_floor",
                reason: format!(
                    "{} must not exceed trust_threshold {}",
                    self.trust_floor, self.trust_threshold
                ),
            });
        }

        let floor_mass = self.min_strategy_weight * f64::from(Strategy::COUNT);
        if floor_mass > 1.0 {
            return Err(ConfigError::InvalidSetting {
                name: "min_strategy_weight",
                reason: format!("floor mass {floor_mass} across all strategies exceeds 1"),
            });
        }

        if self.max_turns == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "max_turns",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("PERSUADE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);
        Self { port }
    }
}
