use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{problem::Fleet, Stage};

/// Errors raised when a configuration cannot drive a run.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{stage:?} requires capability {capability:?}, which has no units in the registry")]
    MissingCapability {
        stage: Stage,
        capability: crate::Capability,
    },
    #[error("unit {unit} is registered under more than one capability class")]
    DuplicateUnit { unit: crate::UnitId },
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} range is inverted ({lo} > {hi})")]
    InvertedRange { field: &'static str, lo: f64, hi: f64 },
    #[error("objective weights must not all be zero")]
    ZeroWeights,
    #[error("failed to read config {path}: {reason}")]
    Load { path: String, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScenarioConfig {
    pub map_size: u32,
    pub num_targets: u32,
    pub num_risk_zones: u32,
    /// Inclusive, whole kilometres.
    pub risk_radius_range: (u32, u32),
    /// Storm centers are drawn from `[margin * map_size, (1 - margin) * map_size]`.
    pub risk_center_margin: f32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            map_size: 100,
            num_targets: 5,
            num_risk_zones: 3,
            risk_radius_range: (10, 20),
            risk_center_margin: 0.2,
        }
    }
}

impl ScenarioConfig {
    pub fn risk_center_range(&self) -> (u32, u32) {
        let lo = (self.map_size as f32 * self.risk_center_margin).round() as u32;
        let hi = (self.map_size as f32 * (1.0 - self.risk_center_margin)).round() as u32;
        (lo, hi)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Weights {
    pub distance: f32,
    pub time: f32,
    pub risk: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            distance: 0.5,
            time: 0.3,
            risk: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LearningConfig {
    pub alpha: f32,
    pub gamma: f32,
    pub epsilon: f32,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            gamma: 0.9,
            epsilon: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub iterations: usize,
    /// Half-open range `[lo, hi)` for sampled step costs.
    pub cost_range: (f32, f32),
    pub progress_interval: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: 3000,
            cost_range: (10.0, 50.0),
            progress_interval: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub scenario: ScenarioConfig,
    pub fleet: Fleet,
    pub weights: Weights,
    pub learning: LearningConfig,
    pub search: SearchConfig,
    pub seed: Option<u64>,
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let load_err = |reason: String| ConfigError::Load {
            path: path.display().to_string(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let cfg: Config = serde_json::from_str(&content).map_err(|e| load_err(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_scenario()?;
        self.validate_fleet()?;
        self.validate_weights()?;
        self.validate_learning()?;
        self.validate_search()
    }

    fn validate_scenario(&self) -> Result<(), ConfigError> {
        let s = &self.scenario;
        positive("scenario.map_size", s.map_size as f64)?;
        positive("scenario.num_targets", s.num_targets as f64)?;
        let (lo, hi) = s.risk_radius_range;
        if s.num_risk_zones > 0 {
            positive("scenario.risk_radius_range", lo as f64)?;
        }
        ordered("scenario.risk_radius_range", lo as f64, hi as f64)?;
        within("scenario.risk_center_margin", 0.0, 0.5, s.risk_center_margin as f64)
    }

    fn validate_fleet(&self) -> Result<(), ConfigError> {
        for stage in Stage::ALL {
            if self.fleet.units_for(stage).is_empty() {
                return Err(ConfigError::MissingCapability {
                    stage,
                    capability: self.fleet.required_capability(stage),
                });
            }
        }
        let mut seen = BTreeSet::new();
        for unit in self.fleet.all_units() {
            if !seen.insert(unit) {
                return Err(ConfigError::DuplicateUnit { unit });
            }
        }
        Ok(())
    }

    fn validate_weights(&self) -> Result<(), ConfigError> {
        let w = &self.weights;
        for (field, value) in [
            ("weights.distance", w.distance),
            ("weights.time", w.time),
            ("weights.risk", w.risk),
        ] {
            within(field, 0.0, f64::MAX, value as f64)?;
        }
        if w.distance == 0.0 && w.time == 0.0 && w.risk == 0.0 {
            return Err(ConfigError::ZeroWeights);
        }
        Ok(())
    }

    fn validate_learning(&self) -> Result<(), ConfigError> {
        let l = &self.learning;
        positive("learning.alpha", l.alpha as f64)?;
        within("learning.alpha", 0.0, 1.0, l.alpha as f64)?;
        within("learning.gamma", 0.0, 1.0, l.gamma as f64)?;
        within("learning.epsilon", 0.0, 1.0, l.epsilon as f64)
    }

    fn validate_search(&self) -> Result<(), ConfigError> {
        let (lo, hi) = self.search.cost_range;
        positive("search.cost_range", lo as f64)?;
        within("search.cost_range", 0.0, f32::MAX as f64, hi as f64)?;
        ordered("search.cost_range", lo as f64, hi as f64)?;
        if lo == hi {
            return Err(ConfigError::InvertedRange {
                field: "search.cost_range",
                lo: lo as f64,
                hi: hi as f64,
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn within(field: &'static str, min: f64, max: f64, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            min,
            max,
            value,
        })
    }
}

fn ordered(field: &'static str, lo: f64, hi: f64) -> Result<(), ConfigError> {
    if lo <= hi {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange { field, lo, hi })
    }
}
