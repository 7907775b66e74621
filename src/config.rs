//! Simulation configuration.
//!
//! `SimulationConfig` collects every tunable constant of the engine: the
//! logistic activation parameters, the learning-rule rates, the respondent
//! activity threshold, the weight given to freshly formed connections, and
//! the update strategy. It is serde-serializable so a host can keep
//! experiment settings next to its other data.
//!
//! # Example
//!
//! ```
//! use selnet::{SimulationConfig, UpdaterConfig};
//!
//! let json = r#"{ "updater": { "kind": "randomized", "seed": 7 } }"#;
//! let config = SimulationConfig::from_json(json).unwrap();
//! assert_eq!(config.updater, UpdaterConfig::Randomized { seed: Some(7) });
//! assert_eq!(config.learning.alpha, 0.5);
//! ```

use crate::error::{Result, SelnetError};
use crate::learning::{LearningRule, SelectionRule};
use crate::logistic::Logistic;
use crate::updater::{NaturalUpdater, RandomizedUpdater, Updater};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Learning-rule settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Acquisition rate (applied when the discrepancy exceeds the threshold)
    pub alpha: f64,
    /// Decay rate (applied otherwise)
    pub beta: f64,
    /// Discrepancy above which weights grow
    pub discrepancy_threshold: f64,
    /// Weight restored by `unlearn()`
    pub min_weight: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 0.1,
            discrepancy_threshold: 0.001,
            min_weight: 0.01,
        }
    }
}

/// Which update strategy drives a timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum UpdaterConfig {
    /// Synchronous prepare-all then commit-all
    #[default]
    Natural,
    /// Fresh random order each timestep, prepare+commit per neuron
    Randomized {
        /// RNG seed; `None` seeds from system entropy
        seed: Option<u64>,
    },
}

impl UpdaterConfig {
    /// Build the configured updater.
    pub fn build(&self) -> Box<dyn Updater> {
        match *self {
            UpdaterConfig::Natural => Box::new(NaturalUpdater::new()),
            UpdaterConfig::Randomized { seed: Some(seed) } => {
                Box::new(RandomizedUpdater::new(seed))
            }
            UpdaterConfig::Randomized { seed: None } => Box::new(RandomizedUpdater::from_entropy()),
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Activation squashing function
    pub logistic: Logistic,
    /// Learning-rule rates
    pub learning: LearningConfig,
    /// Presynaptic activation above which a respondent input counts as active
    pub respondent_threshold: f64,
    /// Weight given to newly formed operant connections
    pub initial_weight: f64,
    /// Whether `Network::update()` learns after each timestep
    pub learning_enabled: bool,
    /// Update strategy
    pub updater: UpdaterConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            logistic: Logistic::default(),
            learning: LearningConfig::default(),
            respondent_threshold: 0.5,
            initial_weight: 0.01,
            learning_enabled: true,
            updater: UpdaterConfig::Natural,
        }
    }
}

impl SimulationConfig {
    /// Check every parameter.
    pub fn validate(&self) -> Result<()> {
        self.logistic.validate()?;

        let learning = &self.learning;
        for (name, value) in [("alpha", learning.alpha), ("beta", learning.beta)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SelnetError::InvalidParameter(format!(
                    "learning.{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !learning.discrepancy_threshold.is_finite() {
            return Err(SelnetError::InvalidParameter(
                "learning.discrepancy_threshold must be finite".into(),
            ));
        }
        for (name, value) in [
            ("learning.min_weight", learning.min_weight),
            ("respondent_threshold", self.respondent_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SelnetError::InvalidParameter(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.initial_weight) {
            return Err(SelnetError::WeightOutOfRange {
                value: self.initial_weight,
            });
        }
        Ok(())
    }

    /// Learning rule described by this configuration.
    pub fn learning_rule(&self) -> Box<dyn LearningRule> {
        Box::new(SelectionRule::from(&self.learning))
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON and validate.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Write to a JSON file.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read and validate a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        tracing::debug!(target: "selnet", path = %path.display(), "loaded simulation config");
        Ok(config)
    }
}
