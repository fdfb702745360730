//! Run configuration.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use stringfrag_algorithms::ClassifierConfig;
use stringfrag_core::{Error as CoreError, SeedString};

/// Settings for one generation run.
///
/// JSON layout, all keys optional:
///
/// ```json
/// { "events": 10, "seed": { "quark_id": 1, "energy": 5.0, "status": 23 }, "string_energy": null }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of events to request from the engine.
    pub events: usize,
    /// Partons injected before hadronization.
    pub seed: SeedString,
    /// Overrides the string energy derived from `seed`.
    pub string_energy: Option<f64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            events: 10,
            seed: SeedString::default(),
            string_energy: None,
        }
    }
}

impl RunConfig {
    /// Load configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the number of events.
    #[must_use]
    pub fn with_events(mut self, events: usize) -> Self {
        self.events = events;
        self
    }

    /// Set the per-parton seed energy.
    #[must_use]
    pub fn with_seed_energy(mut self, energy: f64) -> Self {
        self.seed.energy = energy;
        self
    }

    /// Set an explicit string energy.
    #[must_use]
    pub fn with_string_energy(mut self, energy: f64) -> Self {
        self.string_energy = Some(energy);
        self
    }

    /// Checks event count, seed and string energy.
    pub fn validate(&self) -> std::result::Result<(), CoreError> {
        if self.events == 0 {
            return Err(CoreError::ConfigError(
                "events must be at least 1".to_string(),
            ));
        }
        self.seed.validate()?;
        if let Some(energy) = self.string_energy {
            if !energy.is_finite() || energy <= 0.0 {
                return Err(CoreError::ConfigError(format!(
                    "string energy must be positive and finite, got {energy}"
                )));
            }
        }
        Ok(())
    }

    /// String energy used for momentum fractions.
    #[must_use]
    pub fn string_energy(&self) -> f64 {
        self.string_energy
            .unwrap_or_else(|| self.seed.string_energy())
    }

    /// Classifier configuration for this run.
    #[must_use]
    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig::from_seed(&self.seed).with_string_energy(self.string_energy())
    }
}
