//! Pipeline configuration: which files feed the run.
//!
//! One canonical pipeline parameterized by its source-file set, instead of a
//! copy of the cleansing logic per dataset.

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Paths of the three source tables and the postal-code gazetteer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub crashes_path: String,
    pub vehicles_path: String,
    pub persons_path: String,
    pub gazetteer_path: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            crashes_path: "data/Motor_Vehicle_Collisions_-_Crashes.csv".to_string(),
            vehicles_path: "data/Motor_Vehicle_Collisions_-_Vehicles.csv".to_string(),
            persons_path: "data/Motor_Vehicle_Collisions_-_Person.csv".to_string(),
            gazetteer_path: "data/us_postal_codes.csv".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load from a JSON file; omitted fields fall back to the defaults.
    pub fn from_json_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
