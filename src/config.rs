//! Run configuration.
//!
//! Every field has a default matching the cohort study the pipeline was written for, so an
//! empty JSON object is a valid configuration:
//!
//! ```json
//! {
//!   "target_column": "CDCOMMUN",
//!   "target_policy": "merge_top_two",
//!   "degenerate_range": "zero",
//!   "imputer": { "seed": 0, "max_iter": 1, "n_nearest_features": 350 }
//! }
//! ```

use crate::error::{PrepError, Result, ResultExt as _};
use crate::prep::{DegenerateRangePolicy, ImputerConfig, TargetMergePolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TARGET_COLUMN: &str = "CDCOMMUN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// Column holding the ordinal class labels.
    pub target_column: String,
    pub target_policy: TargetMergePolicy,
    pub degenerate_range: DegenerateRangePolicy,
    pub imputer: ImputerConfig,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            target_column: DEFAULT_TARGET_COLUMN.to_owned(),
            target_policy: TargetMergePolicy::default(),
            degenerate_range: DegenerateRangePolicy::default(),
            imputer: ImputerConfig::default(),
        }
    }
}

impl PrepConfig {
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_column = target.into();
        self
    }

    /// Load a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or fails [`Self::validate`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Parse a configuration from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON or invalid values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// Returns a configuration error for an empty target name or invalid imputer settings.
    pub fn validate(&self) -> Result<()> {
        if self.target_column.trim().is_empty() {
            return Err(PrepError::Configuration(
                "target_column must not be empty".to_owned(),
            ));
        }
        self.imputer.validate()
    }
}
