//! Target allocation specification (target.json) loading and validation.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::warn;
use serde::Deserialize;
use yajirobe::{AllocationTarget, AssetClass};

use crate::error::{Error, Result};

/// Slack allowed when checking that ratios sum to at most 1.
const SUM_TOLERANCE: f64 = 1e-9;

/// A target allocation: one ratio per asset class.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetSpec {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub targets: Vec<TargetRatio>,
}

/// A single class target.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetRatio {
    pub class: AssetClass,
    pub ratio: f64,
}

impl TargetSpec {
    /// Load and validate a target.json file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::TargetRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&contents)
    }

    /// Parse from a JSON string (useful for testing).
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: TargetSpec = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Validate the target specification.
    ///
    /// Ratios may sum to less than 1: classes left without a target are
    /// never treated as underweight. That is accepted, but logged.
    fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(Error::Target("targets list is empty".into()));
        }

        let mut seen = HashSet::new();
        for t in &self.targets {
            if !seen.insert(t.class) {
                return Err(Error::Target(format!("duplicate class: {}", t.class.id())));
            }
        }

        for t in &self.targets {
            if !t.ratio.is_finite() || !(0.0..=1.0).contains(&t.ratio) {
                return Err(Error::Target(format!(
                    "ratio for {} ({}) must be in [0, 1]",
                    t.class.id(),
                    t.ratio
                )));
            }
        }

        let sum = self.ratio_sum();
        if sum > 1.0 + SUM_TOLERANCE {
            return Err(Error::Target(format!("ratios sum to {sum:.4} (> 1.0)")));
        }
        if sum < 1.0 - SUM_TOLERANCE {
            warn!(
                "target ratios sum to {sum:.4}; untargeted classes will never receive contributions"
            );
        }

        Ok(())
    }

    /// Sum of all ratios.
    pub fn ratio_sum(&self) -> f64 {
        self.targets.iter().map(|t| t.ratio).sum()
    }

    /// The ratio map handed to the aggregator.
    pub fn as_allocation_target(&self) -> AllocationTarget {
        self.targets.iter().map(|t| (t.class, t.ratio)).collect()
    }
}
