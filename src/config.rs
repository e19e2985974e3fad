//! Configuration parameters for scoring

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// Minimum-prominence thresholds for band detection
///
/// Each threshold is a percentage of the normalized trace's full range:
/// a band is kept when its prominence is strictly greater than
/// `threshold / 100`. A threshold of `0.0` keeps every local maximum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandTolerance {
    /// Threshold for peaks detected on the raw signal (default: 5.0)
    pub peaks: f64,

    /// Threshold for dips detected on the inverted signal (default: 5.0)
    pub dips: f64,
}

impl Default for BandTolerance {
    fn default() -> Self {
        Self {
            peaks: 5.0,
            dips: 5.0,
        }
    }
}

/// Scoring configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Band detection thresholds
    pub tolerance: BandTolerance,

    /// Collect a [`crate::analysis::trace::ScoreTrace`] with the intermediate
    /// values of every stage (default: false)
    pub collect_trace: bool,
}

impl ScoreConfig {
    /// Enable trace collection
    pub fn with_trace(mut self) -> Self {
        self.collect_trace = true;
        self
    }

    /// Check the configuration at the scoring boundary
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::InvalidInput` if a tolerance is negative, above
    /// 100 or not finite.
    pub fn validate(&self) -> Result<(), ScoreError> {
        for (name, value) in [("peaks", self.tolerance.peaks), ("dips", self.tolerance.dips)] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(ScoreError::InvalidInput(format!(
                    "{} tolerance must be in [0, 100], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
