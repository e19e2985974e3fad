//! Score metadata

use serde::{Deserialize, Serialize};

/// Scoring metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMetadata {
    /// Number of samples scored
    pub signal_length: usize,

    /// First and last axis value (e.g. wavenumbers), if the axis was non-empty
    pub axis_range: Option<(f64, f64)>,

    /// Number of detected peaks
    pub peak_count: usize,

    /// Number of detected dips
    pub dip_count: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: f64,

    /// Algorithm version
    pub algorithm_version: String,
}

impl Default for ScoreMetadata {
    fn default() -> Self {
        Self {
            signal_length: 0,
            axis_range: None,
            peak_count: 0,
            dip_count: 0,
            processing_time_ms: 0.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
