//! Per-call diagnostic trace
//!
//! Collected only when [`crate::ScoreConfig::collect_trace`] is set and
//! returned inside the [`crate::ScoreReport`]. Every section is the full
//! outcome of one penalizer, so a caller can re-plot exactly what was scored.

use serde::{Deserialize, Serialize};

use crate::bands::Band;
use crate::penalties::auc::AucOutcome;
use crate::penalties::band_region::{DipRegionOutcome, PeakRegionOutcome};
use crate::penalties::intensity::IntensityOutcome;
use crate::penalties::mean_ratio::MeanRatioOutcome;
use crate::penalties::single_band::{SingleDipOutcome, SinglePeakOutcome};

/// Signals and bands shared by all penalizers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralTrace {
    /// Jointly normalized signal
    pub signal_norm: Vec<f64>,

    /// Jointly normalized baseline
    pub baseline_norm: Vec<f64>,

    /// Detected peaks with rescaled prominences
    pub peaks: Vec<Band>,

    /// Detected dips with rescaled prominences
    pub dips: Vec<Band>,
}

/// Diagnostic trace of one scoring call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreTrace {
    /// Normalized inputs and bands
    pub general: GeneralTrace,

    /// Intensity test
    pub intensity: IntensityOutcome,

    /// Single-peak test
    pub single_peak: SinglePeakOutcome,

    /// Single-dip test
    pub single_dip: SingleDipOutcome,

    /// Peak-region test
    pub peak_region: PeakRegionOutcome,

    /// Dip-region test
    pub dip_region: DipRegionOutcome,

    /// AUC test
    pub auc: AucOutcome,

    /// Mean-dips-ratio test
    pub mean_ratio: MeanRatioOutcome,
}
