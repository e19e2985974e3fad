//! Single-band penalization
//!
//! Pass/fail test of every band apex against the baseline, aggregated into one
//! scalar per band class.
//!
//! Peaks fail when the baseline cuts into the band by more than 75% of its
//! prominence, or (second tier) when it sits between 75% and 100% and the
//! adaptive evaluation point `0.75·P + diff/2` is still exceeded.
//! Dips fail when the baseline drops below the dip floor (`sp − P`) or rises
//! more than half a prominence above the dip (`sp + P/2`).
//!
//! Both classes share the aggregation:
//! `ratio = failed / total`, `beta = max(1, total·(1 − ratio))`,
//! `weight = √total / (√total + beta)`, `penalty = weight · ln(1.5 + ratio²)`.

use serde::{Deserialize, Serialize};

use crate::bands::Band;

/// Fraction of the prominence the baseline may reach into a peak
const PEAK_TOLERATED_FRACTION: f64 = 0.75;

/// Result of the single-peak test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SinglePeakOutcome {
    /// Aggregated penalty
    pub penalty: f64,
    /// Positions of failed peaks
    pub penalized: Vec<usize>,
    /// Per band: baseline level above which the peak fails
    pub thresholds: Vec<f64>,
}

/// Result of the single-dip test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SingleDipOutcome {
    /// Aggregated penalty
    pub penalty: f64,
    /// Positions of failed dips
    pub penalized: Vec<usize>,
    /// Per band: baseline level above which the dip fails (`sp + P/2`)
    pub upper_thresholds: Vec<f64>,
    /// Per band: baseline level below which the dip fails (`sp − P`)
    pub lower_thresholds: Vec<f64>,
}

/// Aggregate band failures into a penalty
///
/// Returns 0 when there are no bands or no failures. The weight keeps the
/// penalty small while only a minor share of bands fail and grows slowly for
/// small band counts.
///
/// # Example
///
/// ```
/// use is_score::penalties::single_band::band_failure_penalty;
///
/// assert_eq!(band_failure_penalty(0, 10), 0.0);
/// // One band, failing: weight 1/2, ln(2.5)
/// assert!((band_failure_penalty(1, 1) - 0.5 * 2.5f64.ln()).abs() < 1e-12);
/// ```
pub fn band_failure_penalty(failed: usize, total: usize) -> f64 {
    if total == 0 || failed == 0 {
        return 0.0;
    }

    let total_f = total as f64;
    let ratio = failed as f64 / total_f;
    let beta = (total_f * (1.0 - ratio)).max(1.0);
    let weight = total_f.sqrt() / (total_f.sqrt() + beta);

    weight * (1.5 + ratio * ratio).ln()
}

/// Single-peak penalty
///
/// # Arguments
///
/// * `signal` - Jointly normalized signal
/// * `baseline` - Jointly normalized baseline
/// * `peaks` - Peaks with rescaled prominences
pub fn single_peak_penalty(signal: &[f64], baseline: &[f64], peaks: &[Band]) -> SinglePeakOutcome {
    let mut penalized = Vec::new();
    let mut thresholds = Vec::with_capacity(peaks.len());

    for peak in peaks {
        let p = peak.position;
        let prominence = peak.prominence;
        let apex = signal[p];
        let level = baseline[p];
        let tolerated = prominence * PEAK_TOLERATED_FRACTION;

        if level > apex - tolerated {
            penalized.push(p);
            thresholds.push(apex - tolerated);
        } else if level > apex - prominence {
            // Half of the encroachment beyond the full prominence widens the
            // tolerated region
            let diff = level - (apex - prominence);
            let eval_point = tolerated + diff / 2.0;
            if level > apex - eval_point {
                penalized.push(p);
            }
            thresholds.push(apex - eval_point);
        } else {
            thresholds.push(apex - tolerated);
        }
    }

    let penalty = band_failure_penalty(penalized.len(), peaks.len());

    log::debug!(
        "Single peak penalty: {}/{} peaks penalized, penalty={:.4}",
        penalized.len(),
        peaks.len(),
        penalty
    );

    SinglePeakOutcome {
        penalty,
        penalized,
        thresholds,
    }
}

/// Single-dip penalty
///
/// # Arguments
///
/// * `signal` - Jointly normalized signal
/// * `baseline` - Jointly normalized baseline
/// * `dips` - Dips with rescaled prominences
pub fn single_dip_penalty(signal: &[f64], baseline: &[f64], dips: &[Band]) -> SingleDipOutcome {
    let mut penalized = Vec::new();
    let mut upper_thresholds = Vec::with_capacity(dips.len());
    let mut lower_thresholds = Vec::with_capacity(dips.len());

    for dip in dips {
        let d = dip.position;
        let floor = signal[d] - dip.prominence;
        let ceiling = signal[d] + dip.prominence / 2.0;
        let level = baseline[d];

        if level < floor || level > ceiling {
            penalized.push(d);
        }
        lower_thresholds.push(floor);
        upper_thresholds.push(ceiling);
    }

    let penalty = band_failure_penalty(penalized.len(), dips.len());

    log::debug!(
        "Single dip penalty: {}/{} dips penalized, penalty={:.4}",
        penalized.len(),
        dips.len(),
        penalty
    );

    SingleDipOutcome {
        penalty,
        penalized,
        upper_thresholds,
        lower_thresholds,
    }
}
