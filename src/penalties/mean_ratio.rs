//! Mean-dips-ratio penalization
//!
//! Multi-scale check for a baseline that cuts through the signal floor. At
//! each smoothing scale the dips of the smoothed signal are split into:
//! - `lower`: the baseline lies below the smoothed signal (dip respected)
//! - `greater`: the baseline lies above the smoothed signal (over-corrected,
//!   the corrected signal goes negative there)
//!
//! When over-corrected dips are common across scales (mean of
//! `len(lower) / len(greater)` below [`RATIO_LIMIT`]) the penalty is the sum of
//! the per-scale mean gaps `baseline − signal` over `greater` dips.

use serde::{Deserialize, Serialize};

use crate::bands::detection::find_bands;
use crate::error::ScoreError;
use crate::preprocessing::normalization::{invert_normalize, joint_normalize};
use crate::preprocessing::smoothing::savgol_filter;

/// Smoothing window lengths, one per scale
pub const SMOOTHING_WINDOWS: [usize; 4] = [8, 16, 32, 40];

/// Polynomial degree of the smoothing filter
pub const SMOOTHING_DEGREE: usize = 4;

/// Mean lower/greater ratio at or above which no penalty applies
pub const RATIO_LIMIT: f64 = 5.0;

/// Dip classification at one smoothing scale
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleRecord {
    /// Smoothing window length
    pub window: usize,
    /// Dip positions with the baseline below the smoothed signal
    pub lower: Vec<usize>,
    /// Dip positions with the baseline above the smoothed signal
    pub greater: Vec<usize>,
    /// `len(lower) / len(greater)`, when any greater dip exists
    pub ratio: Option<f64>,
    /// Mean `baseline − signal` over greater dips, when any exist
    pub mean_gap: Option<f64>,
}

/// Result of the mean-dips-ratio test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeanRatioOutcome {
    /// Sum of per-scale mean gaps, or 0
    pub penalty: f64,
    /// Mean of the recorded ratios
    pub mean_ratio: Option<f64>,
    /// One record per evaluated scale
    pub scales: Vec<ScaleRecord>,
}

/// Classify the dips of one smoothed signal against the baseline
fn classify_scale(
    smoothed: &[f64],
    baseline: &[f64],
    window: usize,
) -> Result<ScaleRecord, ScoreError> {
    let inverted = invert_normalize(smoothed)?;
    let dips: Vec<usize> = find_bands(&inverted, 0.0)
        .into_iter()
        .map(|(position, _)| position)
        .collect();

    let (signal_norm, baseline_norm) = joint_normalize(smoothed, baseline)?;

    let mut lower = Vec::new();
    let mut greater = Vec::new();
    for &d in &dips {
        if baseline_norm[d] < signal_norm[d] {
            lower.push(d);
        } else if baseline_norm[d] > signal_norm[d] {
            greater.push(d);
        }
    }

    let (ratio, mean_gap) = if greater.is_empty() {
        (None, None)
    } else {
        let gap_sum: f64 = greater
            .iter()
            .map(|&d| baseline_norm[d] - signal_norm[d])
            .sum();
        (
            Some(lower.len() as f64 / greater.len() as f64),
            Some(gap_sum / greater.len() as f64),
        )
    };

    Ok(ScaleRecord {
        window,
        lower,
        greater,
        ratio,
        mean_gap,
    })
}

/// Combine per-scale records into `(mean_ratio, penalty)`
pub fn combine_scales(scales: &[ScaleRecord]) -> (Option<f64>, f64) {
    let ratios: Vec<f64> = scales.iter().filter_map(|s| s.ratio).collect();
    if ratios.is_empty() {
        return (None, 0.0);
    }

    let mean_ratio = ratios.iter().sum::<f64>() / ratios.len() as f64;
    let penalty = if mean_ratio < RATIO_LIMIT {
        scales.iter().filter_map(|s| s.mean_gap).sum()
    } else {
        0.0
    };

    (Some(mean_ratio), penalty)
}

/// Mean-dips-ratio penalty
///
/// # Arguments
///
/// * `raw` - Raw signal
/// * `baseline` - Baseline derived as `raw − corrected`
///
/// # Errors
///
/// Propagates normalization errors for a signal that smooths to a constant.
pub fn mean_ratio_penalty(raw: &[f64], baseline: &[f64]) -> Result<MeanRatioOutcome, ScoreError> {
    let mut scales = Vec::with_capacity(SMOOTHING_WINDOWS.len());

    for &window in &SMOOTHING_WINDOWS {
        if window > raw.len() {
            log::debug!(
                "Skipping smoothing window {} for signal of length {}",
                window,
                raw.len()
            );
            continue;
        }

        let smoothed = savgol_filter(raw, window, SMOOTHING_DEGREE)?;
        let record = classify_scale(&smoothed, baseline, window)?;
        log::debug!(
            "Window {}: {} lower dips, {} greater dips",
            window,
            record.lower.len(),
            record.greater.len()
        );
        scales.push(record);
    }

    let (mean_ratio, penalty) = combine_scales(&scales);

    log::debug!(
        "Mean ratio penalty: mean_ratio={:?}, penalty={:.4}",
        mean_ratio,
        penalty
    );

    Ok(MeanRatioOutcome {
        penalty,
        mean_ratio,
        scales,
    })
}
