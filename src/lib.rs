//! # IS-Score
//!
//! A quality score for baseline-corrected spectra (e.g. Raman). Given the raw
//! signal and its baseline-corrected counterpart, the implied baseline is
//! `raw − corrected`; seven penalties measure how plausibly that baseline sits
//! under the signal, and the score is `1 − min(Σ penalties, 1)` rounded to two
//! decimals.
//!
//! ## Penalties
//!
//! - **Intensity**: baseline above the signal outside every band
//! - **Single peak / single dip**: baseline cutting into a band apex
//! - **Peak region / dip region**: baseline profile across each band width
//! - **AUC**: under-fit area between peaks
//! - **Mean ratio**: baseline above the smoothed dips across scales
//!
//! ## Quick Start
//!
//! ```
//! use is_score::{is_score, ScoreConfig};
//!
//! let axis: Vec<f64> = (0..200).map(|i| 400.0 + i as f64).collect();
//! let raw: Vec<f64> = (0..200)
//!     .map(|i| (-((i as f64 - 100.0).powi(2)) / 200.0).exp())
//!     .collect();
//! let corrected: Vec<f64> = raw.iter().map(|x| x - 0.001).collect();
//!
//! let score = is_score(&raw, &corrected, &axis, &ScoreConfig::default())?;
//! assert!((0.0..=1.0).contains(&score));
//! # Ok::<(), is_score::ScoreError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! raw, corrected → Normalization → Band Detection → Penalties → Score
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod bands;
pub mod config;
pub mod error;
pub mod penalties;
pub mod preprocessing;

// Re-export main types
pub use analysis::metadata::ScoreMetadata;
pub use analysis::result::{PenaltyBreakdown, ScoreOutcome, ScoreReport};
pub use analysis::trace::{GeneralTrace, ScoreTrace};
pub use bands::{Band, BandKind};
pub use config::{BandTolerance, ScoreConfig};
pub use error::ScoreError;

use bands::detection::detect_bands;
use bands::prominence::normalize_prominences;
use penalties::auc::auc_penalty;
use penalties::band_region::{dip_region_penalty, peak_region_penalty};
use penalties::intensity::intensity_penalty;
use penalties::mean_ratio::mean_ratio_penalty;
use penalties::single_band::{single_dip_penalty, single_peak_penalty};
use preprocessing::normalization::{
    combined_range, invert_normalize, joint_normalize, self_normalize,
};

/// Score returned for empty or length-mismatched inputs
pub const INVALID_INPUT_SCORE: f64 = -1.0;

/// Check that the three arrays are non-empty and of equal length
fn inputs_well_formed(raw: &[f64], corrected: &[f64], axis: &[f64]) -> bool {
    if raw.is_empty() || corrected.is_empty() || axis.is_empty() {
        log::warn!("Empty input array, returning sentinel score");
        return false;
    }
    if raw.len() != corrected.len() || raw.len() != axis.len() {
        log::warn!(
            "Input length mismatch (raw={}, corrected={}, axis={}), returning sentinel score",
            raw.len(),
            corrected.len(),
            axis.len()
        );
        return false;
    }
    true
}

fn check_finite(name: &str, values: &[f64]) -> Result<(), ScoreError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(ScoreError::InvalidInput(format!(
            "{} contains a non-finite value at index {}",
            name, i
        ))),
        None => Ok(()),
    }
}

/// Main scoring function
///
/// Scores a baseline correction and returns the full report.
///
/// # Arguments
///
/// * `raw` - Raw signal
/// * `corrected` - Baseline-corrected signal
/// * `axis` - Spectral axis (only its length and range are used)
/// * `config` - Scoring configuration
///
/// # Returns
///
/// `ScoreOutcome::InvalidInput` for empty or length-mismatched inputs,
/// otherwise `ScoreOutcome::Scored` with the score, the seven penalties,
/// metadata and, if requested, the diagnostic trace.
///
/// # Errors
///
/// - `ScoreError::InvalidInput` for an invalid config or non-finite samples
/// - `ScoreError::DegenerateSignal` for a constant raw signal
/// - `ScoreError::NumericalError` when the baseline meets a band apex exactly
///
/// # Example
///
/// ```
/// use is_score::{score_spectrum, ScoreConfig, ScoreOutcome};
///
/// let outcome = score_spectrum(&[1.0, 2.0], &[1.0], &[0.0, 1.0], &ScoreConfig::default())?;
/// assert!(matches!(outcome, ScoreOutcome::InvalidInput));
/// assert_eq!(outcome.score(), -1.0);
/// # Ok::<(), is_score::ScoreError>(())
/// ```
pub fn score_spectrum(
    raw: &[f64],
    corrected: &[f64],
    axis: &[f64],
    config: &ScoreConfig,
) -> Result<ScoreOutcome, ScoreError> {
    use std::time::Instant;
    let start_time = Instant::now();

    if !inputs_well_formed(raw, corrected, axis) {
        return Ok(ScoreOutcome::InvalidInput);
    }

    config.validate()?;

    check_finite("raw", raw)?;
    check_finite("corrected", corrected)?;

    log::debug!("Scoring baseline correction: {} samples", raw.len());

    let baseline: Vec<f64> = raw.iter().zip(corrected).map(|(r, c)| r - c).collect();

    // Band detection runs on the raw signal alone
    let raw_norm = self_normalize(raw)?;

    // Signal/baseline comparisons share one scale
    let (signal_norm, baseline_norm) = joint_normalize(raw, &baseline)?;
    let (combined_min, combined_max) = combined_range(&signal_norm, &baseline_norm)
        .ok_or_else(|| ScoreError::InvalidInput("Empty normalized signal".to_string()))?;

    let peaks = detect_bands(&raw_norm, config.tolerance.peaks);
    let peaks = normalize_prominences(&peaks, combined_min, combined_max);

    let inverted = invert_normalize(&raw_norm)?;
    let dips = detect_bands(&inverted, config.tolerance.dips);
    let dips = normalize_prominences(&dips, combined_min, combined_max);

    log::debug!("Detected {} peaks and {} dips", peaks.len(), dips.len());

    let single_peak = single_peak_penalty(&signal_norm, &baseline_norm, &peaks);
    let peak_region = peak_region_penalty(&signal_norm, &baseline_norm, &peaks)?;
    let single_dip = single_dip_penalty(&signal_norm, &baseline_norm, &dips);
    let dip_region = dip_region_penalty(&signal_norm, &baseline_norm, &dips)?;
    let intensity = intensity_penalty(&signal_norm, &baseline_norm, &peaks, &dips);
    let auc = auc_penalty(raw, &baseline, &peaks);
    let mean_ratio = mean_ratio_penalty(raw, &baseline)?;

    let penalties = PenaltyBreakdown {
        intensity: intensity.penalty,
        single_peak: single_peak.penalty,
        peak_region: peak_region.penalty,
        single_dip: single_dip.penalty,
        dip_region: dip_region.penalty,
        auc: auc.penalty,
        mean_ratio: mean_ratio.penalty,
    };
    let score = penalties.score();

    log::info!("IS-Score breakdown:\n{}", penalties);

    let metadata = ScoreMetadata {
        signal_length: raw.len(),
        axis_range: axis.first().zip(axis.last()).map(|(&a, &b)| (a, b)),
        peak_count: peaks.len(),
        dip_count: dips.len(),
        processing_time_ms: start_time.elapsed().as_secs_f64() * 1000.0,
        ..Default::default()
    };

    let trace = config.collect_trace.then(|| ScoreTrace {
        general: GeneralTrace {
            signal_norm,
            baseline_norm,
            peaks,
            dips,
        },
        intensity,
        single_peak,
        single_dip,
        peak_region,
        dip_region,
        auc,
        mean_ratio,
    });

    Ok(ScoreOutcome::Scored(Box::new(ScoreReport {
        score,
        penalties,
        metadata,
        trace,
    })))
}

/// Score a baseline correction
///
/// Convenience wrapper around [`score_spectrum`] returning only the score.
///
/// # Returns
///
/// Score in [0, 1] rounded to 2 decimals, or exactly
/// [`INVALID_INPUT_SCORE`] (`-1.0`) if any input is empty or the lengths
/// differ.
///
/// # Errors
///
/// Same as [`score_spectrum`].
pub fn is_score(
    raw: &[f64],
    corrected: &[f64],
    axis: &[f64],
    config: &ScoreConfig,
) -> Result<f64, ScoreError> {
    score_spectrum(raw, corrected, axis, config).map(|outcome| outcome.score())
}
