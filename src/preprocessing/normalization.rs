//! Min-max normalization utilities
//!
//! Two flavours are used by the pipeline:
//! - Self normalization: a single signal rescaled to [0, 1] by its own range.
//!   Used for band detection, where only relative shape matters.
//! - Joint normalization: a signal and its baseline rescaled with the combined
//!   range of both, preserving their relative offset. Used whenever a signal
//!   is compared against its baseline.
//!
//! # Example
//!
//! ```
//! use is_score::preprocessing::normalization::{joint_normalize, self_normalize};
//!
//! let raw = vec![1.0, 3.0, 2.0];
//! let baseline = vec![0.0, 1.0, 1.0];
//!
//! let trace = self_normalize(&raw)?;
//! assert_eq!(trace, vec![0.0, 1.0, 0.5]);
//!
//! let (sp, bl) = joint_normalize(&raw, &baseline)?;
//! assert_eq!(sp[1], 1.0);
//! assert_eq!(bl[0], 0.0);
//! # Ok::<(), is_score::ScoreError>(())
//! ```

use crate::error::ScoreError;

/// Minimum and maximum of a signal, `None` when empty
pub fn min_max(signal: &[f64]) -> Option<(f64, f64)> {
    if signal.is_empty() {
        return None;
    }
    let min = signal.iter().copied().fold(f64::INFINITY, f64::min);
    let max = signal.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

/// Combined minimum and maximum over two signals
pub fn combined_range(a: &[f64], b: &[f64]) -> Option<(f64, f64)> {
    match (min_max(a), min_max(b)) {
        (Some((min_a, max_a)), Some((min_b, max_b))) => {
            Some((min_a.min(min_b), max_a.max(max_b)))
        }
        (Some(range), None) | (None, Some(range)) => Some(range),
        (None, None) => None,
    }
}

fn checked_span(min: f64, max: f64, what: &str) -> Result<f64, ScoreError> {
    let span = max - min;
    if !span.is_finite() {
        return Err(ScoreError::NumericalError(format!(
            "{} has a non-finite range [{}, {}]",
            what, min, max
        )));
    }
    if span <= 0.0 {
        return Err(ScoreError::DegenerateSignal(format!(
            "{} is constant (min == max == {})",
            what, min
        )));
    }
    Ok(span)
}

/// Rescale a signal into [0, 1] using its own range
///
/// # Errors
///
/// Returns `ScoreError::InvalidInput` for an empty signal and
/// `ScoreError::DegenerateSignal` for a constant one.
pub fn self_normalize(signal: &[f64]) -> Result<Vec<f64>, ScoreError> {
    let (min, max) = min_max(signal)
        .ok_or_else(|| ScoreError::InvalidInput("Cannot normalize an empty signal".to_string()))?;
    let span = checked_span(min, max, "signal")?;

    Ok(signal.iter().map(|&x| (x - min) / span).collect())
}

/// Sign-invert a signal and rescale it into [0, 1]
///
/// Dips of the input become peaks of the output.
///
/// # Errors
///
/// Same as [`self_normalize`].
pub fn invert_normalize(signal: &[f64]) -> Result<Vec<f64>, ScoreError> {
    let negated: Vec<f64> = signal.iter().map(|&x| -x).collect();
    self_normalize(&negated)
}

/// Rescale a signal and its baseline into [0, 1] using their combined range
///
/// # Returns
///
/// `(signal_norm, baseline_norm)`
///
/// # Errors
///
/// Returns `ScoreError::InvalidInput` if either input is empty or the lengths
/// differ, and `ScoreError::DegenerateSignal` if both are the same constant.
pub fn joint_normalize(
    signal: &[f64],
    baseline: &[f64],
) -> Result<(Vec<f64>, Vec<f64>), ScoreError> {
    if signal.is_empty() || baseline.is_empty() {
        return Err(ScoreError::InvalidInput(
            "Cannot normalize an empty signal".to_string(),
        ));
    }
    if signal.len() != baseline.len() {
        return Err(ScoreError::InvalidInput(format!(
            "Signal and baseline lengths differ ({} vs {})",
            signal.len(),
            baseline.len()
        )));
    }

    let (min, max) = combined_range(signal, baseline)
        .ok_or_else(|| ScoreError::InvalidInput("Cannot normalize an empty signal".to_string()))?;
    let span = checked_span(min, max, "signal and baseline")?;

    let signal_norm = signal.iter().map(|&x| (x - min) / span).collect();
    let baseline_norm = baseline.iter().map(|&x| (x - min) / span).collect();
    Ok((signal_norm, baseline_norm))
}
