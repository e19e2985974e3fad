//! Area-under-curve penalization
//!
//! Detects a baseline that under-fits the background between peaks. A
//! reference background is built by linear interpolation of the raw signal
//! through the signal ends and every peak edge, capped at the raw signal so it
//! never rises above the data. Wherever that reference sits above the
//! baseline, the baseline left background in the corrected signal.
//!
//! Algorithm:
//! 1. Anchors: `{0, N−1}` and both edges of every peak, sorted and unique
//! 2. Interpolate `raw` linearly between consecutive anchors, cap at `raw`
//! 3. Gap `g_i = max(interp_i − baseline_i, 0)`
//! 4. Penalty = trapezoidal area of `g` / `((N−1) · (max(raw) − min(raw)))`

use serde::{Deserialize, Serialize};

use crate::bands::Band;
use crate::preprocessing::normalization::min_max;

/// Result of the AUC test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AucOutcome {
    /// Normalized under-fit area
    pub penalty: f64,
    /// Reference background curve, same length as the input
    pub interpolation: Vec<f64>,
}

/// Piecewise-linear interpolation of `raw` through the anchor indices
///
/// `anchors` must be sorted, unique, start at 0 and end at `raw.len() - 1`.
fn interpolate_through(raw: &[f64], anchors: &[usize]) -> Vec<f64> {
    let mut curve = raw.to_vec();
    for pair in anchors.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let span = (b - a) as f64;
        for (i, value) in curve.iter_mut().enumerate().take(b + 1).skip(a) {
            let t = (i - a) as f64 / span;
            *value = raw[a] + t * (raw[b] - raw[a]);
        }
    }
    curve
}

/// AUC penalty
///
/// # Arguments
///
/// * `raw` - Raw signal
/// * `baseline` - Baseline derived as `raw − corrected`
/// * `peaks` - Detected peaks (only the edges are used)
///
/// # Returns
///
/// Penalty and the interpolated reference curve. The penalty is 0 for a
/// single-sample or constant signal.
pub fn auc_penalty(raw: &[f64], baseline: &[f64], peaks: &[Band]) -> AucOutcome {
    let n = raw.len().min(baseline.len());
    if n == 0 {
        return AucOutcome::default();
    }
    let raw = &raw[..n];

    let mut anchors = vec![0, n - 1];
    for peak in peaks {
        anchors.push(peak.left_edge.min(n - 1));
        anchors.push(peak.right_edge.min(n - 1));
    }
    anchors.sort_unstable();
    anchors.dedup();

    let mut interpolation = interpolate_through(raw, &anchors);
    for (value, &sample) in interpolation.iter_mut().zip(raw) {
        *value = value.min(sample);
    }

    let span = match min_max(raw) {
        Some((lo, hi)) => hi - lo,
        None => 0.0,
    };
    if n < 2 || span <= 0.0 || !span.is_finite() {
        return AucOutcome {
            penalty: 0.0,
            interpolation,
        };
    }

    let gaps: Vec<f64> = interpolation
        .iter()
        .zip(baseline)
        .map(|(reference, level)| (reference - level).max(0.0))
        .collect();
    let area: f64 = gaps.windows(2).map(|w| 0.5 * (w[0] + w[1])).sum();
    let penalty = area / ((n - 1) as f64 * span);

    log::debug!(
        "AUC penalty: {} anchors, area={:.4}, penalty={:.4}",
        anchors.len(),
        area,
        penalty
    );

    AucOutcome {
        penalty,
        interpolation,
    }
}
