//! Intensity penalization
//!
//! Outside every detected band the corrected signal should stay non-negative:
//! a baseline above the signal there means the correction pushed plain
//! background below zero. Each such index is flagged, and the penalty is the
//! summed excursion `baseline − signal` over flagged indices divided by the
//! signal length. A baseline that tracks the signal from below yields 0.

use serde::{Deserialize, Serialize};

use crate::bands::Band;

/// Result of the intensity test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntensityOutcome {
    /// Mean excursion over the whole signal
    pub penalty: f64,
    /// Indices outside all bands where the baseline exceeds the signal
    pub flagged: Vec<usize>,
}

/// Intensity penalty
///
/// # Arguments
///
/// * `signal` - Jointly normalized signal
/// * `baseline` - Jointly normalized baseline
/// * `peaks` - Detected peaks (only the edges are used)
/// * `dips` - Detected dips (only the edges are used)
pub fn intensity_penalty(
    signal: &[f64],
    baseline: &[f64],
    peaks: &[Band],
    dips: &[Band],
) -> IntensityOutcome {
    let n = signal.len().min(baseline.len());
    if n == 0 {
        return IntensityOutcome::default();
    }

    let mut flagged = Vec::new();
    let mut excursion = 0.0;
    for i in 0..n {
        if peaks.iter().chain(dips).any(|band| band.contains(i)) {
            continue;
        }
        if baseline[i] > signal[i] {
            flagged.push(i);
            excursion += baseline[i] - signal[i];
        }
    }

    let penalty = excursion / n as f64;

    log::debug!(
        "Intensity penalty: {} of {} indices flagged, penalty={:.4}",
        flagged.len(),
        n,
        penalty
    );

    IntensityOutcome { penalty, flagged }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_baseline_is_zero() {
        let signal = vec![0.1, 0.2, 0.3, 0.2, 0.1];
        let outcome = intensity_penalty(&signal, &signal, &[], &[]);
        assert_eq!(outcome.penalty, 0.0);
        assert!(outcome.flagged.is_empty());
    }

    #[test]
    fn test_baseline_below_signal_is_zero() {
        let signal = vec![0.5; 10];
        let baseline = vec![0.1; 10];
        assert_eq!(intensity_penalty(&signal, &baseline, &[], &[]).penalty, 0.0);
    }

    #[test]
    fn test_excursion_outside_bands_flagged() {
        let signal = vec![0.0; 10];
        let baseline = vec![0.2; 10];
        let band = Band {
            position: 4,
            left_edge: 2,
            right_edge: 6,
            prominence: 0.5,
        };

        let outcome = intensity_penalty(&signal, &baseline, &[band], &[]);
        assert_eq!(outcome.flagged, vec![0, 1, 7, 8, 9]);
        assert!((outcome.penalty - 0.2 * 5.0 / 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_monotonic_in_excursion() {
        let signal = vec![0.0; 20];
        let mut previous = 0.0;
        for level in [0.05, 0.1, 0.3, 0.6] {
            let baseline = vec![level; 20];
            let penalty = intensity_penalty(&signal, &baseline, &[], &[]).penalty;
            assert!(penalty > previous);
            previous = penalty;
        }
    }

    #[test]
    fn test_dip_regions_are_excluded() {
        let signal = vec![0.0; 6];
        let baseline = vec![0.1; 6];
        let dip = Band {
            position: 3,
            left_edge: 0,
            right_edge: 5,
            prominence: 0.3,
        };
        let outcome = intensity_penalty(&signal, &baseline, &[], &[dip]);
        assert!(outcome.flagged.is_empty());
    }
}
