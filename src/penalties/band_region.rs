//! Band-region penalization
//!
//! Extends the single-apex test across the whole width of every band. For
//! each index in `[left_edge, right_edge)` a "fake prominence" is derived by
//! scaling the local signal-to-baseline gap proportionally to the band's
//! prominence relative to its apex gap:
//!
//! `fake_i = |sp_i − bl_i| · P / apex_diff`
//!
//! Subtracting the fake prominence from the signal gives the baseline level
//! the band profile implies. Deviations from that level are split in two
//! classes, trimmed at their 75th percentile (strictly below is kept) and
//! averaged per band. Class penalties are the sums of the per-band averages.
//!
//! Peaks: over-fit (`sp − fake < bl`) and under-fit (`sp − fake > bl`).
//! Dips: lower (`sp − fake > bl`) and greater (`sp + fake < bl`), with the
//! dip prominence halved and the fake prominence clipped at the signal.

use serde::{Deserialize, Serialize};

use crate::bands::{Band, BandKind};
use crate::error::ScoreError;

/// Percentile above which per-band deviations are discarded
const TRIM_PERCENTILE: f64 = 75.0;

/// A single deviation between the implied and the actual baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionDeviation {
    /// Signal index
    pub index: usize,
    /// Absolute deviation
    pub value: f64,
}

/// Result of the peak-region test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeakRegionOutcome {
    /// Over-fit plus under-fit penalty
    pub penalty: f64,
    /// Sum of per-band trimmed over-fit averages
    pub over_fit_penalty: f64,
    /// Sum of per-band trimmed under-fit averages
    pub under_fit_penalty: f64,
    /// Fake-prominence profile per band
    pub fake_prominences: Vec<Vec<f64>>,
    /// All over-fit deviations
    pub over_fit: Vec<RegionDeviation>,
    /// All under-fit deviations
    pub under_fit: Vec<RegionDeviation>,
}

/// Result of the dip-region test
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DipRegionOutcome {
    /// Lower plus greater penalty
    pub penalty: f64,
    /// Sum of per-band trimmed averages of the lower deviations
    pub lower_penalty: f64,
    /// Sum of per-band trimmed averages of the greater deviations
    pub greater_penalty: f64,
    /// Fake-prominence profile per band
    pub fake_prominences: Vec<Vec<f64>>,
    /// All lower deviations
    pub lower: Vec<RegionDeviation>,
    /// All greater deviations
    pub greater: Vec<RegionDeviation>,
}

/// Percentile with linear interpolation between closest ranks
///
/// `rank = q/100 · (n − 1)`. Returns `None` for an empty slice.
///
/// # Example
///
/// ```
/// use is_score::penalties::band_region::percentile;
///
/// assert_eq!(percentile(&[1.0, 2.0, 3.0, 4.0], 75.0), Some(3.25));
/// assert_eq!(percentile(&[], 75.0), None);
/// ```
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Mean of the values strictly below their 75th percentile
///
/// Returns `None` when nothing is retained (empty input, or every value
/// equal to the percentile).
pub fn trimmed_mean(values: &[f64]) -> Option<f64> {
    let cutoff = percentile(values, TRIM_PERCENTILE)?;
    let retained: Vec<f64> = values.iter().copied().filter(|&v| v < cutoff).collect();
    if retained.is_empty() {
        return None;
    }
    Some(retained.iter().sum::<f64>() / retained.len() as f64)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Fake-prominence profile over `[left_edge, right_edge)` for every band
///
/// # Errors
///
/// Returns `ScoreError::NumericalError` when a band's apex sits exactly on
/// the baseline (zero apex gap), since the proportional scaling is undefined.
pub fn fake_prominences(
    kind: BandKind,
    signal: &[f64],
    baseline: &[f64],
    bands: &[Band],
) -> Result<Vec<Vec<f64>>, ScoreError> {
    bands
        .iter()
        .map(|band| {
            let p = band.position;
            let (band_prominence, apex_diff) = match kind {
                BandKind::Peak => (band.prominence, signal[p] - baseline[p]),
                BandKind::Dip => ((band.prominence / 2.0).abs(), (signal[p] - baseline[p]).abs()),
            };

            if apex_diff == 0.0 || !apex_diff.is_finite() {
                return Err(ScoreError::NumericalError(format!(
                    "{:?} at index {} has zero apex deviation from the baseline",
                    kind, p
                )));
            }

            let profile = (band.left_edge..band.right_edge)
                .map(|i| {
                    let fake = (signal[i] - baseline[i]).abs() * band_prominence / apex_diff;
                    match kind {
                        BandKind::Dip if signal[i] - fake < 0.0 => signal[i],
                        _ => fake,
                    }
                })
                .collect();
            Ok(profile)
        })
        .collect()
}

/// Peak-region penalty
///
/// # Arguments
///
/// * `signal` - Jointly normalized signal
/// * `baseline` - Jointly normalized baseline
/// * `peaks` - Peaks with rescaled prominences
///
/// # Errors
///
/// Propagates the zero apex gap error from [`fake_prominences`].
pub fn peak_region_penalty(
    signal: &[f64],
    baseline: &[f64],
    peaks: &[Band],
) -> Result<PeakRegionOutcome, ScoreError> {
    let profiles = fake_prominences(BandKind::Peak, signal, baseline, peaks)?;
    let mut outcome = PeakRegionOutcome::default();

    for (peak, profile) in peaks.iter().zip(profiles.iter()) {
        let mut over = Vec::new();
        let mut under = Vec::new();

        for (offset, &fake) in profile.iter().enumerate() {
            let i = peak.left_edge + offset;
            let implied = signal[i] - fake;
            let deviation = (implied - baseline[i]).abs();

            if implied < baseline[i] {
                over.push(deviation);
                outcome.over_fit.push(RegionDeviation {
                    index: i,
                    value: deviation,
                });
            } else if implied > baseline[i] {
                under.push(deviation);
                outcome.under_fit.push(RegionDeviation {
                    index: i,
                    value: deviation,
                });
            }
        }

        // Rounding zeroes out negligible averages
        if let Some(mean) = trimmed_mean(&over) {
            outcome.over_fit_penalty += round_to(mean, 3);
        }
        if let Some(mean) = trimmed_mean(&under) {
            outcome.under_fit_penalty += round_to(mean, 4);
        }
    }

    outcome.penalty = outcome.over_fit_penalty + outcome.under_fit_penalty;
    outcome.fake_prominences = profiles;

    log::debug!(
        "Peak region penalty: {} peaks, over={:.4}, under={:.4}",
        peaks.len(),
        outcome.over_fit_penalty,
        outcome.under_fit_penalty
    );

    Ok(outcome)
}

/// Dip-region penalty
///
/// # Arguments
///
/// * `signal` - Jointly normalized signal
/// * `baseline` - Jointly normalized baseline
/// * `dips` - Dips with rescaled prominences
///
/// # Errors
///
/// Propagates the zero apex gap error from [`fake_prominences`].
pub fn dip_region_penalty(
    signal: &[f64],
    baseline: &[f64],
    dips: &[Band],
) -> Result<DipRegionOutcome, ScoreError> {
    let profiles = fake_prominences(BandKind::Dip, signal, baseline, dips)?;
    let mut outcome = DipRegionOutcome::default();

    for (dip, profile) in dips.iter().zip(profiles.iter()) {
        let mut lower = Vec::new();
        let mut greater = Vec::new();

        for (offset, &fake) in profile.iter().enumerate() {
            let i = dip.left_edge + offset;

            if signal[i] - fake > baseline[i] {
                let deviation = (signal[i] - fake - baseline[i]).abs();
                lower.push(deviation);
                outcome.lower.push(RegionDeviation {
                    index: i,
                    value: deviation,
                });
            }
            if signal[i] + fake < baseline[i] {
                let deviation = (signal[i] + fake - baseline[i]).abs();
                greater.push(deviation);
                outcome.greater.push(RegionDeviation {
                    index: i,
                    value: deviation,
                });
            }
        }

        outcome.lower_penalty += trimmed_mean(&lower).unwrap_or(0.0);
        outcome.greater_penalty += trimmed_mean(&greater).unwrap_or(0.0);
    }

    outcome.penalty = outcome.lower_penalty + outcome.greater_penalty;
    outcome.fake_prominences = profiles;

    log::debug!(
        "Dip region penalty: {} dips, lower={:.4}, greater={:.4}",
        dips.len(),
        outcome.lower_penalty,
        outcome.greater_penalty
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gaussian(n: usize, center: f64, width: f64) -> Vec<f64> {
        (0..n)
            .map(|i| (-((i as f64 - center).powi(2)) / (2.0 * width * width)).exp())
            .collect()
    }

    fn wide_band(position: usize, prominence: f64) -> Band {
        Band {
            position,
            left_edge: position - 40,
            right_edge: position + 40,
            prominence,
        }
    }

    #[test]
    fn test_percentile_linear() {
        assert_eq!(percentile(&[5.0], 75.0), Some(5.0));
        assert_eq!(percentile(&[4.0, 1.0, 3.0, 2.0], 75.0), Some(3.25));
        assert_eq!(percentile(&[0.0, 10.0], 50.0), Some(5.0));
    }

    #[test]
    fn test_trimmed_mean_discards_top_quartile() {
        let values = vec![1.0, 1.0, 1.0, 1.0, 100.0];
        // 75th percentile is 1.0, nothing is strictly below it
        assert_eq!(trimmed_mean(&values), None);

        let values = vec![1.0, 2.0, 3.0, 4.0, 100.0];
        // Cutoff 4.0 keeps 1, 2, 3
        assert_eq!(trimmed_mean(&values), Some(2.0));

        assert_eq!(trimmed_mean(&[]), None);
    }

    #[test]
    fn test_fake_prominence_zero_apex_gap_is_error() {
        let signal = vec![0.0, 1.0, 0.0];
        let baseline = vec![0.0, 1.0, 0.0];
        let band = Band {
            position: 1,
            left_edge: 0,
            right_edge: 2,
            prominence: 1.0,
        };
        let result = fake_prominences(BandKind::Peak, &signal, &baseline, &[band]);
        assert!(matches!(result, Err(ScoreError::NumericalError(_))));
    }

    #[test]
    fn test_fake_prominence_profile_is_proportional() {
        let signal = vec![0.2, 0.6, 1.0, 0.6, 0.2];
        let baseline = vec![0.0; 5];
        let band = Band {
            position: 2,
            left_edge: 0,
            right_edge: 5,
            prominence: 0.5,
        };
        let profiles = fake_prominences(BandKind::Peak, &signal, &baseline, &[band]).unwrap();

        assert_eq!(profiles[0].len(), 5);
        for (fake, sp) in profiles[0].iter().zip(signal.iter()) {
            assert!((fake - sp * 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_dip_fake_prominence_clipped_at_signal() {
        let signal = vec![0.5, 0.1, 0.5];
        let baseline = vec![1.0, 0.0, 1.0];
        let band = Band {
            position: 1,
            left_edge: 0,
            right_edge: 3,
            prominence: 0.4,
        };
        let profiles = fake_prominences(BandKind::Dip, &signal, &baseline, &[band]).unwrap();

        // Shoulders: 0.5 · (0.2 / 0.1) = 1.0 exceeds the signal; apex: 0.2 > 0.1
        assert!((profiles[0][0] - 0.5).abs() < 1e-12);
        assert!((profiles[0][1] - 0.1).abs() < 1e-12);
        for (fake, sp) in profiles[0].iter().zip(signal.iter()) {
            assert!(sp - fake >= 0.0);
        }
    }

    #[test]
    fn test_peak_region_clean_fit_small_penalty() {
        let signal = gaussian(200, 100.0, 10.0);
        let baseline = vec![0.001; 200];
        let outcome = peak_region_penalty(&signal, &baseline, &[wide_band(100, 1.0)]).unwrap();
        assert!(outcome.penalty < 0.01, "penalty {}", outcome.penalty);
        assert_eq!(outcome.fake_prominences[0].len(), 80);
    }

    #[test]
    fn test_peak_region_overfit_baseline_penalized() {
        let signal = gaussian(200, 100.0, 10.0);
        let baseline: Vec<f64> = signal.iter().map(|x| 0.95 * x).collect();
        let outcome = peak_region_penalty(&signal, &baseline, &[wide_band(100, 1.0)]).unwrap();

        assert!(outcome.over_fit_penalty > 0.05, "over {}", outcome.over_fit_penalty);
        assert!(outcome.under_fit.is_empty());
        assert!((outcome.penalty - outcome.over_fit_penalty).abs() < 1e-12);
    }

    #[test]
    fn test_peak_region_overfit_grows_with_encroachment() {
        let signal = gaussian(200, 100.0, 10.0);
        let mut previous = 0.0;
        for fraction in [0.5, 0.7, 0.9] {
            let baseline: Vec<f64> = signal.iter().map(|x| fraction * x).collect();
            let penalty = peak_region_penalty(&signal, &baseline, &[wide_band(100, 1.0)])
                .unwrap()
                .penalty;
            assert!(penalty > previous, "fraction {}: {} <= {}", fraction, penalty, previous);
            previous = penalty;
        }
    }

    #[test]
    fn test_no_bands_no_penalty() {
        let signal = vec![0.0, 0.5, 1.0];
        let baseline = vec![0.0; 3];
        assert_eq!(peak_region_penalty(&signal, &baseline, &[]).unwrap().penalty, 0.0);
        assert_eq!(dip_region_penalty(&signal, &baseline, &[]).unwrap().penalty, 0.0);
    }

    #[test]
    fn test_dip_region_baseline_above_dip_penalized() {
        let signal: Vec<f64> = gaussian(200, 100.0, 10.0).iter().map(|x| 1.0 - x).collect();

        let hugging: Vec<f64> = signal.iter().map(|x| x - 0.01).collect();
        let calm = dip_region_penalty(&signal, &hugging, &[wide_band(100, 1.0)]).unwrap();

        let lifted: Vec<f64> = signal.iter().map(|x| x + 0.6).collect();
        let lifted = dip_region_penalty(&signal, &lifted, &[wide_band(100, 1.0)]).unwrap();

        assert!(
            lifted.penalty > calm.penalty,
            "lifted {} <= calm {}",
            lifted.penalty,
            calm.penalty
        );
        assert!(!lifted.greater.is_empty());
    }
}
