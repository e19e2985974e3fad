//! Score result types

use std::fmt;

use serde::{Deserialize, Serialize};

use super::metadata::ScoreMetadata;
use super::trace::ScoreTrace;

/// The seven penalty terms of one scoring call
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PenaltyBreakdown {
    /// Baseline above the signal outside every band
    pub intensity: f64,

    /// Peak apexes cut by the baseline
    pub single_peak: f64,

    /// Baseline profile across peak regions
    pub peak_region: f64,

    /// Dip apexes missed by the baseline
    pub single_dip: f64,

    /// Baseline profile across dip regions
    pub dip_region: f64,

    /// Under-fit area between peaks
    pub auc: f64,

    /// Baseline above the smoothed dips across scales
    pub mean_ratio: f64,
}

impl PenaltyBreakdown {
    /// Sum of all penalty terms
    pub fn total(&self) -> f64 {
        self.intensity
            + self.single_peak
            + self.peak_region
            + self.single_dip
            + self.dip_region
            + self.auc
            + self.mean_ratio
    }

    /// Final score: `1 − min(total, 1)` rounded to 2 decimals
    ///
    /// # Example
    ///
    /// ```
    /// use is_score::PenaltyBreakdown;
    ///
    /// let penalties = PenaltyBreakdown { single_peak: 0.2, auc: 0.034, ..Default::default() };
    /// assert_eq!(penalties.score(), 0.77);
    ///
    /// let saturated = PenaltyBreakdown { intensity: 3.0, ..Default::default() };
    /// assert_eq!(saturated.score(), 0.0);
    /// ```
    pub fn score(&self) -> f64 {
        let raw = 1.0 - self.total().min(1.0);
        (raw * 100.0).round() / 100.0
    }

    fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("Intensity penalty", self.intensity),
            ("Single peak penalty", self.single_peak),
            ("Peak region penalty", self.peak_region),
            ("Single dip penalty", self.single_dip),
            ("Dip region penalty", self.dip_region),
            ("AUC penalty", self.auc),
            ("Mean ratio penalty", self.mean_ratio),
            ("IS-Score", self.score()),
        ]
    }
}

impl fmt::Display for PenaltyBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        let label_width = rows
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(0)
            .max("Information".len());

        writeln!(f, "{:<width$} | Value", "Information", width = label_width)?;
        writeln!(f, "{}-+------", "-".repeat(label_width))?;
        for (i, (label, value)) in rows.iter().enumerate() {
            write!(f, "{:<width$} | {:.2}", label, value, width = label_width)?;
            if i + 1 < rows.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Complete scoring result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    /// IS-Score in [0, 1], rounded to 2 decimals
    pub score: f64,

    /// Individual penalty terms
    pub penalties: PenaltyBreakdown,

    /// Call metadata
    pub metadata: ScoreMetadata,

    /// Diagnostic trace, present only when requested in the config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<ScoreTrace>,
}

/// Outcome of [`crate::score_spectrum`]
///
/// Empty or length-mismatched inputs are not an error: they produce
/// `InvalidInput`, the typed form of the `-1` sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScoreOutcome {
    /// Inputs were empty or of different lengths
    InvalidInput,
    /// Inputs were scored
    Scored(Box<ScoreReport>),
}

impl ScoreOutcome {
    /// Score value, or `-1.0` for invalid input
    pub fn score(&self) -> f64 {
        match self {
            ScoreOutcome::InvalidInput => crate::INVALID_INPUT_SCORE,
            ScoreOutcome::Scored(report) => report.score,
        }
    }

    /// The report, if inputs were scored
    pub fn report(&self) -> Option<&ScoreReport> {
        match self {
            ScoreOutcome::InvalidInput => None,
            ScoreOutcome::Scored(report) => Some(&**report),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_sums_all_terms() {
        let penalties = PenaltyBreakdown {
            intensity: 0.01,
            single_peak: 0.02,
            peak_region: 0.03,
            single_dip: 0.04,
            dip_region: 0.05,
            auc: 0.06,
            mean_ratio: 0.07,
        };
        assert!((penalties.total() - 0.28).abs() < 1e-12);
        assert_eq!(penalties.score(), 0.72);
    }

    #[test]
    fn test_score_bounds() {
        assert_eq!(PenaltyBreakdown::default().score(), 1.0);
        let heavy = PenaltyBreakdown {
            dip_region: 1.5,
            ..Default::default()
        };
        assert_eq!(heavy.score(), 0.0);
    }

    #[test]
    fn test_display_table() {
        let penalties = PenaltyBreakdown {
            single_peak: 0.458,
            ..Default::default()
        };
        let table = penalties.to_string();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 10);
        assert!(lines[0].starts_with("Information"));
        assert!(lines[0].ends_with("| Value"));
        assert!(lines[3].starts_with("Single peak penalty"));
        assert!(lines[3].ends_with("| 0.46"));
        assert!(lines[9].starts_with("IS-Score"));
        assert!(lines[9].ends_with("| 0.54"));
    }

    #[test]
    fn test_outcome_sentinel() {
        assert_eq!(ScoreOutcome::InvalidInput.score(), -1.0);
        assert!(ScoreOutcome::InvalidInput.report().is_none());
    }
}
