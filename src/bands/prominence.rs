//! Prominence rescaling
//!
//! Band prominences are measured on a self-normalized trace. Before they are
//! compared with the baseline they are rescaled by the combined range of the
//! jointly normalized signal and baseline, so that prominence and
//! signal-to-baseline distance share the same units.

use super::Band;

/// Rescale each band prominence by `combined_max - combined_min`
///
/// Order, positions and edges are preserved.
pub fn normalize_prominences(bands: &[Band], combined_min: f64, combined_max: f64) -> Vec<Band> {
    let span = combined_max - combined_min;
    bands
        .iter()
        .map(|band| Band {
            prominence: band.prominence * span,
            ..*band
        })
        .collect()
}
