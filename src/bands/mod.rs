//! Spectral band modules
//!
//! Bands are local extrema of a normalized trace:
//! - Detection, edge computation and validation
//! - Prominence rescaling onto the signal/baseline comparison scale

pub mod detection;
pub mod prominence;

use serde::{Deserialize, Serialize};

/// Which side of the signal a band set was detected on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BandKind {
    /// Local maximum of the raw signal
    Peak,
    /// Local minimum of the raw signal (maximum of the inverted signal)
    Dip,
}

/// A validated spectral band
///
/// Invariant: `left_edge <= position <= right_edge` and
/// `left_edge < right_edge`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Index of the extremum in the trace it was detected on
    pub position: usize,

    /// Left bound of the band region
    pub left_edge: usize,

    /// Right bound of the band region
    pub right_edge: usize,

    /// Windowed prominence (height relative to the edge window)
    pub prominence: f64,
}

impl Band {
    /// Whether `index` lies inside `[left_edge, right_edge]`
    pub fn contains(&self, index: usize) -> bool {
        (self.left_edge..=self.right_edge).contains(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_contains_edges() {
        let band = Band {
            position: 5,
            left_edge: 2,
            right_edge: 9,
            prominence: 0.4,
        };
        assert!(band.contains(2));
        assert!(band.contains(9));
        assert!(!band.contains(10));
        assert!(!band.contains(1));
    }
}
