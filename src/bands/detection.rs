//! Band detection on a normalized trace
//!
//! Finds local maxima ("bands") in a [0, 1] trace, bounds each one with a
//! left/right edge, drops degenerate bands and measures a windowed
//! prominence for the survivors. Dips are detected by running the same
//! procedure on the inverted trace.
//!
//! Algorithm:
//! 1. Local maxima (flat tops resolved to their midpoint), filtered by
//!    detection prominence > tolerance / 100
//! 2. Edges: walk outward tracking the running minimum until the trace rises
//!    by more than the tolerance, exceeds the apex, or ends
//! 3. Validation: non-zero width, position inside its own edges
//! 4. Windowed prominence: apex minus the higher of the two edge-window minima
//!
//! # Example
//!
//! ```
//! use is_score::bands::detection::detect_bands;
//!
//! let trace = vec![0.0, 0.2, 1.0, 0.3, 0.1, 0.4, 0.0];
//! let bands = detect_bands(&trace, 5.0);
//!
//! assert_eq!(bands.len(), 2);
//! assert_eq!(bands[0].position, 2);
//! assert_eq!((bands[0].left_edge, bands[0].right_edge), (0, 4));
//! ```

use super::Band;

/// Smallest rise treated as the start of a neighbouring band
const MIN_RISE: f64 = 1e-12;

/// Convert a percentage tolerance into trace units
fn tolerance_threshold(tolerance: f64) -> f64 {
    tolerance.max(0.0) / 100.0
}

/// Indices of all local maxima, flat tops reduced to their midpoint
///
/// Samples at either end of the trace are never maxima.
pub fn local_maxima(trace: &[f64]) -> Vec<usize> {
    let n = trace.len();
    if n < 3 {
        return Vec::new();
    }

    let mut maxima = Vec::new();
    let last = n - 1;
    let mut i = 1;
    while i < last {
        if trace[i - 1] < trace[i] {
            let mut ahead = i + 1;
            while ahead < last && trace[ahead] == trace[i] {
                ahead += 1;
            }
            if trace[ahead] < trace[i] {
                maxima.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    maxima
}

/// Topographic prominence of the sample at `position`
///
/// Each side's valley is the minimum met while walking outward until a
/// strictly higher sample or the trace end.
pub fn detection_prominence(trace: &[f64], position: usize) -> f64 {
    let apex = trace[position];

    let mut left_min = apex;
    for &value in trace[..position].iter().rev() {
        if value > apex {
            break;
        }
        left_min = left_min.min(value);
    }

    let mut right_min = apex;
    for &value in &trace[position + 1..] {
        if value > apex {
            break;
        }
        right_min = right_min.min(value);
    }

    apex - left_min.max(right_min)
}

/// Find bands whose detection prominence exceeds the tolerance
///
/// # Arguments
///
/// * `trace` - Normalized trace in [0, 1]
/// * `tolerance` - Minimum prominence as a percentage of the trace range
///   (e.g. 5.0 keeps bands standing more than 0.05 above their valleys)
///
/// # Returns
///
/// `(position, detection_prominence)` pairs sorted by position
pub fn find_bands(trace: &[f64], tolerance: f64) -> Vec<(usize, f64)> {
    let threshold = tolerance_threshold(tolerance);

    let bands: Vec<(usize, f64)> = local_maxima(trace)
        .into_iter()
        .map(|position| (position, detection_prominence(trace, position)))
        .filter(|&(_, prominence)| prominence > threshold && prominence > 0.0)
        .collect();

    log::debug!(
        "Found {} bands in trace of length {} (tolerance={:.2})",
        bands.len(),
        trace.len(),
        tolerance
    );

    bands
}

fn walk_edge<I>(trace: &[f64], position: usize, indices: I, rise: f64) -> usize
where
    I: Iterator<Item = usize>,
{
    let apex = trace[position];
    let mut running_min = apex;
    let mut edge = position;

    for i in indices {
        let value = trace[i];
        if value > apex {
            break;
        }
        if value < running_min {
            running_min = value;
            edge = i;
        } else if value - running_min > rise {
            break;
        }
    }
    edge
}

/// Compute left/right edges for each band position
///
/// From the band apex the trace is walked outward on each side while
/// tracking the running minimum. The walk stops at the trace end, at a
/// sample higher than the apex, or once the trace climbs more than the
/// tolerance above the running minimum (a neighbouring band). The edge is
/// the position of the running minimum, so edges are generally asymmetric.
pub fn band_edges(trace: &[f64], positions: &[usize], tolerance: f64) -> Vec<(usize, usize)> {
    let rise = tolerance_threshold(tolerance).max(MIN_RISE);

    positions
        .iter()
        .map(|&position| {
            if position >= trace.len() {
                return (position, position);
            }
            let left = walk_edge(trace, position, (0..position).rev(), rise);
            let right = walk_edge(trace, position, position + 1..trace.len(), rise);
            (left, right)
        })
        .collect()
}

/// Keep only bands with usable edges
///
/// Drops zero-width bands, bands whose position is outside their own edges,
/// and edges beyond the trace. Returns the surviving `(position, edges)`
/// pairs in their original order.
pub fn validate_bands(
    trace_len: usize,
    positions: &[usize],
    edges: &[(usize, usize)],
) -> Vec<(usize, (usize, usize))> {
    let valid: Vec<(usize, (usize, usize))> = positions
        .iter()
        .zip(edges.iter())
        .filter(|&(&position, &(left, right))| {
            left < right && left <= position && position <= right && right < trace_len
        })
        .map(|(&position, &edges)| (position, edges))
        .collect();

    if valid.len() < positions.len() {
        log::debug!(
            "Discarded {} of {} bands with degenerate edges",
            positions.len() - valid.len(),
            positions.len()
        );
    }

    valid
}

/// Prominence of a band restricted to its edge window
///
/// Returns `None` when the window yields no positive, finite prominence.
pub fn windowed_prominence(
    trace: &[f64],
    position: usize,
    left: usize,
    right: usize,
) -> Option<f64> {
    if left > position || position > right || right >= trace.len() {
        return None;
    }

    let apex = trace[position];
    let left_min = trace[left..=position].iter().copied().fold(apex, f64::min);
    let right_min = trace[position..=right].iter().copied().fold(apex, f64::min);
    let prominence = apex - left_min.max(right_min);

    if prominence.is_finite() && prominence > 0.0 {
        Some(prominence)
    } else {
        None
    }
}

/// Full detection pipeline: find, bound, validate and measure bands
///
/// # Arguments
///
/// * `trace` - Normalized trace in [0, 1] (use the inverted trace for dips)
/// * `tolerance` - Minimum prominence as a percentage of the trace range
///
/// # Returns
///
/// Validated bands sorted by position
pub fn detect_bands(trace: &[f64], tolerance: f64) -> Vec<Band> {
    let candidates = find_bands(trace, tolerance);
    let positions: Vec<usize> = candidates.iter().map(|&(position, _)| position).collect();
    let edges = band_edges(trace, &positions, tolerance);

    let bands: Vec<Band> = validate_bands(trace.len(), &positions, &edges)
        .into_iter()
        .filter_map(|(position, (left_edge, right_edge))| {
            windowed_prominence(trace, position, left_edge, right_edge).map(|prominence| Band {
                position,
                left_edge,
                right_edge,
                prominence,
            })
        })
        .collect();

    log::debug!("{} of {} bands kept after validation", bands.len(), candidates.len());

    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gaussian(n: usize, center: f64, width: f64, amplitude: f64) -> Vec<f64> {
        (0..n)
            .map(|i| amplitude * (-((i as f64 - center).powi(2)) / (2.0 * width * width)).exp())
            .collect()
    }

    #[test]
    fn test_local_maxima_basic() {
        let trace = vec![0.0, 0.5, 1.0, 0.7, 0.3, 0.9, 0.2];
        assert_eq!(local_maxima(&trace), vec![2, 5]);
    }

    #[test]
    fn test_local_maxima_plateau_midpoint() {
        let trace = vec![0.0, 1.0, 1.0, 1.0, 0.0];
        assert_eq!(local_maxima(&trace), vec![2]);
    }

    #[test]
    fn test_local_maxima_ignores_edges() {
        // Maxima touching the trace ends are not bands
        assert!(local_maxima(&[1.0, 0.5, 0.0]).is_empty());
        assert!(local_maxima(&[0.0, 0.5, 1.0]).is_empty());
        assert!(local_maxima(&[0.0, 1.0, 1.0]).is_empty());
        assert!(local_maxima(&[0.0, 1.0]).is_empty());
    }

    #[test]
    fn test_detection_prominence() {
        let trace = vec![0.0, 0.2, 1.0, 0.3, 0.1, 0.4, 0.0];
        assert!((detection_prominence(&trace, 2) - 1.0).abs() < 1e-12);
        // Second peak: left valley 0.1 (stops at 1.0), right valley 0.0
        assert!((detection_prominence(&trace, 5) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_find_bands_tolerance_filters() {
        let trace = vec![0.0, 0.2, 1.0, 0.3, 0.1, 0.14, 0.0];
        // Second bump stands only 0.04 above its left valley
        let bands = find_bands(&trace, 5.0);
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].0, 2);

        let all = find_bands(&trace, 0.0);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_find_bands_sorted_by_position() {
        let trace = vec![0.0, 0.6, 0.0, 1.0, 0.0, 0.8, 0.0];
        let bands = find_bands(&trace, 5.0);
        let positions: Vec<usize> = bands.iter().map(|b| b.0).collect();
        assert_eq!(positions, vec![1, 3, 5]);
    }

    #[test]
    fn test_band_edges_stop_at_neighbour() {
        let trace = vec![0.0, 0.2, 1.0, 0.3, 0.1, 0.4, 0.0];
        let edges = band_edges(&trace, &[2, 5], 5.0);
        assert_eq!(edges[0], (0, 4));
        assert_eq!(edges[1], (4, 6));
    }

    #[test]
    fn test_band_edges_tolerate_small_ripples() {
        // A 0.02 ripple on the right flank is smaller than the 5% tolerance
        let trace = vec![0.0, 1.0, 0.5, 0.3, 0.32, 0.1, 0.6, 0.0];
        let edges = band_edges(&trace, &[1], 5.0);
        assert_eq!(edges[0], (0, 5));
    }

    #[test]
    fn test_validate_bands_drops_degenerate() {
        let positions = vec![2, 5, 7];
        let edges = vec![(0, 4), (5, 5), (8, 9)];
        let valid = validate_bands(10, &positions, &edges);
        assert_eq!(valid, vec![(2, (0, 4))]);
    }

    #[test]
    fn test_validate_bands_drops_out_of_bounds() {
        let valid = validate_bands(5, &[2], &[(0, 7)]);
        assert!(valid.is_empty());
    }

    #[test]
    fn test_windowed_prominence() {
        let trace = vec![0.1, 0.2, 1.0, 0.3, 0.0];
        let prominence = windowed_prominence(&trace, 2, 0, 4).unwrap();
        assert!((prominence - 0.9).abs() < 1e-12);

        // Flat window has no prominence
        assert!(windowed_prominence(&[0.5, 0.5, 0.5], 1, 0, 2).is_none());
    }

    #[test]
    fn test_detect_bands_gaussian() {
        let trace = gaussian(200, 100.0, 10.0, 1.0);
        let bands = detect_bands(&trace, 5.0);

        assert_eq!(bands.len(), 1);
        let band = bands[0];
        assert_eq!(band.position, 100);
        assert!(band.left_edge < 80, "left edge {}", band.left_edge);
        assert!(band.right_edge > 120, "right edge {}", band.right_edge);
        assert!(band.prominence > 0.99);
    }

    #[test]
    fn test_detect_bands_inverted_gaussian_has_no_interior_max() {
        // The inverted single peak rises monotonically towards both ends
        let trace: Vec<f64> = gaussian(200, 100.0, 10.0, 1.0)
            .into_iter()
            .map(|x| 1.0 - x)
            .collect();
        assert!(detect_bands(&trace, 5.0).is_empty());
    }

    #[test]
    fn test_detect_bands_two_peaks() {
        let a = gaussian(300, 80.0, 8.0, 1.0);
        let b = gaussian(300, 200.0, 12.0, 0.6);
        let trace: Vec<f64> = a.iter().zip(b.iter()).map(|(x, y)| x + y).collect();
        let bands = detect_bands(&trace, 5.0);

        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0].position, 80);
        assert_eq!(bands[1].position, 200);
        for band in &bands {
            assert!(band.left_edge < band.position && band.position < band.right_edge);
        }
        // The valley between the two peaks bounds both bands
        assert!(bands[0].right_edge <= bands[1].left_edge + 1);
    }

    #[test]
    fn test_detect_bands_flat_trace() {
        let trace: Vec<f64> = (0..50).map(|i| i as f64 / 49.0).collect();
        assert!(detect_bands(&trace, 5.0).is_empty());
    }
}
