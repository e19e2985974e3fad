//! Savitzky-Golay smoothing
//!
//! Local least-squares polynomial smoothing. For every sample a polynomial of
//! the requested degree is fitted over a window of `window` samples and
//! evaluated exactly at that sample. Windows start `window / 2` samples
//! before it, so an even window holds one more sample before the evaluation
//! point than after it (scipy's even-window coefficients instead sit half a
//! sample off). Near the signal ends the first/last full window is refitted
//! and evaluated at the edge samples, as scipy's `interp` mode does, so the
//! output has the same length as the input.
//!
//! Because the fitted value is a fixed linear combination of the window
//! samples, weights are computed once per evaluation offset and reused.

use crate::error::ScoreError;

/// Smooth a signal with a Savitzky-Golay filter
///
/// # Arguments
///
/// * `signal` - Input samples
/// * `window` - Window length in samples (even lengths are accepted)
/// * `degree` - Polynomial degree, must be smaller than `window`
///
/// # Errors
///
/// Returns `ScoreError::NumericalError` if `window <= degree` and
/// `ScoreError::InvalidInput` if the window is longer than the signal.
///
/// # Example
///
/// ```
/// use is_score::preprocessing::smoothing::savgol_filter;
///
/// // Polynomials up to the fitted degree pass through unchanged
/// let signal: Vec<f64> = (0..20).map(|i| (i as f64).powi(2)).collect();
/// let smoothed = savgol_filter(&signal, 8, 4)?;
/// assert!((smoothed[10] - 100.0).abs() < 1e-6);
/// # Ok::<(), is_score::ScoreError>(())
/// ```
pub fn savgol_filter(signal: &[f64], window: usize, degree: usize) -> Result<Vec<f64>, ScoreError> {
    if window <= degree {
        return Err(ScoreError::NumericalError(format!(
            "Window length {} must exceed polynomial degree {}",
            window, degree
        )));
    }
    if window > signal.len() {
        return Err(ScoreError::InvalidInput(format!(
            "Window length {} exceeds signal length {}",
            window,
            signal.len()
        )));
    }

    log::debug!(
        "Savitzky-Golay smoothing: {} samples, window={}, degree={}",
        signal.len(),
        window,
        degree
    );

    let n = signal.len();
    let half = window / 2;
    let mut weights_by_offset: Vec<Option<Vec<f64>>> = vec![None; window];
    let mut smoothed = Vec::with_capacity(n);

    for i in 0..n {
        let start = i.saturating_sub(half).min(n - window);
        let offset = i - start;

        if weights_by_offset[offset].is_none() {
            weights_by_offset[offset] = Some(fit_weights(window, degree, offset as f64)?);
        }
        let weights = weights_by_offset[offset]
            .as_deref()
            .ok_or_else(|| ScoreError::NumericalError("Missing smoothing weights".to_string()))?;

        let value: f64 = weights
            .iter()
            .zip(&signal[start..start + window])
            .map(|(w, x)| w * x)
            .sum();
        smoothed.push(value);
    }

    Ok(smoothed)
}

/// Weights `h` such that `h · y` is the least-squares polynomial fit of `y`
/// evaluated at window coordinate `position`
fn fit_weights(window: usize, degree: usize, position: f64) -> Result<Vec<f64>, ScoreError> {
    let terms = degree + 1;
    let scale = window as f64;

    // Design matrix rows in scaled, centred coordinates
    let design: Vec<Vec<f64>> = (0..window)
        .map(|j| {
            let x = (j as f64 - position) / scale;
            let mut row = Vec::with_capacity(terms);
            let mut power = 1.0;
            for _ in 0..terms {
                row.push(power);
                power *= x;
            }
            row
        })
        .collect();

    // Normal equations: (AᵀA) c = e0, the fit at x = 0 is the constant term
    let mut normal = vec![vec![0.0; terms]; terms];
    for row in &design {
        for a in 0..terms {
            for b in 0..terms {
                normal[a][b] += row[a] * row[b];
            }
        }
    }
    let mut rhs = vec![0.0; terms];
    rhs[0] = 1.0;

    let coefficients = solve_linear_system(normal, rhs)?;

    Ok(design
        .iter()
        .map(|row| row.iter().zip(&coefficients).map(|(a, c)| a * c).sum())
        .collect())
}

/// Gaussian elimination with partial pivoting
fn solve_linear_system(
    mut matrix: Vec<Vec<f64>>,
    mut rhs: Vec<f64>,
) -> Result<Vec<f64>, ScoreError> {
    let n = rhs.len();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&a, &b| {
                matrix[a][col]
                    .abs()
                    .partial_cmp(&matrix[b][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);

        if matrix[pivot_row][col].abs() < 1e-300 {
            return Err(ScoreError::NumericalError(
                "Singular system while fitting smoothing polynomial".to_string(),
            ));
        }

        matrix.swap(col, pivot_row);
        rhs.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = matrix[row][col] / matrix[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| matrix[row][k] * solution[k]).sum();
        solution[row] = (rhs[row] - tail) / matrix[row][row];
    }

    Ok(solution)
}
