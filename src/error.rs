//! Error types for the scoring pipeline

use std::fmt;

/// Errors that can occur while scoring a baseline correction
///
/// Malformed input triples (empty or length-mismatched arrays) are *not*
/// reported through this type: they short-circuit to the `-1` sentinel
/// (see [`crate::INVALID_INPUT_SCORE`]).
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreError {
    /// Invalid configuration or sample values
    InvalidInput(String),

    /// Signal without any dynamic range (max == min)
    DegenerateSignal(String),

    /// Numerical error (division by zero, singular system, etc.)
    NumericalError(String),
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ScoreError::DegenerateSignal(msg) => write!(f, "Degenerate signal: {}", msg),
            ScoreError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for ScoreError {}
