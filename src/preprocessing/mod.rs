//! Signal preprocessing modules
//!
//! Utilities shared by every scoring stage:
//! - Min-max normalization (self and joint)
//! - Savitzky-Golay smoothing

pub mod normalization;
pub mod smoothing;
