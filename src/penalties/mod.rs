//! Penalty modules
//!
//! Each penalizer is a pure function over the normalized signal, the baseline
//! and the detected bands, returning its scalar penalty together with the
//! diagnostic data that explains it:
//! - Single-band apex tests (peaks and dips)
//! - Band-region profile tests (peaks and dips)
//! - Intensity outside bands
//! - Area under curve between peaks
//! - Multi-scale mean dips ratio

pub mod auc;
pub mod band_region;
pub mod intensity;
pub mod mean_ratio;
pub mod single_band;
