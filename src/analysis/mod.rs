//! Score aggregation modules
//!
//! Combines the penalizer outputs into the final result:
//! - Result types and the penalty breakdown table
//! - Metadata
//! - Optional diagnostic trace

pub mod metadata;
pub mod result;
pub mod trace;
