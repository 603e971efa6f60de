//! Blend-ratio optimisation.
//!
//! This module provides:
//! - `BlendScanConfig`: grid step and tie tolerance of the scan
//! - `optimise_blend`: deterministic scan over sodium fractions
//! - `MAX_GRID_POINTS`: upper bound on the scanned grid
//! - `BlendOptimum` / `BlendPoint`: the winning fraction and the full curve

mod blend_scan;

pub use blend_scan::{
    optimise_blend, sodium_fractions, BlendOptimum, BlendPoint, BlendScanConfig, MAX_GRID_POINTS,
};
