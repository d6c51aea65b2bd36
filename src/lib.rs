//! fornav: A Fast Elliptical Weighted Averaging (EWA) Swath-to-Grid Resampler
//!
//! This library converts satellite-instrument measurements, already mapped
//! pixel-by-pixel into fractional (column, row) coordinates of a target grid,
//! into final per-cell grid values. Each swath pixel projects an elliptical
//! footprint of influence onto the output grid; contributions are combined by
//! distance-decay weighted averaging, or by highest-weight selection for
//! categorical data.
//!
//! The forward lat/lon projection step, file format readers/writers and grid
//! configuration handling are external collaborators; this crate is the
//! resampling kernel only.

pub mod core;
pub mod types;

#[cfg(feature = "python")]
mod python;

// Re-export main types and functions for easier access
pub use crate::core::{
    resample_jobs, AccumulationGrid, EwaResampler, ResampleJob, WeightParameters, WeightTable,
};
pub use types::{FornavError, FornavResult, EPSILON};
