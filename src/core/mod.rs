//! Core EWA resampling modules

pub mod accumulate;
pub mod dtype;
pub mod ellipse;
pub mod finalize;
pub mod resample;
pub mod weight;

// Re-export main types
pub use accumulate::{accumulate_scan, AccumulationGrid};
pub use dtype::{GridValue, SwathCoord, SwathValue};
pub use ellipse::{compute_ewa_parameters, EllipseParams};
pub use finalize::finalize_grid;
pub use resample::{resample_jobs, EwaResampler, ResampleJob};
pub use weight::{WeightParameters, WeightTable};
