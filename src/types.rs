use ndarray::Array2;

/// Fractional grid coordinates produced by the forward projection step
/// (one array for columns, one for rows), swath-shaped
pub type CoordArray<C> = Array2<C>;

/// A single swath channel (rows x cols, scan-line order)
pub type SwathArray<T> = Array2<T>;

/// A single output grid channel (grid_rows x grid_cols)
pub type GridArray<O> = Array2<O>;

/// Numerical epsilon for degenerate-geometry clamping and the weight-sum
/// floor
pub const EPSILON: f64 = 1e-8;

/// Error types for swath resampling
#[derive(Debug, thiserror::Error)]
pub enum FornavError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Unsupported dtype combination: {0}")]
    UnsupportedType(String),

    #[error("No input pixel maps inside the target grid: {0}")]
    NoCoverage(String),
}

/// Result type for resampling operations
pub type FornavResult<T> = Result<T, FornavError>;
