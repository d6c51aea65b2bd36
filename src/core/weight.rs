use crate::types::{FornavError, FornavResult, EPSILON};
use serde::{Deserialize, Serialize};

/// Weighting parameters for EWA resampling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightParameters {
    /// Number of quantized entries in the weight table
    pub count: usize,
    /// Weight at the maximum distance (table tail value)
    pub min: f64,
    /// Footprint radius, in grid cells, at which the weight reaches `min`
    pub distance_max: f64,
    /// Upper bound on the footprint half-width in either grid direction
    pub delta_max: f64,
    /// Minimum accumulated weight for a grid cell to receive a value
    pub sum_min: f64,
    /// Keep the single highest-weight value per cell instead of averaging
    /// (categorical data)
    pub maximum_weight_mode: bool,
}

impl Default for WeightParameters {
    fn default() -> Self {
        Self {
            count: 10_000,             // Quantization of the distance range
            min: 0.01,                 // Weight at distance_max
            distance_max: 1.0,         // One grid cell
            delta_max: 10.0,           // Footprint half-width cap
            sum_min: 0.01,             // Same as `min`
            maximum_weight_mode: false,
        }
    }
}

/// Quantized, monotonically-decaying weight lookup table.
///
/// Maps a raw squared distance `q` in grid space to a contribution weight in
/// (0, 1]. Built once per resampling invocation and passed down explicitly;
/// never mutated after construction.
#[derive(Debug, Clone)]
pub struct WeightTable {
    /// Number of table entries
    pub count: usize,
    /// Footprint radius in grid cells, copied from the parameters
    pub distance_max: f64,
    /// Maximum squared distance (`distance_max`^2); quadratic-form cutoff
    pub qmax: f64,
    /// Converts a squared distance into a table index
    pub qfactor: f64,
    /// Footprint half-width cap, copied from the parameters
    pub delta_max: f64,
    /// Effective weight-sum threshold for finalization
    pub sum_min: f64,
    /// Compositing policy, copied from the parameters
    pub maximum_weight_mode: bool,
    table: Vec<f64>,
}

impl WeightTable {
    /// Build the table from validated parameters.
    ///
    /// `table[i] = exp(-alpha * qmax * i / (count - 1))` with
    /// `alpha = -ln(min) / qmax`, so the table decays from 1.0 at zero
    /// distance to `min` at `distance_max`.
    pub fn new(params: &WeightParameters) -> FornavResult<Self> {
        if params.count < 2 {
            return Err(FornavError::Configuration(format!(
                "weight count must be at least 2, got {}",
                params.count
            )));
        }
        if params.min <= 0.0 || params.min >= 1.0 {
            return Err(FornavError::Configuration(format!(
                "weight min must be in (0, 1), got {}",
                params.min
            )));
        }
        if params.distance_max <= 0.0 {
            return Err(FornavError::Configuration(format!(
                "weight distance_max must be positive, got {}",
                params.distance_max
            )));
        }
        if params.delta_max <= 0.0 {
            return Err(FornavError::Configuration(format!(
                "weight delta_max must be positive, got {}",
                params.delta_max
            )));
        }
        if params.sum_min < 0.0 {
            return Err(FornavError::Configuration(format!(
                "weight sum_min must be non-negative, got {}",
                params.sum_min
            )));
        }

        let qmax = params.distance_max * params.distance_max;
        let alpha = -params.min.ln() / qmax;
        let qfactor = params.count as f64 / qmax;

        let denom = (params.count - 1) as f64;
        let table = (0..params.count)
            .map(|i| (-alpha * qmax * i as f64 / denom).exp())
            .collect();

        Ok(Self {
            count: params.count,
            distance_max: params.distance_max,
            qmax,
            qfactor,
            delta_max: params.delta_max,
            sum_min: params.sum_min,
            maximum_weight_mode: params.maximum_weight_mode,
            table,
        })
    }

    /// Look up the weight for a raw squared distance `q` (callers guarantee
    /// `q >= 0`); the quantized index is clamped to the table range
    #[inline]
    pub fn lookup(&self, q: f64) -> f64 {
        let mut index = (q * self.qfactor) as usize;
        if index >= self.count {
            index = self.count - 1;
        }
        self.table[index]
    }

    /// Finalization threshold: accumulated weights below this produce fill
    #[inline]
    pub fn effective_sum_min(&self) -> f64 {
        self.sum_min.max(EPSILON)
    }
}
