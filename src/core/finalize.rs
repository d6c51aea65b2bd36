use crate::core::accumulate::AccumulationGrid;
use crate::core::dtype::GridValue;
use crate::core::weight::WeightTable;
use ndarray::ArrayViewMut2;

/// Convert one channel's accumulated (sum, weight) pairs into final output
/// values.
///
/// Cells whose accumulated weight falls below the effective sum_min threshold
/// get the output fill value, as do cells whose value resolves to NaN (a
/// winning fill contribution in maximum-weight mode). Otherwise the value is
/// the weighted average `sum / weight`, or the raw winning value in
/// maximum-weight mode, converted with the output kind's rounding and
/// clamping rules.
///
/// Returns the number of cells set to the fill value.
pub fn finalize_grid<O: GridValue>(
    grid: &AccumulationGrid,
    output: &mut ArrayViewMut2<O>,
    output_fill: O,
    table: &WeightTable,
) -> usize {
    let (rows, cols) = grid.dim();
    let sum_min = table.effective_sum_min();
    let mut fill_count = 0usize;

    for row in 0..rows {
        for col in 0..cols {
            let weight = grid.weight[(row, col)];
            output[(row, col)] = if weight < sum_min {
                fill_count += 1;
                output_fill
            } else {
                let value = if table.maximum_weight_mode {
                    grid.sum[(row, col)]
                } else {
                    grid.sum[(row, col)] / weight
                };
                if value.is_nan() {
                    fill_count += 1;
                    output_fill
                } else {
                    O::from_accum(value)
                }
            };
        }
    }

    fill_count
}
