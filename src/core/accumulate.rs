use crate::core::dtype::{SwathCoord, SwathValue};
use crate::core::ellipse::EllipseParams;
use crate::core::weight::WeightTable;
use ndarray::{Array2, ArrayView2};

/// Per-channel accumulation buffers for one resampling invocation.
///
/// `sum` holds the weighted value accumulation (or, in maximum-weight mode,
/// the currently-winning raw value); `weight` holds the accumulated weight
/// (or the currently-winning weight). Zero-initialized, exclusively owned by
/// one invocation, dropped after finalization.
pub struct AccumulationGrid {
    pub sum: Array2<f64>,
    pub weight: Array2<f64>,
}

impl AccumulationGrid {
    pub fn new(grid_rows: usize, grid_cols: usize) -> Self {
        Self {
            sum: Array2::zeros((grid_rows, grid_cols)),
            weight: Array2::zeros((grid_rows, grid_cols)),
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.sum.dim()
    }
}

/// Splat every pixel of one scan block into the accumulation grids.
///
/// `u`/`v` are the scan's fractional grid coordinates, `channels` the scan's
/// slice of each input channel (all rows_per_scan x swath_cols). A pixel with
/// `u < 0` or `v < 0` is unmapped and skipped. For mapped pixels the
/// elliptical footprint's clamped bounding box is walked and the quadratic
/// form is evaluated incrementally (first and second finite differences per
/// grid column step).
///
/// Fill detection is per channel: one channel's fill value at a pixel does
/// not suppress another channel's valid value at the same pixel.
///
/// Returns true if at least one pixel produced a non-empty clamped box
/// overlapping the grid.
pub fn accumulate_scan<C: SwathCoord, T: SwathValue>(
    u: &ArrayView2<C>,
    v: &ArrayView2<C>,
    channels: &[ArrayView2<T>],
    input_fill: T,
    params: &[EllipseParams],
    table: &WeightTable,
    grids: &mut [AccumulationGrid],
) -> bool {
    let (scan_rows, scan_cols) = u.dim();
    let (grid_rows, grid_cols) = grids[0].dim();
    let max_mode = table.maximum_weight_mode;
    let mut got_point = false;

    for row in 0..scan_rows {
        for col in 0..scan_cols {
            let u0: f64 = u[[row, col]].as_();
            let v0: f64 = v[[row, col]].as_();
            if u0 < 0.0 || v0 < 0.0 {
                continue; // unmapped sentinel
            }

            let ewap = &params[col];
            let mut iu1 = (u0 - ewap.u_del).floor() as isize;
            let mut iu2 = (u0 + ewap.u_del).floor() as isize;
            let mut iv1 = (v0 - ewap.v_del).floor() as isize;
            let mut iv2 = (v0 + ewap.v_del).floor() as isize;
            if iu1 < 0 {
                iu1 = 0;
            }
            if iu2 >= grid_cols as isize {
                iu2 = grid_cols as isize - 1;
            }
            if iv1 < 0 {
                iv1 = 0;
            }
            if iv2 >= grid_rows as isize {
                iv2 = grid_rows as isize - 1;
            }
            if iu1 > iu2 || iv1 > iv2 {
                continue;
            }
            got_point = true;

            let ddq = 2.0 * ewap.a;
            let u_off = iu1 as f64 - u0;
            let a2up1 = ewap.a * (2.0 * u_off + 1.0);
            let bu = ewap.b * u_off;
            let au2 = ewap.a * u_off * u_off;

            for iv in iv1..=iv2 {
                let v_off = iv as f64 - v0;
                let mut dq = a2up1 + ewap.b * v_off;
                let mut q = (ewap.c * v_off + bu) * v_off + au2;
                for iu in iu1..=iu2 {
                    if q >= 0.0 && q < ewap.f {
                        let weight = table.lookup(q);
                        let cell = (iv as usize, iu as usize);
                        for (chan, grid) in channels.iter().zip(grids.iter_mut()) {
                            let val = chan[[row, col]];
                            if max_mode {
                                // The cell keeps the single highest-weight
                                // value seen so far, never a blend
                                if weight > grid.weight[cell] {
                                    grid.weight[cell] = weight;
                                    grid.sum[cell] = if val.is_fill(input_fill) {
                                        f64::NAN
                                    } else {
                                        val.as_accum()
                                    };
                                }
                            } else if !val.is_fill(input_fill) {
                                grid.weight[cell] += weight;
                                grid.sum[cell] += val.as_accum() * weight;
                            }
                        }
                    }
                    q += dq;
                    dq += ddq;
                }
            }
        }
    }

    got_point
}
