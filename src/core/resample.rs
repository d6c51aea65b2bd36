use crate::core::accumulate::{accumulate_scan, AccumulationGrid};
use crate::core::dtype::{GridValue, SwathCoord, SwathValue};
use crate::core::ellipse::compute_ewa_parameters;
use crate::core::finalize::finalize_grid;
use crate::core::weight::{WeightParameters, WeightTable};
use crate::types::{CoordArray, FornavError, FornavResult, GridArray, SwathArray};
use ndarray::{s, ArrayView2, ArrayViewMut2};
use rayon::prelude::*;

/// EWA forward-navigation resampler.
///
/// One `resample` call processes one swath against one grid for one batch of
/// channels sharing a dtype, to completion, single-threaded and without I/O.
/// All mutable state lives inside the call; independent calls may run
/// concurrently (see [`resample_jobs`]).
pub struct EwaResampler {
    params: WeightParameters,
}

impl EwaResampler {
    /// Create a resampler with custom weighting parameters
    pub fn new(params: WeightParameters) -> Self {
        Self { params }
    }

    /// Create a resampler with the standard weighting parameters
    pub fn standard() -> Self {
        Self::new(WeightParameters::default())
    }

    /// Resample a swath onto a grid.
    ///
    /// `cols`/`rows` hold each swath pixel's fractional grid column and row
    /// (negative = unmapped, skipped). `channels` are the swath-shaped input
    /// arrays; `outputs` the preallocated grid-shaped output arrays, written
    /// in place during finalization. Row-major `(row, col)` layout throughout.
    ///
    /// Returns the total count of fill-valued output cells across all
    /// channels (zero if every cell received a contribution).
    ///
    /// # Errors
    /// * `Configuration` for invalid weighting parameters
    /// * `ShapeMismatch` for channel-count or dimension disagreements
    /// * `NoCoverage` if no swath pixel maps inside the grid at all; nothing
    ///   is written in that case
    pub fn resample<C, T, O>(
        &self,
        cols: &ArrayView2<C>,
        rows: &ArrayView2<C>,
        rows_per_scan: usize,
        channels: &[ArrayView2<T>],
        input_fill: T,
        outputs: &mut [ArrayViewMut2<O>],
        output_fill: O,
    ) -> FornavResult<usize>
    where
        C: SwathCoord,
        T: SwathValue,
        O: GridValue,
    {
        let table = WeightTable::new(&self.params)?;

        let (swath_rows, swath_cols) = cols.dim();
        if rows.dim() != (swath_rows, swath_cols) {
            return Err(FornavError::ShapeMismatch(format!(
                "column array is {:?} but row array is {:?}",
                cols.dim(),
                rows.dim()
            )));
        }
        if channels.is_empty() {
            return Err(FornavError::ShapeMismatch(
                "at least one input channel is required".to_string(),
            ));
        }
        if channels.len() != outputs.len() {
            return Err(FornavError::ShapeMismatch(format!(
                "{} input channels but {} output arrays",
                channels.len(),
                outputs.len()
            )));
        }
        for (index, channel) in channels.iter().enumerate() {
            if channel.dim() != (swath_rows, swath_cols) {
                return Err(FornavError::ShapeMismatch(format!(
                    "channel {} is {:?} but the swath is {:?}",
                    index,
                    channel.dim(),
                    (swath_rows, swath_cols)
                )));
            }
        }
        let (grid_rows, grid_cols) = outputs[0].dim();
        if grid_rows == 0 || grid_cols == 0 {
            return Err(FornavError::ShapeMismatch(
                "output grid is empty".to_string(),
            ));
        }
        for (index, output) in outputs.iter().enumerate() {
            if output.dim() != (grid_rows, grid_cols) {
                return Err(FornavError::ShapeMismatch(format!(
                    "output {} is {:?} but output 0 is {:?}",
                    index,
                    output.dim(),
                    (grid_rows, grid_cols)
                )));
            }
        }
        // The vertical difference stencil divides by rows_per_scan - 1, and
        // the horizontal stencil needs a neighbor on each side
        if rows_per_scan < 2 {
            return Err(FornavError::ShapeMismatch(format!(
                "rows_per_scan must be at least 2, got {}",
                rows_per_scan
            )));
        }
        if swath_rows == 0 || swath_rows % rows_per_scan != 0 {
            return Err(FornavError::ShapeMismatch(format!(
                "rows_per_scan {} does not evenly divide {} swath rows",
                rows_per_scan, swath_rows
            )));
        }
        if swath_cols < 3 {
            return Err(FornavError::ShapeMismatch(format!(
                "swath must have at least 3 columns, got {}",
                swath_cols
            )));
        }

        let num_scans = swath_rows / rows_per_scan;
        log::info!(
            "Resampling {}x{} swath onto {}x{} grid: {} channel(s), {} scan(s), {}",
            swath_rows,
            swath_cols,
            grid_rows,
            grid_cols,
            channels.len(),
            num_scans,
            if table.maximum_weight_mode {
                "maximum-weight mode"
            } else {
                "weighted-average mode"
            }
        );

        let mut grids: Vec<AccumulationGrid> = (0..channels.len())
            .map(|_| AccumulationGrid::new(grid_rows, grid_cols))
            .collect();
        let mut got_point = false;

        for scan in 0..num_scans {
            let first_row = scan * rows_per_scan;
            let last_row = first_row + rows_per_scan;
            let u = cols.slice(s![first_row..last_row, ..]);
            let v = rows.slice(s![first_row..last_row, ..]);

            let ewap = compute_ewa_parameters(&u, &v, &table);
            let scan_channels: Vec<ArrayView2<T>> = channels
                .iter()
                .map(|channel| channel.slice(s![first_row..last_row, ..]))
                .collect();

            if accumulate_scan(
                &u,
                &v,
                &scan_channels,
                input_fill,
                &ewap,
                &table,
                &mut grids,
            ) {
                got_point = true;
            }

            if scan % (num_scans / 10).max(1) == 0 {
                log::debug!("Accumulated scan {}/{}", scan + 1, num_scans);
            }
        }

        if !got_point {
            return Err(FornavError::NoCoverage(format!(
                "no pixel of the {}x{} swath produced a footprint on the grid",
                swath_rows, swath_cols
            )));
        }

        let mut fill_total = 0usize;
        for (grid, output) in grids.iter().zip(outputs.iter_mut()) {
            fill_total += finalize_grid(grid, output, output_fill, &table);
        }

        let grid_size = grid_rows * grid_cols * channels.len();
        let coverage = ((grid_size - fill_total) as f64 / grid_size as f64) * 100.0;
        log::info!(
            "Resampling complete: {}/{} cells filled ({:.1}% coverage)",
            grid_size - fill_total,
            grid_size,
            coverage
        );

        Ok(fill_total)
    }

    /// Resample one owned job; convenience wrapper used by [`resample_jobs`]
    pub fn resample_job<C, T, O>(&self, job: &mut ResampleJob<C, T, O>) -> FornavResult<usize>
    where
        C: SwathCoord,
        T: SwathValue,
        O: GridValue,
    {
        let channels: Vec<ArrayView2<T>> = job.channels.iter().map(|c| c.view()).collect();
        let mut outputs: Vec<ArrayViewMut2<O>> =
            job.outputs.iter_mut().map(|o| o.view_mut()).collect();
        self.resample(
            &job.cols.view(),
            &job.rows.view(),
            job.rows_per_scan,
            &channels,
            job.input_fill,
            &mut outputs,
            job.output_fill,
        )
    }
}

impl Default for EwaResampler {
    fn default() -> Self {
        Self::standard()
    }
}

/// One independent resampling job: a swath, its navigation, and its owned
/// output buffers. Jobs share no mutable state, so they can run concurrently.
pub struct ResampleJob<C: SwathCoord, T: SwathValue, O: GridValue> {
    pub cols: CoordArray<C>,
    pub rows: CoordArray<C>,
    pub rows_per_scan: usize,
    pub channels: Vec<SwathArray<T>>,
    pub input_fill: T,
    pub outputs: Vec<GridArray<O>>,
    pub output_fill: O,
}

/// Run independent resampling jobs across the rayon worker pool.
///
/// Each job is processed to completion by the single-threaded kernel; only
/// whole jobs run in parallel. Per-job results are returned in order, so a
/// coverage failure on one grid does not abort the others.
pub fn resample_jobs<C, T, O>(
    resampler: &EwaResampler,
    jobs: &mut [ResampleJob<C, T, O>],
) -> Vec<FornavResult<usize>>
where
    C: SwathCoord,
    T: SwathValue,
    O: GridValue,
{
    log::info!("Resampling {} job(s) in parallel", jobs.len());
    jobs.par_iter_mut()
        .map(|job| resampler.resample_job(job))
        .collect()
}
