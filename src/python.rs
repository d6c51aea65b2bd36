//! Python bindings for the EWA resampler.
//!
//! The numpy-facing entry point performs the runtime dtype dispatch: the
//! supported (coordinate x input x output) combinations are enumerated and
//! anything else surfaces as a ValueError. Built with maturin when the
//! `python` feature is enabled.

use crate::core::{EwaResampler, GridValue, SwathCoord, SwathValue, WeightParameters};
use crate::types::FornavError;
use ndarray::{ArrayView2, ArrayViewMut2};
use numpy::{Element, PyReadonlyArray2, PyReadwriteArray2};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

fn map_err(err: FornavError) -> PyErr {
    match err {
        // Coverage failures may legitimately occur for swaths that do not
        // intersect the requested grid; keep them distinguishable from
        // caller mistakes
        FornavError::NoCoverage(_) => PyRuntimeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

#[allow(clippy::too_many_arguments)]
fn run<C, T, O>(
    resampler: &EwaResampler,
    cols: &PyReadonlyArray2<'_, C>,
    rows: &PyReadonlyArray2<'_, C>,
    rows_per_scan: usize,
    inputs: &[PyReadonlyArray2<'_, T>],
    outputs: &mut [PyReadwriteArray2<'_, O>],
    input_fill: f64,
    output_fill: f64,
) -> PyResult<usize>
where
    C: SwathCoord + Element,
    T: SwathValue + Element,
    O: GridValue + Element,
{
    let input_fill = num_traits::cast::<f64, T>(input_fill)
        .ok_or_else(|| PyValueError::new_err("input fill value out of range for input dtype"))?;
    let output_fill = num_traits::cast::<f64, O>(output_fill)
        .ok_or_else(|| PyValueError::new_err("output fill value out of range for output dtype"))?;

    let cols_view = cols.as_array();
    let rows_view = rows.as_array();
    let channels: Vec<ArrayView2<'_, T>> = inputs.iter().map(|a| a.as_array()).collect();
    let mut grids: Vec<ArrayViewMut2<'_, O>> =
        outputs.iter_mut().map(|a| a.as_array_mut()).collect();

    resampler
        .resample(
            &cols_view,
            &rows_view,
            rows_per_scan,
            &channels,
            input_fill,
            &mut grids,
            output_fill,
        )
        .map_err(map_err)
}

#[allow(clippy::too_many_arguments)]
fn dispatch_channels<C>(
    resampler: &EwaResampler,
    cols: &PyReadonlyArray2<'_, C>,
    rows: &PyReadonlyArray2<'_, C>,
    rows_per_scan: usize,
    inputs: &PyAny,
    outputs: &PyAny,
    input_fill: f64,
    output_fill: f64,
) -> PyResult<usize>
where
    C: SwathCoord + Element,
{
    macro_rules! try_pair {
        ($t:ty, $o:ty) => {
            if let (Ok(ins), Ok(mut outs)) = (
                inputs.extract::<Vec<PyReadonlyArray2<'_, $t>>>(),
                outputs.extract::<Vec<PyReadwriteArray2<'_, $o>>>(),
            ) {
                return run::<C, $t, $o>(
                    resampler,
                    cols,
                    rows,
                    rows_per_scan,
                    &ins,
                    &mut outs,
                    input_fill,
                    output_fill,
                );
            }
        };
    }

    try_pair!(f32, f32);
    try_pair!(f32, f64);
    try_pair!(f32, u8);
    try_pair!(f32, i8);
    try_pair!(f32, u16);
    try_pair!(f32, i16);
    try_pair!(f32, u32);
    try_pair!(f32, i32);
    try_pair!(f64, f64);
    try_pair!(f64, f32);
    try_pair!(f64, u8);
    try_pair!(f64, i8);
    try_pair!(f64, u16);
    try_pair!(f64, i16);
    try_pair!(f64, u32);
    try_pair!(f64, i32);
    try_pair!(i8, i8);
    try_pair!(i8, i16);
    try_pair!(i8, i32);
    try_pair!(i8, f32);
    try_pair!(i8, f64);

    Err(map_err(FornavError::UnsupportedType(
        "input channels must all be float32, float64 or int8; outputs must all be one of \
         float32, float64, int8, uint8, int16, uint16, int32, uint32"
            .to_string(),
    )))
}

/// Resample swath channels onto a grid with Elliptical Weighted Averaging.
///
/// `cols`/`rows` are the fractional grid coordinates per swath pixel
/// (negative = unmapped); `inputs` is a sequence of swath-shaped arrays
/// sharing one dtype and `outputs` a matching sequence of preallocated
/// grid-shaped arrays sharing one dtype. Returns the total number of
/// fill-valued output cells across all channels.
#[pyfunction]
#[allow(clippy::too_many_arguments)]
#[pyo3(signature = (
    cols, rows, rows_per_scan, inputs, outputs, input_fill, output_fill,
    weight_count = 10_000, weight_min = 0.01, weight_distance_max = 1.0,
    weight_delta_max = 10.0, weight_sum_min = 0.01, maximum_weight_mode = false
))]
fn fornav(
    cols: &PyAny,
    rows: &PyAny,
    rows_per_scan: usize,
    inputs: &PyAny,
    outputs: &PyAny,
    input_fill: f64,
    output_fill: f64,
    weight_count: usize,
    weight_min: f64,
    weight_distance_max: f64,
    weight_delta_max: f64,
    weight_sum_min: f64,
    maximum_weight_mode: bool,
) -> PyResult<usize> {
    let resampler = EwaResampler::new(WeightParameters {
        count: weight_count,
        min: weight_min,
        distance_max: weight_distance_max,
        delta_max: weight_delta_max,
        sum_min: weight_sum_min,
        maximum_weight_mode,
    });

    if let (Ok(c), Ok(r)) = (
        cols.extract::<PyReadonlyArray2<'_, f32>>(),
        rows.extract::<PyReadonlyArray2<'_, f32>>(),
    ) {
        dispatch_channels(
            &resampler,
            &c,
            &r,
            rows_per_scan,
            inputs,
            outputs,
            input_fill,
            output_fill,
        )
    } else if let (Ok(c), Ok(r)) = (
        cols.extract::<PyReadonlyArray2<'_, f64>>(),
        rows.extract::<PyReadonlyArray2<'_, f64>>(),
    ) {
        dispatch_channels(
            &resampler,
            &c,
            &r,
            rows_per_scan,
            inputs,
            outputs,
            input_fill,
            output_fill,
        )
    } else {
        Err(map_err(FornavError::UnsupportedType(
            "column/row arrays must both be float32 or both float64".to_string(),
        )))
    }
}

/// Python module definition
#[pymodule]
fn _core(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(fornav, m)?)?;
    Ok(())
}
