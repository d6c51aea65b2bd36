use fornav::{resample_jobs, EwaResampler, FornavError, ResampleJob, WeightParameters};
use ndarray::Array2;

/// 4x4 swath whose 2x2 pixel blocks land on the 4 center cells of a 6x6
/// grid: pixel (r, c) maps to grid cell (2 + r/2, 2 + c/2), exactly on the
/// cell center.
fn center_block_swath() -> (Array2<f32>, Array2<f32>) {
    let u = Array2::from_shape_fn((4, 4), |(_, c)| (2 + c / 2) as f32);
    let v = Array2::from_shape_fn((4, 4), |(r, _)| (2 + r / 2) as f32);
    (u, v)
}

#[test]
fn test_constant_swath_fills_center_cells() {
    let _ = env_logger::builder().is_test(true).try_init();

    let (u, v) = center_block_swath();
    let data = Array2::from_elem((4, 4), 100.0f32);
    let mut out = Array2::<u8>::zeros((6, 6));

    let fill_count = EwaResampler::standard()
        .resample(
            &u.view(),
            &v.view(),
            4,
            &[data.view()],
            -999.0f32,
            &mut [out.view_mut()],
            0u8,
        )
        .expect("resampling failed");

    // The 4 center cells average to 100, the 32 border cells stay at fill
    assert_eq!(fill_count, 32);
    for row in 0..6 {
        for col in 0..6 {
            let expected = if (2..4).contains(&row) && (2..4).contains(&col) {
                100
            } else {
                0
            };
            assert_eq!(out[(row, col)], expected, "cell ({}, {})", row, col);
        }
    }
}

#[test]
fn test_maximum_weight_selects_not_blends() {
    // Identity mapping except two row-1 pixels steered onto cell (1, 2):
    // one dead-center (weight 1.0), one offset by 0.4 cells (weight ~0.48).
    // Row 1 feeds neither the middle-row nor the first/last-row stencils, so
    // the footprint parameters stay those of the unit mapping.
    let mut u = Array2::from_shape_fn((4, 4), |(_, c)| c as f32);
    let v = Array2::from_shape_fn((4, 4), |(r, _)| r as f32);
    u[(1, 1)] = 2.0;
    u[(1, 2)] = 2.4;

    let mut data = Array2::from_elem((4, 4), 0i8);
    data[(1, 1)] = 10;
    data[(1, 2)] = 20;

    let mut out = Array2::<i8>::from_elem((6, 6), -1);
    let resampler = EwaResampler::new(WeightParameters {
        maximum_weight_mode: true,
        ..Default::default()
    });
    resampler
        .resample(
            &u.view(),
            &v.view(),
            4,
            &[data.view()],
            -128i8,
            &mut [out.view_mut()],
            -1i8,
        )
        .expect("resampling failed");

    // The higher-weight value wins outright; 14 would indicate a blend
    assert_eq!(out[(1, 2)], 10);
    // The vacated cell received no contribution at all
    assert_eq!(out[(1, 1)], -1);
}

#[test]
fn test_fully_unmapped_swath_has_no_coverage() {
    let u = Array2::from_elem((4, 4), -1.0f32);
    let v = Array2::from_elem((4, 4), -1.0f32);
    let data = Array2::from_elem((4, 4), 100.0f32);
    let mut out = Array2::<u8>::from_elem((6, 6), 42);

    let result = EwaResampler::standard().resample(
        &u.view(),
        &v.view(),
        2,
        &[data.view()],
        -999.0f32,
        &mut [out.view_mut()],
        0u8,
    );

    assert!(matches!(result, Err(FornavError::NoCoverage(_))));
    // The failure is raised before finalization; outputs are untouched
    assert!(out.iter().all(|&x| x == 42));
}

#[test]
fn test_identical_invocations_are_bit_identical() {
    // Fractional mapping with overlapping footprints across two scans
    let u = Array2::from_shape_fn((8, 6), |(_, c)| c as f32 * 0.8 + 0.3);
    let v = Array2::from_shape_fn((8, 6), |(r, _)| r as f32 * 0.7 + 0.2);
    let data = Array2::from_shape_fn((8, 6), |(r, c)| (r * 6 + c) as f32 * 1.7);

    let run = || {
        let mut out = Array2::<f32>::zeros((8, 8));
        EwaResampler::standard()
            .resample(
                &u.view(),
                &v.view(),
                4,
                &[data.view()],
                -999.0f32,
                &mut [out.view_mut()],
                -999.0f32,
            )
            .expect("resampling failed");
        out
    };

    let first = run();
    let second = run();
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn test_single_contribution_outputs_pixel_value() {
    // Smooth mapping, but every pixel except (0, 1) carries the fill value:
    // cell (0, 1) accumulates exactly one term, so sum/weight must reproduce
    // the pixel value even though its weight is well below 1
    let u = Array2::from_shape_fn((2, 3), |(_, c)| c as f32 + 0.3);
    let v = Array2::from_shape_fn((2, 3), |(r, _)| r as f32 + 0.3);

    let fill = -999.0f32;
    let mut data = Array2::from_elem((2, 3), fill);
    data[(0, 1)] = 12.5;
    let mut out = Array2::<f32>::zeros((5, 5));

    EwaResampler::standard()
        .resample(
            &u.view(),
            &v.view(),
            2,
            &[data.view()],
            fill,
            &mut [out.view_mut()],
            -999.0f32,
        )
        .expect("resampling failed");

    assert_eq!(out[(0, 1)], 12.5);
}

#[test]
fn test_parallel_jobs_are_independent() {
    let (u, v) = center_block_swath();
    let data = Array2::from_elem((4, 4), 50.0f32);

    let covered = ResampleJob {
        cols: u,
        rows: v,
        rows_per_scan: 4,
        channels: vec![data.clone()],
        input_fill: -999.0f32,
        outputs: vec![Array2::<u8>::zeros((6, 6))],
        output_fill: 0u8,
    };
    let unmapped = ResampleJob {
        cols: Array2::from_elem((4, 4), -1.0f32),
        rows: Array2::from_elem((4, 4), -1.0f32),
        rows_per_scan: 4,
        channels: vec![data],
        input_fill: -999.0f32,
        outputs: vec![Array2::<u8>::zeros((6, 6))],
        output_fill: 0u8,
    };

    let mut jobs = vec![covered, unmapped];
    let results = resample_jobs(&EwaResampler::standard(), &mut jobs);

    assert_eq!(results.len(), 2);
    assert_eq!(*results[0].as_ref().expect("covered job failed"), 32);
    assert!(matches!(results[1], Err(FornavError::NoCoverage(_))));
    assert_eq!(jobs[0].outputs[0][(2, 2)], 50);
    // The failed job wrote nothing
    assert!(jobs[1].outputs[0].iter().all(|&x| x == 0));
}
