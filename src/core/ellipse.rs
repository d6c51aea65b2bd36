use crate::core::dtype::SwathCoord;
use crate::core::weight::WeightTable;
use crate::types::EPSILON;
use ndarray::ArrayView2;

/// Quadratic-form coefficients describing one swath column's elliptical
/// footprint in grid space.
///
/// `q(u, v) = a*u^2 + b*u*v + c*v^2` gives the equal-weight contours around
/// the pixel center; a grid cell lies inside the footprint when
/// `0 <= q < f`. `u_del`/`v_del` bound the footprint along grid columns and
/// rows respectively.
#[derive(Debug, Clone, Copy)]
pub struct EllipseParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    /// Quadratic-form cutoff (the table's qmax)
    pub f: f64,
    pub u_del: f64,
    pub v_del: f64,
}

/// Derive per-column footprint parameters for one scan block.
///
/// `u`/`v` are the fractional grid column/row arrays for the scan
/// (rows_per_scan x swath_cols). The local Jacobian is estimated with central
/// differences: horizontal from the vertically-middle row's neighbors,
/// vertical from the first and last rows of the scan. The first and last
/// column copy their parameters from their inner neighbor, which has no
/// symmetric stencil there.
///
/// A degenerate local mapping (zero-area Jacobian) is clamped to EPSILON, not
/// rejected; the resulting scale factor is very large but finite, and the
/// half-widths collapse toward zero. Callers guarantee at least 2 rows and
/// 3 columns.
pub fn compute_ewa_parameters<C: SwathCoord>(
    u: &ArrayView2<C>,
    v: &ArrayView2<C>,
    table: &WeightTable,
) -> Vec<EllipseParams> {
    let (rows, cols) = u.dim();
    debug_assert!(rows >= 2 && cols >= 3);
    debug_assert_eq!(u.dim(), v.dim());

    let mid = rows / 2;
    let last = rows - 1;
    let distance_max = table.distance_max;
    let delta_max = table.delta_max;
    let qmax = table.qmax;

    let mut params = vec![
        EllipseParams {
            a: 0.0,
            b: 0.0,
            c: 0.0,
            f: qmax,
            u_del: 0.0,
            v_del: 0.0,
        };
        cols
    ];

    for col in 1..cols - 1 {
        let ux = (u[[mid, col + 1]].as_() - u[[mid, col - 1]].as_()) / 2.0 * distance_max;
        let vx = (v[[mid, col + 1]].as_() - v[[mid, col - 1]].as_()) / 2.0 * distance_max;
        let uy = (u[[last, col]].as_() - u[[0, col]].as_()) / last as f64 * distance_max;
        let vy = (v[[last, col]].as_() - v[[0, col]].as_()) / last as f64 * distance_max;

        let mut f_scale = ux * vy - uy * vx;
        f_scale *= f_scale;
        if f_scale < EPSILON {
            f_scale = EPSILON;
        }
        f_scale = qmax / f_scale;

        let a = (vx * vx + vy * vy) * f_scale;
        let b = -2.0 * (ux * vx + uy * vy) * f_scale;
        let c = (ux * ux + uy * uy) * f_scale;

        let mut d = 4.0 * a * c - b * b;
        if d < EPSILON {
            d = EPSILON;
        }
        d = 4.0 * qmax / d;

        let mut u_del = (c * d).sqrt();
        let mut v_del = (a * d).sqrt();
        if u_del > delta_max {
            u_del = delta_max;
        }
        if v_del > delta_max {
            v_del = delta_max;
        }

        params[col] = EllipseParams {
            a,
            b,
            c,
            f: qmax,
            u_del,
            v_del,
        };
    }

    // No symmetric neighbor at the edges
    params[0] = params[1];
    params[cols - 1] = params[cols - 2];

    params
}
