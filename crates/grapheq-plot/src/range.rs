//! Adaptive axis-range discovery.
//!
//! With no user bounds, an initial horizontal half-width is derived from
//! the equation's structure (degree and normalized coefficient spread);
//! the resolved axis is then sampled and every stored solution branch for
//! the other variable is evaluated to build an empirical point cloud for
//! the dependent axis. Branch evaluation can be arbitrarily expensive for
//! degenerate algebra, so it is cancellation-aware and runs under the
//! bounded executor upstream.

use crate::field::linspace;
use crate::window::{window_from_x_samples, window_from_y_samples, AxisRange, PlotWindow};
use crate::PlotError;
use grapheq_symbolic::{compile, degree_in, term_magnitudes, CancelToken, Expr};
use log::debug;

/// Number of sample points along the resolved axis.
pub const SAMPLE_POINTS: usize = 50;
/// Half-width used when the structural heuristic is degenerate.
pub const DEFAULT_HALF_WIDTH: f64 = 5.0;

/// Everything range discovery needs, owned so the work can move onto a
/// worker thread.
#[derive(Debug, Clone)]
pub struct RangeJob {
    pub left_minus_right: Expr,
    pub x_var: String,
    pub y_var: String,
    /// Solution branches for the horizontal variable (in terms of the
    /// vertical one).
    pub x_roots: Vec<Expr>,
    /// Solution branches for the vertical variable (in terms of the
    /// horizontal one).
    pub y_roots: Vec<Expr>,
    pub x_range: AxisRange,
    pub y_range: AxisRange,
}

/// Initial half-width for the horizontal axis, from the equation's
/// structure: normalize coefficient magnitudes so the smallest is 1, then
/// take `max^(1/degree) * 0.5`. This scales the window to where the
/// curve's nonlinear terms become comparable to its linear ones; it is a
/// heuristic, not a bound. Degenerate shapes (degree 0, a single term, a
/// non-finite result) fall back to [`DEFAULT_HALF_WIDTH`].
pub fn auto_half_width(left_minus_right: &Expr, var: &str) -> f64 {
    let magnitudes = term_magnitudes(left_minus_right);
    if magnitudes.len() < 2 {
        return DEFAULT_HALF_WIDTH;
    }
    let min = magnitudes.iter().copied().fold(f64::INFINITY, f64::min);
    let max = magnitudes.iter().copied().fold(0.0, f64::max);
    if !(min > 0.0) || !max.is_finite() {
        return DEFAULT_HALF_WIDTH;
    }

    let degree = match degree_in(left_minus_right, var) {
        Some(d) if d > 0 => d,
        _ => return DEFAULT_HALF_WIDTH,
    };

    let normalized_max = max / min;
    let half_width = normalized_max.powf(1.0 / degree as f64) * 0.5;
    if half_width.is_finite() && half_width > 0.0 {
        half_width
    } else {
        DEFAULT_HALF_WIDTH
    }
}

/// Evaluate every solution branch at every sample point, keeping the
/// finite (real-valued) results.
pub fn sample_branches(
    branches: &[Expr],
    sample_var: &str,
    samples: &[f64],
    cancel: &CancelToken,
) -> Result<Vec<f64>, PlotError> {
    let vars = [sample_var.to_string()];
    let mut out = Vec::new();
    for branch in branches {
        let compiled = match compile(branch, &vars) {
            Ok(c) => c,
            Err(err) => {
                // A branch can reference the dependent variable itself for
                // degenerate equations; it contributes no samples.
                debug!("skipping unsampleable branch `{branch}`: {err}");
                continue;
            }
        };
        for &s in samples {
            if cancel.is_cancelled() {
                return Err(PlotError::Cancelled);
            }
            let v = compiled.eval(&[s]);
            if v.is_finite() {
                out.push(v);
            }
        }
    }
    Ok(out)
}

/// Resolve a viewing window for the job.
///
/// Seeded axes pass through untouched (up to margins); an undecided
/// horizontal axis is derived via [`auto_half_width`]. No usable samples is
/// not an error: the window falls back to a zero-centered dependent axis.
pub fn discover_window(job: &RangeJob, cancel: &CancelToken) -> Result<PlotWindow, PlotError> {
    if !job.x_range.undecided {
        let samples = linspace(job.x_range.min, job.x_range.max, SAMPLE_POINTS);
        let ys = sample_branches(&job.y_roots, &job.x_var, &samples, cancel)?;
        if ys.is_empty() {
            debug!("no usable dependent samples; centering on zero");
        }
        return Ok(window_from_x_samples(
            &ys,
            job.x_range.min,
            job.x_range.max,
            false,
        ));
    }

    if !job.y_range.undecided {
        let samples = linspace(job.y_range.min, job.y_range.max, SAMPLE_POINTS);
        let xs = sample_branches(&job.x_roots, &job.y_var, &samples, cancel)?;
        if xs.is_empty() {
            debug!("no usable dependent samples; centering on zero");
        }
        return Ok(window_from_y_samples(&xs, job.y_range.min, job.y_range.max));
    }

    let half_width = auto_half_width(&job.left_minus_right, &job.x_var);
    let samples = linspace(-half_width, half_width, SAMPLE_POINTS);
    let ys = sample_branches(&job.y_roots, &job.x_var, &samples, cancel)?;
    Ok(window_from_x_samples(&ys, -half_width, half_width, true))
}

/// Window used when discovery itself was cut off: the same axis
/// resolution, with an empty sample cloud.
pub fn fallback_window(job: &RangeJob) -> PlotWindow {
    if !job.x_range.undecided {
        return window_from_x_samples(&[], job.x_range.min, job.x_range.max, false);
    }
    if !job.y_range.undecided {
        return window_from_y_samples(&[], job.y_range.min, job.y_range.max);
    }
    let half_width = auto_half_width(&job.left_minus_right, &job.x_var);
    window_from_x_samples(&[], -half_width, half_width, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grapheq_symbolic::{canonicalize, solve_for};

    fn circle() -> Expr {
        // x^2 + y^2 - 4
        canonicalize(&Expr::add(vec![
            Expr::pow(Expr::var("x"), Expr::int(2)),
            Expr::pow(Expr::var("y"), Expr::int(2)),
            Expr::int(-4),
        ]))
    }

    fn circle_job(x_range: AxisRange, y_range: AxisRange) -> RangeJob {
        let lmr = circle();
        let token = CancelToken::new();
        RangeJob {
            x_roots: solve_for(&lmr, "x", &token).expect("solve x"),
            y_roots: solve_for(&lmr, "y", &token).expect("solve y"),
            left_minus_right: lmr,
            x_var: "x".into(),
            y_var: "y".into(),
            x_range,
            y_range,
        }
    }

    #[test]
    fn circle_half_width_from_coefficient_spread() {
        // magnitudes {1, 1, 4}: normalized max 4, degree 2 => 4^(1/2)*0.5 = 1
        assert!((auto_half_width(&circle(), "x") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_heuristics_fall_back() {
        // single term: x
        assert_eq!(auto_half_width(&Expr::var("x"), "x"), DEFAULT_HALF_WIDTH);
        // degree 0 in x: y + 1
        let e = canonicalize(&Expr::add(vec![Expr::var("y"), Expr::int(1)]));
        assert_eq!(auto_half_width(&e, "x"), DEFAULT_HALF_WIDTH);
    }

    #[test]
    fn sampling_keeps_only_real_values() {
        let job = circle_job(AxisRange::seeded(-3.0, 3.0), AxisRange::undecided());
        let samples = linspace(-3.0, 3.0, SAMPLE_POINTS);
        let ys = sample_branches(&job.y_roots, "x", &samples, &CancelToken::new()).unwrap();
        // Outside |x| > 2 the branches are imaginary and contribute nothing.
        assert!(!ys.is_empty());
        assert!(ys.iter().all(|v| v.is_finite() && v.abs() <= 2.0 + 1e-9));
    }

    #[test]
    fn auto_window_centers_circle_near_zero() {
        let job = circle_job(AxisRange::undecided(), AxisRange::undecided());
        let w = discover_window(&job, &CancelToken::new()).unwrap();
        assert!((w.width() / w.height() - 4.0 / 3.0).abs() < 1e-9);
        assert!(w.y_center().abs() < 1e-9);
        assert!((w.x_min + 21.0).abs() < 1e-9, "x_min = {}", w.x_min);
    }

    #[test]
    fn seeded_axis_passes_through_with_exact_margin() {
        let job = circle_job(AxisRange::seeded(-5.0, 5.0), AxisRange::undecided());
        let w = discover_window(&job, &CancelToken::new()).unwrap();
        assert!((w.x_min - (-5.0 - 0.08 * 10.0)).abs() < 1e-9);
        assert!((w.x_max - (5.0 + 0.08 * 10.0)).abs() < 1e-9);
    }

    #[test]
    fn seeded_vertical_axis_swaps_the_procedure() {
        let job = circle_job(AxisRange::undecided(), AxisRange::seeded(-2.0, 2.0));
        let w = discover_window(&job, &CancelToken::new()).unwrap();
        assert!((w.y_min - (-2.0 - 0.08 * 4.0)).abs() < 1e-9);
        assert!((w.width() / w.height() - 4.0 / 3.0).abs() < 1e-9);
        assert!(w.x_center().abs() < 1e-9);
    }

    #[test]
    fn cancellation_aborts_sampling() {
        let job = circle_job(AxisRange::undecided(), AxisRange::undecided());
        let token = CancelToken::new();
        token.cancel();
        assert!(matches!(
            discover_window(&job, &token),
            Err(PlotError::Cancelled)
        ));
    }

    #[test]
    fn fallback_window_matches_axis_resolution() {
        let job = circle_job(AxisRange::seeded(-5.0, 5.0), AxisRange::undecided());
        let w = fallback_window(&job);
        assert!((w.x_min + 5.8).abs() < 1e-9);
        assert!((w.y_center()).abs() < 1e-9);
    }
}
