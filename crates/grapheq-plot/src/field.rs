//! The contour field: `left - right` evaluated over a 2-D grid.
//!
//! Purely numeric; no solving happens here. Evaluation failures at
//! isolated points (division by zero, fractional powers of negatives)
//! become NaN markers that the renderer skips.

use crate::window::PlotWindow;
use grapheq_symbolic::CompiledExpr;
use rayon::prelude::*;

/// Grid resolution along each axis.
pub const DEFAULT_RESOLUTION: usize = 400;

/// `n` evenly spaced points from `start` to `end`, inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![start];
    }
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// A row-major grid of field values over a window. Row `iy` corresponds to
/// `ys()[iy]`, column `ix` to `xs()[ix]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourField {
    window: PlotWindow,
    resolution: usize,
    values: Vec<f64>,
}

impl ContourField {
    /// Evaluate `compiled` (variables bound in `[x, y]` order) over the
    /// window. Rows are evaluated in parallel; every point is independent,
    /// so the result is identical to a sequential sweep.
    pub fn build(compiled: &CompiledExpr, window: PlotWindow, resolution: usize) -> Self {
        let resolution = resolution.max(2);
        let xs = linspace(window.x_min, window.x_max, resolution);
        let ys = linspace(window.y_min, window.y_max, resolution);

        let values: Vec<f64> = ys
            .par_iter()
            .flat_map_iter(|&y| {
                xs.iter().map(move |&x| {
                    let v = compiled.eval(&[x, y]);
                    if v.is_finite() {
                        v
                    } else {
                        f64::NAN
                    }
                })
            })
            .collect();

        ContourField {
            window,
            resolution,
            values,
        }
    }

    pub fn window(&self) -> PlotWindow {
        self.window
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn value(&self, ix: usize, iy: usize) -> f64 {
        self.values[iy * self.resolution + ix]
    }

    pub fn xs(&self) -> Vec<f64> {
        linspace(self.window.x_min, self.window.x_max, self.resolution)
    }

    pub fn ys(&self) -> Vec<f64> {
        linspace(self.window.y_min, self.window.y_max, self.resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grapheq_symbolic::{canonicalize, compile, Expr};

    fn circle_field(resolution: usize) -> ContourField {
        // x^2 + y^2 - 4
        let e = canonicalize(&Expr::add(vec![
            Expr::pow(Expr::var("x"), Expr::int(2)),
            Expr::pow(Expr::var("y"), Expr::int(2)),
            Expr::int(-4),
        ]));
        let compiled = compile(&e, &["x".to_string(), "y".to_string()]).expect("compile");
        let window = PlotWindow {
            x_min: -4.0,
            x_max: 4.0,
            y_min: -3.0,
            y_max: 3.0,
        };
        ContourField::build(&compiled, window, resolution)
    }

    #[test]
    fn linspace_is_inclusive_and_even() {
        let pts = linspace(-1.0, 1.0, 5);
        assert_eq!(pts, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }

    #[test]
    fn field_has_requested_resolution() {
        let field = circle_field(50);
        assert_eq!(field.resolution(), 50);
        assert_eq!(field.xs().len(), 50);
        // Corner (-4, -3) is far outside the circle; center is inside.
        assert!(field.value(0, 0) > 0.0);
        assert!(field.value(25, 25) < 0.0);
    }

    #[test]
    fn parallel_build_matches_pointwise_evaluation() {
        let field = circle_field(16);
        let xs = field.xs();
        let ys = field.ys();
        for (iy, &y) in ys.iter().enumerate() {
            for (ix, &x) in xs.iter().enumerate() {
                let expected = x * x + y * y - 4.0;
                assert!((field.value(ix, iy) - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn evaluation_failures_become_nan() {
        // sqrt(x) is undefined left of zero
        let e = Expr::pow(Expr::var("x"), Expr::rational(1, 2));
        let compiled = compile(&e, &["x".to_string(), "y".to_string()]).expect("compile");
        let window = PlotWindow {
            x_min: -1.0,
            x_max: 1.0,
            y_min: -1.0,
            y_max: 1.0,
        };
        let field = ContourField::build(&compiled, window, 8);
        assert!(field.value(0, 0).is_nan());
        assert!(field.value(7, 0).is_finite());
    }
}
