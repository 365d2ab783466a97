//! Axis ranges and plot-window derivation.
//!
//! The window math mirrors the reference behavior: the independent axis is
//! padded by a margin rate (8% when user-seeded, a 10x exploratory factor
//! when fully automatic), and the dependent axis is forced to a 4:3
//! width-to-height aspect around the empirical sample center.

use serde::{Deserialize, Serialize};

/// Margin rate applied when the independent axis was user-specified.
pub const SEEDED_MARGIN_RATE: f64 = 0.08;
/// Margin rate applied when the independent axis was derived
/// heuristically; a derived window is low-confidence, so explore wide.
pub const AUTO_MARGIN_RATE: f64 = 10.0;
/// Dependent-axis width as a fraction of the independent-axis width (4:3).
pub const ASPECT_Y_OVER_X: f64 = 3.0 / 4.0;

/// Bounds for one axis, possibly still undecided.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub undecided: bool,
}

impl AxisRange {
    pub fn seeded(min: f64, max: f64) -> Self {
        AxisRange {
            min,
            max,
            undecided: false,
        }
    }

    pub fn undecided() -> Self {
        AxisRange {
            min: 0.0,
            max: 0.0,
            undecided: true,
        }
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self::undecided()
    }
}

/// A fully resolved viewing window, margins applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotWindow {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl PlotWindow {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn x_center(&self) -> f64 {
        (self.x_min + self.x_max) / 2.0
    }

    pub fn y_center(&self) -> f64 {
        (self.y_min + self.y_max) / 2.0
    }
}

/// Sample center: midpoint of the extremes, 0 when no valid samples exist.
fn sample_center(samples: &[f64]) -> f64 {
    let mut iter = samples.iter().filter(|v| v.is_finite());
    let Some(first) = iter.next() else { return 0.0 };
    let (min, max) = iter.fold((*first, *first), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    (min + max) / 2.0
}

/// Derive the window from resolved `x` bounds and the dependent-axis
/// sample cloud. The `x` axis is padded by the margin rate; the `y` axis
/// is recentered on the samples with a 4:3 aspect (post-margin).
pub fn window_from_x_samples(
    y_samples: &[f64],
    x_min: f64,
    x_max: f64,
    x_undecided: bool,
) -> PlotWindow {
    let margin_rate = if x_undecided {
        AUTO_MARGIN_RATE
    } else {
        SEEDED_MARGIN_RATE
    };

    let x_width = x_max - x_min;
    let x_margin = margin_rate * x_width;

    let y_center = sample_center(y_samples);
    let y_width = ASPECT_Y_OVER_X * x_width;

    PlotWindow {
        x_min: x_min - x_margin,
        x_max: x_max + x_margin,
        y_min: y_center - y_width * (0.5 + margin_rate),
        y_max: y_center + y_width * (0.5 + margin_rate),
    }
}

/// Axis-swapped variant: resolved `y` bounds, sampled `x` cloud. Only
/// reachable when the vertical axis was user-seeded.
pub fn window_from_y_samples(x_samples: &[f64], y_min: f64, y_max: f64) -> PlotWindow {
    let margin_rate = SEEDED_MARGIN_RATE;

    let y_width = y_max - y_min;
    let y_margin = margin_rate * y_width;

    let x_center = sample_center(x_samples);
    let x_width = y_width / ASPECT_Y_OVER_X;

    PlotWindow {
        x_min: x_center - x_width * (0.5 + margin_rate),
        x_max: x_center + x_width * (0.5 + margin_rate),
        y_min: y_min - y_margin,
        y_max: y_max + y_margin,
    }
}
