//! GraphEq plotting: viewing-window discovery, contour-field sampling and
//! PNG rendering.
//!
//! Everything here is a pure function of its inputs; concurrency and
//! wall-clock budgets are the caller's concern (range sampling takes a
//! cancellation token for that purpose).

use thiserror::Error;

mod field;
mod range;
mod render;
mod window;

pub use field::{linspace, ContourField, DEFAULT_RESOLUTION};
pub use range::{
    auto_half_width, discover_window, fallback_window, sample_branches, RangeJob,
    DEFAULT_HALF_WIDTH, SAMPLE_POINTS,
};
pub use render::{zero_segments, ContourRenderer, FigureSpec, Renderer, Segment};
pub use window::{
    window_from_x_samples, window_from_y_samples, AxisRange, PlotWindow, ASPECT_Y_OVER_X,
    AUTO_MARGIN_RATE, SEEDED_MARGIN_RATE,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlotError {
    #[error("sampling was cancelled")]
    Cancelled,
    #[error("rendering failed: {0}")]
    Render(String),
}
