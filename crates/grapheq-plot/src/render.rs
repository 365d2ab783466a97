//! The rendering seam.
//!
//! The core hands a request-scoped [`FigureSpec`] to a [`Renderer`] and
//! never touches process-global drawing state. The built-in
//! [`ContourRenderer`] extracts the zero level set with marching squares
//! and rasterizes it to PNG through plotters.

use crate::field::ContourField;
use crate::PlotError;
use plotters::prelude::*;
use std::path::Path;

/// Everything needed to draw one figure. Created per request, consumed by
/// the renderer, then dropped.
#[derive(Debug, Clone)]
pub struct FigureSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub field: ContourField,
}

/// An image producer. The core only requests creation; artifact retention
/// and cleanup belong to the caller.
pub trait Renderer {
    fn render(&self, figure: &FigureSpec, path: &Path) -> Result<(), PlotError>;
}

/// A line segment in data coordinates.
pub type Segment = [(f64, f64); 2];

/// Extract the zero level set of a field as line segments via marching
/// squares with linear edge interpolation. Cells touching a NaN sample are
/// skipped.
pub fn zero_segments(field: &ContourField) -> Vec<Segment> {
    let xs = field.xs();
    let ys = field.ys();
    let n = field.resolution();
    let mut segments = Vec::new();

    for iy in 0..n - 1 {
        for ix in 0..n - 1 {
            let v00 = field.value(ix, iy);
            let v10 = field.value(ix + 1, iy);
            let v01 = field.value(ix, iy + 1);
            let v11 = field.value(ix + 1, iy + 1);
            if !(v00.is_finite() && v10.is_finite() && v01.is_finite() && v11.is_finite()) {
                continue;
            }

            let (x0, x1) = (xs[ix], xs[ix + 1]);
            let (y0, y1) = (ys[iy], ys[iy + 1]);

            // Zero crossings on the four cell edges.
            let mut crossings: Vec<(f64, f64)> = Vec::with_capacity(4);
            let mut edge = |va: f64, vb: f64, pa: (f64, f64), pb: (f64, f64)| {
                if (va > 0.0) != (vb > 0.0) {
                    let t = va / (va - vb);
                    crossings.push((pa.0 + t * (pb.0 - pa.0), pa.1 + t * (pb.1 - pa.1)));
                }
            };
            edge(v00, v10, (x0, y0), (x1, y0));
            edge(v10, v11, (x1, y0), (x1, y1));
            edge(v11, v01, (x1, y1), (x0, y1));
            edge(v01, v00, (x0, y1), (x0, y0));

            match crossings.as_slice() {
                [a, b] => segments.push([*a, *b]),
                // Saddle cell: pair the crossings in traversal order.
                [a, b, c, d] => {
                    segments.push([*a, *b]);
                    segments.push([*c, *d]);
                }
                _ => {}
            }
        }
    }
    segments
}

/// PNG contour renderer backed by plotters.
#[derive(Debug, Clone)]
pub struct ContourRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for ContourRenderer {
    fn default() -> Self {
        ContourRenderer {
            width: 800,
            height: 600,
        }
    }
}

impl Renderer for ContourRenderer {
    fn render(&self, figure: &FigureSpec, path: &Path) -> Result<(), PlotError> {
        let window = figure.field.window();
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| PlotError::Render(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&figure.title, ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(40)
            .build_cartesian_2d(window.x_min..window.x_max, window.y_min..window.y_max)
            .map_err(|e| PlotError::Render(e.to_string()))?;

        chart
            .configure_mesh()
            .x_desc(figure.x_label.as_str())
            .y_desc(figure.y_label.as_str())
            .draw()
            .map_err(|e| PlotError::Render(e.to_string()))?;

        // Zero axes, when they cross the window.
        let axis_style = RGBColor(120, 120, 120).stroke_width(1);
        if window.x_min < 0.0 && window.x_max > 0.0 {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(0.0, window.y_min), (0.0, window.y_max)],
                    axis_style,
                )))
                .map_err(|e| PlotError::Render(e.to_string()))?;
        }
        if window.y_min < 0.0 && window.y_max > 0.0 {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(window.x_min, 0.0), (window.x_max, 0.0)],
                    axis_style,
                )))
                .map_err(|e| PlotError::Render(e.to_string()))?;
        }

        let segments = zero_segments(&figure.field);
        chart
            .draw_series(
                segments
                    .iter()
                    .map(|seg| PathElement::new(seg.to_vec(), BLUE.stroke_width(2))),
            )
            .map_err(|e| PlotError::Render(e.to_string()))?;

        root.present().map_err(|e| PlotError::Render(e.to_string()))
    }
}
