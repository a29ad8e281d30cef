//! Curve chart rendering split into a pure geometry stage and an egui paint
//! stage.
//!
//! [`geometry::build_frame`] turns a sample view plus a display range into a
//! list of drawing commands for a fixed-size canvas; [`paint::paint_frame`]
//! replays those commands inside a widget rect. Keeping the stages apart
//! makes the coordinate math testable without a UI context.

mod geometry;
mod paint;
mod scale;

pub use geometry::{CurveCommand, CurveFrame, build_frame};
pub use paint::paint_frame;
pub use scale::{DisplayRange, auto_range, sample_x, value_y};

use egui::Color32;

/// Stroke width of the dotted grid.
pub const GRID_STROKE: f32 = 1.0;
/// Stroke width of the axis lines.
pub const AXIS_STROKE: f32 = 2.0;
/// Stroke width of the plotted curve, distinctly thicker than the grid.
pub const CURVE_STROKE: f32 = 3.0;

/// Colors used to draw one curve chart.
#[derive(Clone, Copy, Debug)]
pub struct ChartStyle {
    /// Canvas clear color.
    pub background: Color32,
    /// Dotted grid line color.
    pub grid: Color32,
    /// Axis line color.
    pub axis: Color32,
    /// Title and tick label color.
    pub text: Color32,
    /// Base curve color; the stroke fades lighter toward the top.
    pub curve: Color32,
}

impl ChartStyle {
    fn base(curve: Color32) -> Self {
        Self {
            background: Color32::WHITE,
            grid: Color32::from_rgb(200, 200, 200),
            axis: Color32::BLACK,
            text: Color32::BLACK,
            curve,
        }
    }

    /// Royal-blue styling for the accuracy chart.
    pub fn accuracy() -> Self {
        Self::base(Color32::from_rgb(65, 105, 225))
    }

    /// Crimson styling for the loss chart.
    pub fn loss() -> Self {
        Self::base(Color32::from_rgb(220, 20, 60))
    }
}
