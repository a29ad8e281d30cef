//! Replays chart drawing commands onto an egui painter.

use egui::{FontId, Painter, Rect, Shape, Stroke, StrokeKind, pos2};

use super::geometry::{CurveCommand, CurveFrame};
use super::{AXIS_STROKE, CURVE_STROKE, GRID_STROKE};

/// Dash length used to approximate dotted grid lines.
const GRID_DASH: f32 = 1.0;
/// Gap between grid dashes.
const GRID_GAP: f32 = 3.0;
/// Marker radius for single-sample views.
const MARKER_RADIUS: f32 = 2.0;

/// Paint a prepared [`CurveFrame`] into `rect`.
///
/// Commands are canvas-local; this translates them into screen space and
/// clips to the widget rect.
pub fn paint_frame(painter: &Painter, rect: Rect, frame: &CurveFrame) {
    let painter = painter.with_clip_rect(rect);
    let origin = rect.min;
    let at = |p: egui::Pos2| pos2(origin.x + p.x, origin.y + p.y);

    for command in &frame.commands {
        match command {
            CurveCommand::Background { color } => {
                painter.rect_filled(rect, 0, *color);
            }
            CurveCommand::Title { pos, text, color } => {
                painter.text(
                    at(*pos),
                    egui::Align2::LEFT_TOP,
                    text,
                    FontId::proportional(12.0),
                    *color,
                );
            }
            CurveCommand::GridLine { from, to, color } => {
                painter.extend(Shape::dashed_line(
                    &[at(*from), at(*to)],
                    Stroke::new(GRID_STROKE, *color),
                    GRID_DASH,
                    GRID_GAP,
                ));
            }
            CurveCommand::Label {
                pos,
                anchor,
                text,
                color,
            } => {
                painter.text(at(*pos), *anchor, text, FontId::proportional(9.0), *color);
            }
            CurveCommand::AxisLine { from, to, color } => {
                painter.line_segment([at(*from), at(*to)], Stroke::new(AXIS_STROKE, *color));
            }
            CurveCommand::Segment { from, to, color } => {
                painter.line_segment([at(*from), at(*to)], Stroke::new(CURVE_STROKE, *color));
            }
            CurveCommand::Marker { pos, color } => {
                painter.circle_filled(at(*pos), MARKER_RADIUS, *color);
            }
        }
    }

    painter.rect_stroke(
        rect,
        0,
        Stroke::new(1.0, egui::Color32::from_rgb(64, 64, 64)),
        StrokeKind::Inside,
    );
}
