//! Pure drawing-command builder for one curve chart.
//!
//! All coordinates are canvas-local floating point; rounding happens only
//! when labels are formatted. The command order mirrors the paint order:
//! background, title, grid with tick labels, then (only when the view is
//! non-empty) axes, the gradient curve, and the two x-edge labels.

use egui::{Align2, Color32, Pos2, Vec2, pos2};

use super::scale::{DisplayRange, sample_x, value_y};
use super::ChartStyle;

/// Number of grid cells along each canvas dimension.
const GRID_STEPS: usize = 10;
/// Inset of the title from the top-left corner.
const TITLE_INSET: f32 = 10.0;
/// Half-height of the x-edge label row above the bottom edge.
const EDGE_LABEL_RISE: f32 = 10.0;

/// One primitive to replay on a painter.
#[derive(Clone, Debug, PartialEq)]
pub enum CurveCommand {
    /// Fill the whole canvas.
    Background {
        /// Fill color.
        color: Color32,
    },
    /// Chart title, anchored top-left.
    Title {
        /// Anchor position.
        pos: Pos2,
        /// Title text.
        text: String,
        /// Text color.
        color: Color32,
    },
    /// One dotted grid line.
    GridLine {
        /// Line start.
        from: Pos2,
        /// Line end.
        to: Pos2,
        /// Line color.
        color: Color32,
    },
    /// A small text label (grid tick values and x-edge indices).
    Label {
        /// Anchor position.
        pos: Pos2,
        /// Which corner/edge of the text sits on `pos`.
        anchor: Align2,
        /// Label text.
        text: String,
        /// Text color.
        color: Color32,
    },
    /// One solid axis line.
    AxisLine {
        /// Line start.
        from: Pos2,
        /// Line end.
        to: Pos2,
        /// Line color.
        color: Color32,
    },
    /// One curve segment between consecutive mapped samples.
    Segment {
        /// Segment start.
        from: Pos2,
        /// Segment end.
        to: Pos2,
        /// Gradient color for this segment.
        color: Color32,
    },
    /// The lone mapped point of a single-sample view.
    Marker {
        /// Point position.
        pos: Pos2,
        /// Point color.
        color: Color32,
    },
}

/// Drawing commands for one chart at a fixed canvas size.
#[derive(Clone, Debug)]
pub struct CurveFrame {
    /// Canvas size the commands were computed for.
    pub size: Vec2,
    /// Commands in paint order.
    pub commands: Vec<CurveCommand>,
}

/// Build the drawing commands for `samples` over `range` on a canvas of
/// `size`. An empty view produces only the background, title and grid.
pub fn build_frame(
    samples: &[f64],
    range: DisplayRange,
    size: Vec2,
    style: &ChartStyle,
    title: &str,
) -> CurveFrame {
    let width = f64::from(size.x.max(1.0));
    let height = f64::from(size.y.max(1.0));
    let mut commands = Vec::new();

    commands.push(CurveCommand::Background {
        color: style.background,
    });

    if !title.is_empty() {
        commands.push(CurveCommand::Title {
            pos: pos2(TITLE_INSET, TITLE_INSET),
            text: title.to_owned(),
            color: style.text,
        });
    }

    push_grid(&mut commands, width, height, range, style);

    if samples.is_empty() {
        return CurveFrame {
            size,
            commands,
        };
    }

    push_axes(&mut commands, width, height, style);
    push_curve(&mut commands, samples, range, width, height, style);
    push_edge_labels(&mut commands, samples.len(), width, height, style);

    CurveFrame { size, commands }
}

fn push_grid(
    commands: &mut Vec<CurveCommand>,
    width: f64,
    height: f64,
    range: DisplayRange,
    style: &ChartStyle,
) {
    for i in 0..=GRID_STEPS {
        let x = (i as f64 * width / GRID_STEPS as f64) as f32;
        commands.push(CurveCommand::GridLine {
            from: pos2(x, 0.0),
            to: pos2(x, height as f32),
            color: style.grid,
        });
    }
    for i in 0..=GRID_STEPS {
        let y = (i as f64 * height / GRID_STEPS as f64) as f32;
        commands.push(CurveCommand::GridLine {
            from: pos2(0.0, y),
            to: pos2(width as f32, y),
            color: style.grid,
        });
        if i > 0 && i < GRID_STEPS {
            let value = range.max - i as f64 * range.span() / GRID_STEPS as f64;
            commands.push(CurveCommand::Label {
                pos: pos2(5.0, y),
                anchor: Align2::LEFT_CENTER,
                text: format!("{value:.2}"),
                color: style.grid,
            });
        }
    }
}

fn push_axes(commands: &mut Vec<CurveCommand>, width: f64, height: f64, style: &ChartStyle) {
    commands.push(CurveCommand::AxisLine {
        from: pos2(0.0, (height - 1.0) as f32),
        to: pos2(width as f32, (height - 1.0) as f32),
        color: style.axis,
    });
    commands.push(CurveCommand::AxisLine {
        from: pos2(0.0, 0.0),
        to: pos2(0.0, height as f32),
        color: style.axis,
    });
}

fn push_curve(
    commands: &mut Vec<CurveCommand>,
    samples: &[f64],
    range: DisplayRange,
    width: f64,
    height: f64,
    style: &ChartStyle,
) {
    let light = scale_color(style.curve, 1.2);
    let dark = scale_color(style.curve, 1.0 / 1.2);
    let count = samples.len();

    if count == 1 {
        let pos = pos2(0.0, value_y(samples[0], range, height) as f32);
        commands.push(CurveCommand::Marker {
            pos,
            color: gradient_at(light, dark, pos.y, height as f32),
        });
        return;
    }

    let mut previous: Option<Pos2> = None;
    for (index, &value) in samples.iter().enumerate() {
        let point = pos2(
            sample_x(index, count, width) as f32,
            value_y(value, range, height) as f32,
        );
        if let Some(from) = previous {
            let mid_y = (from.y + point.y) * 0.5;
            commands.push(CurveCommand::Segment {
                from,
                to: point,
                color: gradient_at(light, dark, mid_y, height as f32),
            });
        }
        previous = Some(point);
    }
}

fn push_edge_labels(
    commands: &mut Vec<CurveCommand>,
    count: usize,
    width: f64,
    height: f64,
    style: &ChartStyle,
) {
    let y = (height as f32 - EDGE_LABEL_RISE).max(0.0);
    commands.push(CurveCommand::Label {
        pos: pos2(2.0, y),
        anchor: Align2::LEFT_CENTER,
        text: "0".to_owned(),
        color: style.text,
    });
    commands.push(CurveCommand::Label {
        pos: pos2(width as f32 - 2.0, y),
        anchor: Align2::RIGHT_CENTER,
        text: format!("{}", count - 1),
        color: style.text,
    });
}

/// Scale an sRGB color's channels, clamping to the displayable range.
fn scale_color(color: Color32, factor: f32) -> Color32 {
    let scale = |channel: u8| -> u8 { ((f32::from(channel) * factor).round()).clamp(0.0, 255.0) as u8 };
    Color32::from_rgb(scale(color.r()), scale(color.g()), scale(color.b()))
}

/// Linear blend between the light (top) and dark (bottom) curve colors at a
/// vertical position.
fn gradient_at(light: Color32, dark: Color32, y: f32, height: f32) -> Color32 {
    let t = (y / height.max(1.0)).clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| -> u8 {
        (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8
    };
    Color32::from_rgb(
        lerp(light.r(), dark.r()),
        lerp(light.g(), dark.g()),
        lerp(light.b(), dark.b()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    fn frame(samples: &[f64], range: DisplayRange) -> CurveFrame {
        build_frame(
            samples,
            range,
            vec2(100.0, 100.0),
            &ChartStyle::accuracy(),
            "Training Accuracy",
        )
    }

    fn segments(frame: &CurveFrame) -> Vec<(Pos2, Pos2)> {
        frame
            .commands
            .iter()
            .filter_map(|command| match command {
                CurveCommand::Segment { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_view_stops_after_the_grid() {
        let frame = frame(&[], DisplayRange::new(0.0, 1.0));
        assert!(frame.commands.iter().any(|c| matches!(c, CurveCommand::GridLine { .. })));
        assert!(!frame.commands.iter().any(|c| matches!(
            c,
            CurveCommand::AxisLine { .. } | CurveCommand::Segment { .. } | CurveCommand::Marker { .. }
        )));
    }

    #[test]
    fn curve_segments_follow_the_coordinate_mapping() {
        let frame = frame(&[0.0, 1.0, 2.0], DisplayRange::new(0.0, 2.0));
        let segments = segments(&frame);
        assert_eq!(
            segments,
            vec![
                (pos2(0.0, 100.0), pos2(50.0, 50.0)),
                (pos2(50.0, 50.0), pos2(100.0, 0.0)),
            ]
        );
    }

    #[test]
    fn interior_tick_labels_count_down_from_the_top() {
        let frame = frame(&[0.0, 1.0], DisplayRange::new(0.0, 1.0));
        let ticks: Vec<&str> = frame
            .commands
            .iter()
            .filter_map(|command| match command {
                CurveCommand::Label { text, anchor, .. }
                    if *anchor == Align2::LEFT_CENTER && text.contains('.') =>
                {
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect();
        assert_eq!(ticks.len(), 9);
        assert_eq!(ticks.first(), Some(&"0.90"));
        assert_eq!(ticks.last(), Some(&"0.10"));
    }

    #[test]
    fn edge_labels_mark_first_and_last_index() {
        let frame = frame(&[0.1, 0.2, 0.3, 0.4], DisplayRange::new(0.0, 1.0));
        let labels: Vec<&str> = frame
            .commands
            .iter()
            .filter_map(|command| match command {
                CurveCommand::Label { text, .. } if !text.contains('.') => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["0", "3"]);
    }

    #[test]
    fn single_sample_becomes_a_marker_at_the_left_edge() {
        let frame = frame(&[0.5], DisplayRange::new(0.0, 1.0));
        let marker = frame
            .commands
            .iter()
            .find_map(|command| match command {
                CurveCommand::Marker { pos, .. } => Some(*pos),
                _ => None,
            })
            .unwrap();
        assert_eq!(marker, pos2(0.0, 50.0));
        assert!(segments(&frame).is_empty());
    }

    #[test]
    fn stroke_colors_darken_toward_the_bottom() {
        let frame = frame(&[0.0, 1.0], DisplayRange::new(0.0, 1.0));
        let colors: Vec<Color32> = frame
            .commands
            .iter()
            .filter_map(|command| match command {
                CurveCommand::Segment { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(colors.len(), 1);
        let steep = build_frame(
            &[0.0, 0.0, 1.0, 1.0],
            DisplayRange::new(0.0, 1.0),
            vec2(100.0, 100.0),
            &ChartStyle::accuracy(),
            "",
        );
        let steep_colors: Vec<Color32> = steep
            .commands
            .iter()
            .filter_map(|command| match command {
                CurveCommand::Segment { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        // Bottom-running segment is darker than the top-running one.
        assert_ne!(steep_colors.first(), steep_colors.last());
    }

    #[test]
    fn title_is_omitted_when_empty() {
        let frame = build_frame(
            &[0.5],
            DisplayRange::new(0.0, 1.0),
            vec2(100.0, 100.0),
            &ChartStyle::loss(),
            "",
        );
        assert!(!frame.commands.iter().any(|c| matches!(c, CurveCommand::Title { .. })));
    }
}
