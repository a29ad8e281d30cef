//! Palette and visual defaults for the egui UI.

use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

/// Severity of a status-bar message, mapped to a badge color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    /// Nothing happening.
    Idle,
    /// A long-running job is in flight.
    Busy,
    /// A neutral or success notice.
    Info,
    /// Something degraded but recoverable.
    Warning,
    /// An operation failed.
    Error,
}

/// Application color palette.
#[derive(Clone, Copy)]
pub struct Palette {
    /// Window background.
    pub bg_primary: Color32,
    /// Panel background.
    pub bg_secondary: Color32,
    /// Widget background.
    pub bg_tertiary: Color32,
    /// Panel and widget outlines.
    pub panel_outline: Color32,
    /// Primary text.
    pub text_primary: Color32,
    /// De-emphasized text.
    pub text_muted: Color32,
    /// Confident prediction results.
    pub success: Color32,
    /// The unknown-class sentinel and degraded states.
    pub warning: Color32,
    /// Failures and invalid input.
    pub error: Color32,
}

/// The fixed application palette.
pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(12, 12, 14),
        bg_secondary: Color32::from_rgb(24, 26, 28),
        bg_tertiary: Color32::from_rgb(40, 42, 46),
        panel_outline: Color32::from_rgb(52, 56, 62),
        text_primary: Color32::from_rgb(190, 196, 204),
        text_muted: Color32::from_rgb(138, 144, 152),
        success: Color32::from_rgb(56, 142, 60),
        warning: Color32::from_rgb(255, 152, 0),
        error: Color32::from_rgb(211, 47, 47),
    }
}

/// Badge label and color for a status tone.
pub fn status_badge(tone: StatusTone) -> (String, Color32) {
    match tone {
        StatusTone::Idle => ("Idle".into(), Color32::from_rgb(66, 66, 70)),
        StatusTone::Busy => ("Training".into(), Color32::from_rgb(31, 139, 255)),
        StatusTone::Info => ("Info".into(), Color32::from_rgb(64, 140, 112)),
        StatusTone::Warning => ("Warning".into(), palette().warning),
        StatusTone::Error => ("Error".into(), palette().error),
    }
}

/// Apply the dark application visuals to egui.
pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_secondary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.extreme_bg_color = palette.bg_primary;
    visuals.faint_bg_color = palette.bg_secondary;
    visuals.error_fg_color = palette.error;
    visuals.warn_fg_color = palette.warning;
    visuals.selection.bg_fill = palette.bg_tertiary;
    visuals.selection.stroke = Stroke::new(1.0, palette.text_primary);
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    set_widget_visuals(&mut visuals.widgets.inactive, palette);
    set_widget_visuals(&mut visuals.widgets.hovered, palette);
    set_widget_visuals(&mut visuals.widgets.active, palette);
    set_widget_visuals(&mut visuals.widgets.open, palette);
    visuals.window_corner_radius = CornerRadius::ZERO;
    visuals.menu_corner_radius = CornerRadius::ZERO;
    visuals.popup_shadow = Shadow::NONE;
    visuals.button_frame = true;
}

fn set_widget_visuals(vis: &mut WidgetVisuals, palette: Palette) {
    vis.corner_radius = CornerRadius::ZERO;
    vis.bg_fill = palette.bg_tertiary;
    vis.bg_stroke = Stroke::new(1.0, palette.panel_outline);
    vis.fg_stroke = Stroke::new(1.0, palette.text_primary);
}

/// Outline stroke for the main panels.
pub fn panel_border() -> Stroke {
    Stroke::new(1.0, palette().panel_outline)
}
