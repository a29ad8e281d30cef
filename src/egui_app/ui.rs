//! egui renderer for the application UI.

pub mod style;

use std::time::Instant;

use eframe::egui::{self, Align, Color32, Frame, Margin, RichText, Ui, Vec2};

use crate::chart::{self, ChartStyle};
use crate::egui_app::controller::EguiController;
use crate::playback::TICK_INTERVAL;
use crate::series::SeriesKind;

/// Smallest window the layout still fits in.
pub const MIN_VIEWPORT_SIZE: Vec2 = Vec2::new(900.0, 640.0);

/// Height of each curve chart canvas.
const CHART_HEIGHT: f32 = 250.0;

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
}

impl EguiApp {
    /// Create the app, loading persisted configuration.
    pub fn new() -> Result<Self, String> {
        let mut controller = EguiController::new();
        controller
            .load_configuration()
            .map_err(|err| format!("Failed to load config: {err}"))?;
        Ok(Self {
            controller,
            visuals_set: false,
        })
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar")
            .frame(Frame::new().fill(style::palette().bg_primary))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.add_space(8.0);
                    ui.label(
                        RichText::new("Fruit Classifier Training Console")
                            .size(16.0)
                            .strong(),
                    );
                    ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("Close").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
            });
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(Frame::new().fill(style::palette().bg_primary))
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    ui.add_space(8.0);
                    let (badge, _) =
                        ui.allocate_exact_size(egui::vec2(14.0, 18.0), egui::Sense::hover());
                    ui.painter().circle_filled(badge.center(), 6.0, status.badge_color);
                    ui.label(&status.badge_label);
                    ui.separator();
                    ui.label(&status.text);
                });
            });
    }

    fn render_training_panel(&mut self, ui: &mut Ui) {
        let panel = Frame::new()
            .fill(style::palette().bg_secondary)
            .stroke(style::panel_border())
            .inner_margin(Margin::symmetric(12, 10));
        panel.show(ui, |ui| {
            ui.label(RichText::new("Training Progress").strong());
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                if ui.button("Select Dataset…").clicked() {
                    self.controller.select_dataset_via_dialog();
                }
                ui.add_space(4.0);
                let label = self.controller.ui.training.dataset_label.clone();
                ui.label(RichText::new(label).color(style::palette().text_muted));
            });

            ui.horizontal(|ui| {
                ui.label("Epochs:");
                ui.add(
                    egui::DragValue::new(&mut self.controller.ui.training.epochs)
                        .range(100..=100_000)
                        .speed(50),
                );
            });
            ui.add_space(4.0);

            let can_start = !self.controller.ui.training.in_flight;
            if ui
                .add_enabled(can_start, egui::Button::new("Start Training"))
                .clicked()
            {
                self.controller.start_training();
            }
            ui.add_space(6.0);

            let progress = self.controller.ui.training.progress;
            let epoch_label = self.controller.ui.training.epoch_label.clone();
            ui.add(
                egui::ProgressBar::new(progress)
                    .desired_width(ui.available_width())
                    .text(epoch_label),
            );
            ui.add_space(4.0);
            ui.label(RichText::new(self.controller.ui.training.accuracy_readout.clone()).strong());
            ui.add_space(8.0);

            self.render_charts(ui);
        });
    }

    fn render_charts(&mut self, ui: &mut Ui) {
        let spacing = 10.0;
        let chart_width = ((ui.available_width() - spacing) / 2.0).max(200.0);
        let size = egui::vec2(chart_width, CHART_HEIGHT);
        ui.horizontal(|ui| {
            self.render_chart(
                ui,
                size,
                SeriesKind::Accuracy,
                ChartStyle::accuracy(),
                "Training Accuracy",
            );
            ui.add_space(spacing);
            self.render_chart(ui, size, SeriesKind::Loss, ChartStyle::loss(), "Training Loss");
        });
    }

    fn render_chart(
        &mut self,
        ui: &mut Ui,
        size: Vec2,
        kind: SeriesKind,
        chart_style: ChartStyle,
        title: &str,
    ) {
        let (rect, _response) = ui.allocate_exact_size(size, egui::Sense::hover());
        let range = match kind {
            SeriesKind::Accuracy => self.controller.accuracy_range(),
            SeriesKind::Loss => self.controller.loss_range(),
        };
        let frame = chart::build_frame(
            self.controller.visible_series(kind),
            range,
            rect.size(),
            &chart_style,
            title,
        );
        chart::paint_frame(ui.painter(), rect, &frame);
    }

    fn render_prediction_panel(&mut self, ui: &mut Ui) {
        let panel = Frame::new()
            .fill(style::palette().bg_secondary)
            .stroke(style::panel_border())
            .inner_margin(Margin::symmetric(12, 10));
        panel.show(ui, |ui| {
            ui.label(RichText::new("Fruit Prediction").strong());
            ui.add_space(6.0);

            egui::Grid::new("prediction_inputs")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    let prediction = &mut self.controller.ui.prediction;
                    ui.label("Weight (g)");
                    ui.text_edit_singleline(&mut prediction.weight_input);
                    ui.end_row();
                    ui.label("Size (cm)");
                    ui.text_edit_singleline(&mut prediction.size_input);
                    ui.end_row();
                    ui.label("Width (cm)");
                    ui.text_edit_singleline(&mut prediction.width_input);
                    ui.end_row();
                    ui.label("Height (cm)");
                    ui.text_edit_singleline(&mut prediction.height_input);
                    ui.end_row();
                });
            ui.add_space(6.0);

            if ui.button("Predict Fruit").clicked() {
                self.controller.predict();
            }
            ui.add_space(6.0);

            let (text, color) = match &self.controller.ui.prediction.result {
                Some(banner) => (banner.text.clone(), banner.color),
                None => ("Prediction: -".to_string(), Color32::GRAY),
            };
            ui.label(RichText::new(text).size(15.0).strong().color(color));
        });
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_background_jobs();
        self.controller.advance_playback(Instant::now());

        self.render_top_bar(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_training_panel(ui);
                ui.add_space(10.0);
                self.render_prediction_panel(ui);
            });
        });

        if self.controller.playback().is_running() {
            ctx.request_repaint_after(TICK_INTERVAL);
        } else if self.controller.ui.training.in_flight {
            // Keep polling the worker channel while the engine call runs.
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
