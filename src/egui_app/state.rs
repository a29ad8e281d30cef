//! Shared state types for the egui UI.
//!
//! The controller owns and mutates these; the renderer only reads them.

use std::path::PathBuf;

use egui::Color32;

use crate::config::DEFAULT_EPOCHS;
use crate::egui_app::ui::style::{self, StatusTone};

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    /// Status bar badge and message.
    pub status: StatusBarState,
    /// Training panel: dataset, epochs, replay readouts.
    pub training: TrainingPanelState,
    /// Prediction form and its last result.
    pub prediction: PredictionPanelState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
            training: TrainingPanelState::default(),
            prediction: PredictionPanelState::default(),
        }
    }
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    /// Main status message text.
    pub text: String,
    /// Badge label shown next to the status.
    pub badge_label: String,
    /// Badge color.
    pub badge_color: Color32,
}

impl StatusBarState {
    /// Default status shown before any interaction.
    pub fn idle() -> Self {
        let (badge_label, badge_color) = style::status_badge(StatusTone::Idle);
        Self {
            text: "Select a dataset to get started".into(),
            badge_label,
            badge_color,
        }
    }
}

/// State of the training panel.
#[derive(Clone, Debug)]
pub struct TrainingPanelState {
    /// Dataset picked by the user, if any.
    pub dataset_path: Option<PathBuf>,
    /// Short display name of the dataset file.
    pub dataset_label: String,
    /// Epoch count requested for the next run.
    pub epochs: u32,
    /// Whether a training call is currently running on the worker thread.
    pub in_flight: bool,
    /// "Epoch: k/N" readout.
    pub epoch_label: String,
    /// Live accuracy readout, or the final summary once replay is done.
    pub accuracy_readout: String,
    /// Replay progress in `0..=1` for the progress bar.
    pub progress: f32,
}

impl Default for TrainingPanelState {
    fn default() -> Self {
        Self {
            dataset_path: None,
            dataset_label: "No dataset selected".into(),
            epochs: DEFAULT_EPOCHS,
            in_flight: false,
            epoch_label: format!("Epoch: 0/{DEFAULT_EPOCHS}"),
            accuracy_readout: "Current Accuracy: 0.00%".into(),
            progress: 0.0,
        }
    }
}

/// State of the prediction form.
#[derive(Clone, Debug, Default)]
pub struct PredictionPanelState {
    /// Weight field text, in grams.
    pub weight_input: String,
    /// Size field text, in centimeters.
    pub size_input: String,
    /// Width field text, in centimeters.
    pub width_input: String,
    /// Height field text, in centimeters.
    pub height_input: String,
    /// Last prediction outcome, colored by confidence.
    pub result: Option<PredictionBanner>,
}

/// One colored prediction result line.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionBanner {
    /// Display text.
    pub text: String,
    /// Success, warning or error color.
    pub color: Color32,
}
