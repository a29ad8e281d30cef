//! Controller owning the domain state behind the egui renderer.
//!
//! The controller holds the series buffer, the playback machine and the
//! engine bridge; the renderer only reads [`UiState`] and the chart views
//! exposed here.

mod jobs;
mod prediction;
mod training;

pub use prediction::{FeatureError, FeatureField};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::chart::{DisplayRange, auto_range};
use crate::config::{self, AppConfig};
use crate::egui_app::state::{PredictionBanner, UiState};
use crate::egui_app::ui::style::{StatusTone, palette, status_badge};
use crate::engine::{EngineBridge, EngineError, PredictionInput, TrainingError, TrainingRun, UNKNOWN_LABEL};
use crate::playback::{Phase, Playback, PlaybackClock};
use crate::series::{SeriesBuffer, SeriesError, SeriesKind};

use jobs::{JobMessage, JobRuntime};

/// Vertical range shown on the accuracy chart before any data arrives.
const DEFAULT_ACCURACY_RANGE: DisplayRange = DisplayRange { min: 0.0, max: 1.0 };
/// Vertical range shown on the loss chart before any data arrives.
const DEFAULT_LOSS_RANGE: DisplayRange = DisplayRange { min: 0.0, max: 2.0 };

/// Maintains app state and bridges core logic to the egui UI.
pub struct EguiController {
    /// View state read by the renderer.
    pub ui: UiState,
    settings: AppConfig,
    series: SeriesBuffer,
    playback: Playback,
    clock: PlaybackClock,
    final_accuracy: f64,
    accuracy_range: DisplayRange,
    loss_range: DisplayRange,
    runtime: JobRuntime,
    bridge: Option<Arc<EngineBridge>>,
}

impl Default for EguiController {
    fn default() -> Self {
        Self::new()
    }
}

impl EguiController {
    /// Create a controller with default settings and an empty run.
    pub fn new() -> Self {
        Self {
            ui: UiState::default(),
            settings: AppConfig::default(),
            series: SeriesBuffer::new(),
            playback: Playback::new(),
            clock: PlaybackClock::new(),
            final_accuracy: 0.0,
            accuracy_range: DEFAULT_ACCURACY_RANGE,
            loss_range: DEFAULT_LOSS_RANGE,
            runtime: JobRuntime::new(),
            bridge: None,
        }
    }

    /// Load persisted config and populate initial UI state.
    pub fn load_configuration(&mut self) -> Result<(), config::ConfigError> {
        let cfg = config::load_or_default()?;
        self.ui.training.epochs = cfg.epochs;
        if let Some(path) = cfg.dataset_path.clone() {
            self.ui.training.dataset_label = dataset_display_label(&path);
            self.ui.training.dataset_path = Some(path);
            self.set_status("Ready to train", StatusTone::Idle);
        }
        self.settings = cfg;
        Ok(())
    }

    /// Open a file dialog and adopt the picked dataset.
    pub fn select_dataset_via_dialog(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter("CSV files", &["csv"]);
        if let Some(dir) = self
            .ui
            .training
            .dataset_path
            .as_ref()
            .and_then(|path| path.parent())
        {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.pick_file() {
            self.set_dataset(path);
        }
    }

    /// Adopt a dataset file and persist the choice.
    pub fn set_dataset(&mut self, path: PathBuf) {
        self.ui.training.dataset_label = dataset_display_label(&path);
        self.set_status(format!("Dataset: {}", path.display()), StatusTone::Info);
        self.ui.training.dataset_path = Some(path.clone());
        self.settings.dataset_path = Some(path);
        self.persist_settings();
    }

    /// The visible prefix of one metric series for chart rendering.
    pub fn visible_series(&self, kind: SeriesKind) -> &[f64] {
        self.series
            .prefix(kind, self.playback.visible())
            .unwrap_or(&[])
    }

    /// Display range of the accuracy chart.
    pub fn accuracy_range(&self) -> DisplayRange {
        self.accuracy_range
    }

    /// Display range of the loss chart.
    pub fn loss_range(&self) -> DisplayRange {
        self.loss_range
    }

    /// The replay state machine, read-only.
    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Update the status bar text and badge.
    fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        let (badge_label, badge_color) = status_badge(tone);
        self.ui.status.text = text.into();
        self.ui.status.badge_label = badge_label;
        self.ui.status.badge_color = badge_color;
    }

    /// Persist settings, downgrading failures to a status warning.
    fn persist_settings(&mut self) {
        self.settings.epochs = self.ui.training.epochs;
        if let Err(err) = config::save(&self.settings) {
            tracing::warn!("Failed to persist config: {err}");
            self.set_status(format!("Failed to save settings: {err}"), StatusTone::Warning);
        }
    }

    /// Load the engine library on first use and cache the bridge.
    fn ensure_bridge(&mut self) -> Result<Arc<EngineBridge>, EngineError> {
        if let Some(bridge) = &self.bridge {
            return Ok(bridge.clone());
        }
        let bridge = Arc::new(EngineBridge::locate_and_load(
            self.settings.engine_library.as_deref(),
        )?);
        self.bridge = Some(bridge.clone());
        Ok(bridge)
    }

    #[cfg(test)]
    pub(crate) fn install_bridge_for_tests(&mut self, bridge: EngineBridge) {
        self.bridge = Some(Arc::new(bridge));
    }
}

/// Short display name of a dataset file.
fn dataset_display_label(path: &std::path::Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_label_uses_the_file_name() {
        assert_eq!(
            dataset_display_label(std::path::Path::new("/data/sets/fruit.csv")),
            "fruit.csv"
        );
    }

    #[test]
    fn new_controller_is_idle_with_defaults() {
        let controller = EguiController::new();
        assert_eq!(controller.playback().phase(), Phase::Idle);
        assert!(controller.visible_series(SeriesKind::Accuracy).is_empty());
        assert_eq!(controller.accuracy_range(), DEFAULT_ACCURACY_RANGE);
        assert_eq!(controller.loss_range(), DEFAULT_LOSS_RANGE);
        assert_eq!(controller.ui.status.badge_label, "Idle");
    }
}
