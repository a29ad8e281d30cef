//! Prediction workflow: per-field validation and the synchronous engine
//! call.

use super::*;

/// Which prediction form field failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureField {
    /// Weight in grams.
    Weight,
    /// Size in centimeters.
    Size,
    /// Width in centimeters.
    Width,
    /// Height in centimeters.
    Height,
}

impl FeatureField {
    /// Lowercase field name for user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            FeatureField::Weight => "weight",
            FeatureField::Size => "size",
            FeatureField::Width => "width",
            FeatureField::Height => "height",
        }
    }
}

/// A prediction form field that is missing, non-numeric or not positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {} (must be > 0)", .field.label())]
pub struct FeatureError {
    /// Field that failed validation.
    pub field: FeatureField,
}

/// Validate all four form fields into a boundary-ready input.
///
/// Fields are checked in form order and the first failure wins, so the
/// message always names a specific field.
pub(crate) fn parse_features(
    weight: &str,
    size: &str,
    width: &str,
    height: &str,
) -> Result<PredictionInput, FeatureError> {
    Ok(PredictionInput {
        weight: parse_field(weight, FeatureField::Weight)?,
        size: parse_field(size, FeatureField::Size)?,
        width: parse_field(width, FeatureField::Width)?,
        height: parse_field(height, FeatureField::Height)?,
    })
}

fn parse_field(text: &str, field: FeatureField) -> Result<f64, FeatureError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .ok_or(FeatureError { field })
}

impl EguiController {
    /// Validate the form and, if it passes, run one synchronous prediction.
    ///
    /// Validation failures are reported on the result line and never cross
    /// the boundary.
    pub fn predict(&mut self) {
        let parsed = parse_features(
            &self.ui.prediction.weight_input,
            &self.ui.prediction.size_input,
            &self.ui.prediction.width_input,
            &self.ui.prediction.height_input,
        );
        let input = match parsed {
            Ok(input) => input,
            Err(err) => {
                self.ui.prediction.result = Some(PredictionBanner {
                    text: err.to_string(),
                    color: palette().error,
                });
                return;
            }
        };
        let bridge = match self.ensure_bridge() {
            Ok(bridge) => bridge,
            Err(err) => {
                self.set_status(format!("Engine unavailable: {err}"), StatusTone::Error);
                return;
            }
        };
        match bridge.run_prediction(&input) {
            Ok(label) => {
                let color = if label == UNKNOWN_LABEL {
                    palette().warning
                } else {
                    palette().success
                };
                self.ui.prediction.result = Some(PredictionBanner {
                    text: format!("Prediction: {label}"),
                    color,
                });
            }
            Err(err) => self.set_status(format!("Prediction failed: {err}"), StatusTone::Error),
        }
    }
}
