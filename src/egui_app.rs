//! egui application: controller, view state and renderer.

/// Controller owning domain state and background jobs.
pub mod controller;
/// View-state structs consumed by the renderer.
pub mod state;
/// The eframe renderer and visual styling.
pub mod ui;
