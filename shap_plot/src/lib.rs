//! SHAP attribution overlays for mel spectrograms.
//!
//! The figure has two panels: the spectrogram on its own, and the same
//! spectrogram faded to gray under a blue/red attribution map for one class.
//! A horizontal "Importance" colorbar sits beneath both.

pub mod colormap;
pub mod config;
pub mod figure;
pub mod layout;
pub mod raster;
pub mod render;

use ndarray::{ArrayView4, ArrayViewD};

pub use config::PlotConfig;
pub use figure::{Colorbar, Figure, OverlaySummary, Panel};
pub use render::ShapPlotter;
pub use shap_core::{LabelSet, PlotError, Result, LABELS};

/// Render with default settings and the emotion label set.
pub fn plot_shap_spec(
    shap_values: ArrayView4<'_, f32>,
    spec: ArrayViewD<'_, f32>,
    sample_rate: f32,
    pred: &str,
    true_label: &str,
    shap_idx: Option<usize>,
) -> Result<Figure> {
    ShapPlotter::default().plot(shap_values, spec, sample_rate, pred, true_label, shap_idx)
}
