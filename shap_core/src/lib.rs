//! Data preparation for SHAP attribution overlays on mel spectrograms.
//!
//! Everything here is pure array math: label lookup, channel reduction,
//! the symmetric color limit and axis scaling. Drawing lives in `shap_plot`.

pub mod attribution;
pub mod axes;
pub mod error;
pub mod labels;

pub use attribution::{reduce_channels, squeeze_spectrogram, symmetric_limit};
pub use axes::{mel_axis, time_axis, AxisKind, AxisSpec, Tick};
pub use error::{PlotError, Result};
pub use labels::{LabelSet, LABELS};
