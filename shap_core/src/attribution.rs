//! Attribution array reduction.
//!
//! Attributions arrive as `(time, frequency, channel, class)`. One class
//! slice is selected and the channel axis is averaged away, leaving a map
//! that lines up with the `(time, frequency)` spectrogram.

use ndarray::{Array2, ArrayView2, ArrayView4, ArrayViewD, Axis, Ix2};
use tracing::debug;

use crate::error::{PlotError, Result};

const CLASS_AXIS: usize = 3;
const CHANNEL_AXIS: usize = 2;

/// Drop length-1 axes until the spectrogram is 2-D. Already 2-D input is
/// kept as-is even when one of its axes has length 1.
pub fn squeeze_spectrogram(spec: ArrayViewD<'_, f32>) -> Result<Array2<f32>> {
    if spec.ndim() == 2 {
        let view = spec
            .into_dimensionality::<Ix2>()
            .map_err(|e| PlotError::Shape(e.to_string()))?;
        return Ok(view.to_owned());
    }

    let dims: Vec<usize> = spec.shape().iter().copied().filter(|&d| d != 1).collect();
    if dims.len() != 2 {
        return Err(PlotError::Shape(format!(
            "spectrogram of shape {:?} does not squeeze to 2-D",
            spec.shape()
        )));
    }

    // iter() walks in logical row-major order regardless of memory layout
    Array2::from_shape_vec((dims[0], dims[1]), spec.iter().copied().collect())
        .map_err(|e| PlotError::Shape(e.to_string()))
}

/// Mean over the channel axis of one class slice.
pub fn reduce_channels(shap_values: ArrayView4<'_, f32>, class_idx: usize) -> Result<Array2<f32>> {
    let n_classes = shap_values.len_of(Axis(CLASS_AXIS));
    if class_idx >= n_classes {
        return Err(PlotError::Shape(format!(
            "class index {} outside class axis of length {}",
            class_idx, n_classes
        )));
    }

    let slice = shap_values.index_axis(Axis(CLASS_AXIS), class_idx);
    let reduced = slice.mean_axis(Axis(CHANNEL_AXIS)).ok_or_else(|| {
        PlotError::Shape("attribution array has an empty channel axis".to_string())
    })?;

    debug!(
        class_idx,
        channels = shap_values.len_of(Axis(CHANNEL_AXIS)),
        shape = ?reduced.shape(),
        "reduced attribution channels"
    );
    Ok(reduced)
}

/// Largest absolute finite value, used as a color limit symmetric about zero.
/// Returns 0.0 when there is nothing finite to look at.
pub fn symmetric_limit(values: ArrayView2<'_, f32>) -> f32 {
    let (min, max) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if min > max {
        return 0.0;
    }
    min.abs().max(max.abs())
}
