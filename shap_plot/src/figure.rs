//! Rendered figure and its encodings.

use base64::Engine;
use image::{ImageEncoder, RgbaImage};
use ndarray::Array2;
use serde::Serialize;
use shap_core::{AxisSpec, PlotError, Result};

use crate::layout::Rect;

#[derive(Debug, Clone, Serialize)]
pub struct Panel {
    pub title: String,
    pub rect: Rect,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct Colorbar {
    pub label: String,
    pub rect: Rect,
    pub vmin: f32,
    pub vmax: f32,
    pub orientation: &'static str,
    pub outline_visible: bool,
}

/// Which class was aggregated and which one is named in the title.
/// They differ when the caller passes an override index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlaySummary {
    pub aggregated_class: usize,
    pub display_class: usize,
    pub limit: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub width: u32,
    pub height: u32,
    pub panels: [Panel; 2],
    pub colorbar: Colorbar,
    pub overlay: OverlaySummary,
    /// Channel-averaged attributions before scaling.
    #[serde(skip)]
    pub reduced: Array2<f32>,
    #[serde(skip)]
    pub(crate) canvas: RgbaImage,
}

impl Figure {
    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn spectrogram_panel(&self) -> &Panel {
        &self.panels[0]
    }

    pub fn attribution_panel(&self) -> &Panel {
        &self.panels[1]
    }

    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut png_bytes: Vec<u8> = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(
                self.canvas.as_raw(),
                self.canvas.width(),
                self.canvas.height(),
                image::ColorType::Rgba8,
            )
            .map_err(|e| PlotError::Encode(e.to_string()))?;
        Ok(png_bytes)
    }

    pub fn to_png_base64(&self) -> Result<String> {
        let png_bytes = self.to_png_bytes()?;
        Ok(base64::engine::general_purpose::STANDARD.encode(png_bytes))
    }

    /// `data:` URI for inline display in a notebook cell.
    pub fn to_data_uri(&self) -> Result<String> {
        Ok(format!("data:image/png;base64,{}", self.to_png_base64()?))
    }

    /// Titles, axes, colorbar and overlay summary as JSON.
    pub fn summary_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| PlotError::Encode(e.to_string()))
    }
}
