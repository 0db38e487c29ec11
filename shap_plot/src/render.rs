use ndarray::{ArrayView4, ArrayViewD};
use plotters::prelude::{BitMapBackend, IntoDrawingArea, WHITE};
use shap_core::{
    mel_axis, reduce_channels, squeeze_spectrogram, symmetric_limit, time_axis, LabelSet, Result,
};
use tracing::{debug, warn};

use crate::colormap::{greys_r, shap_diverging, viridis, Normalize};
use crate::config::PlotConfig;
use crate::figure::{Colorbar, Figure, OverlaySummary, Panel};
use crate::layout::Layout;
use crate::raster::{
    draw_axes, draw_colorbar, draw_frame, draw_heatmap, render_err, rgb_to_rgba, Fonts,
};

/// Draws a spectrogram next to the same spectrogram overlaid with its
/// attributions for one class.
#[derive(Debug, Clone, Default)]
pub struct ShapPlotter {
    config: PlotConfig,
    labels: LabelSet,
}

impl ShapPlotter {
    pub fn new(config: PlotConfig) -> Self {
        Self {
            config,
            labels: LabelSet::default(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(PlotConfig::from_env())
    }

    pub fn with_labels(mut self, labels: LabelSet) -> Self {
        self.labels = labels;
        self
    }

    /// Render both panels and the colorbar.
    ///
    /// `shap_values` is `(time, frequency, channel, class)` and `spec` is
    /// `(time, frequency)` after squeezing. Attributions are always
    /// aggregated at the predicted class; `shap_idx` only picks the class
    /// named in the attribution panel title.
    pub fn plot(
        &self,
        shap_values: ArrayView4<'_, f32>,
        spec: ArrayViewD<'_, f32>,
        sample_rate: f32,
        pred: &str,
        true_label: &str,
        shap_idx: Option<usize>,
    ) -> Result<Figure> {
        let pred_idx = self.labels.index_of(pred)?;
        let display_idx = shap_idx.unwrap_or(pred_idx);
        let display_name = self.labels.name(display_idx)?;

        let spec = squeeze_spectrogram(spec)?;
        let reduced = reduce_channels(shap_values, pred_idx)?;
        let lim = symmetric_limit(reduced.view());
        if reduced.dim() != spec.dim() {
            warn!(
                spec = ?spec.dim(),
                attributions = ?reduced.dim(),
                "spectrogram and attribution shapes differ; layers are stretched independently"
            );
        }

        let n_ticks = self.config.n_ticks;
        let x_axis = time_axis(spec.nrows(), sample_rate, self.config.hop_length, n_ticks)?;
        let y_axis = mel_axis(sample_rate, self.config.fmin, self.config.fmax, n_ticks)?;

        debug!(
            pred,
            true_label,
            pred_idx,
            display_idx,
            lim,
            "rendering attribution overlay"
        );

        let spec_title = format!("Label: {} | Pred: {}", true_label, pred);
        let shap_title = format!("Shap Values: {}", display_name);
        let overlay_y_axis = y_axis.clone().stripped();

        let layout = Layout::new(&self.config);
        let fonts = Fonts::new(&self.config);
        let (width, height) = (layout.canvas_width, layout.canvas_height);
        let shap_cmap = shap_diverging();
        let spec_norm = Normalize::auto(spec.iter());
        let scaled = &reduced * self.config.overlay_scale;

        let mut buf = vec![0u8; width as usize * height as usize * 3];
        let (spec_rect, shap_rect, colorbar_rect) = {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;

            let spec_rect = draw_axes(
                &root,
                &layout.panel_area(0),
                &spec_title,
                &x_axis,
                &y_axis,
                n_ticks,
                &fonts,
            )?;
            draw_heatmap(&root, spec_rect, spec.view(), &viridis(), spec_norm, 1.0)?;
            draw_frame(&root, spec_rect)?;

            let shap_rect = draw_axes(
                &root,
                &layout.panel_area(1),
                &shap_title,
                &x_axis,
                &overlay_y_axis,
                n_ticks,
                &fonts,
            )?;
            draw_heatmap(
                &root,
                shap_rect,
                spec.view(),
                &greys_r(),
                spec_norm,
                self.config.backdrop_alpha,
            )?;
            draw_heatmap(
                &root,
                shap_rect,
                scaled.view(),
                &shap_cmap,
                Normalize::new(-lim as f64, lim as f64),
                1.0,
            )?;
            draw_frame(&root, shap_rect)?;

            let colorbar_rect = draw_colorbar(
                &root,
                &layout.colorbar_area(),
                &shap_cmap,
                -lim,
                lim,
                &self.config.colorbar_label,
                n_ticks,
                &fonts,
            )?;

            root.present().map_err(render_err)?;
            (spec_rect, shap_rect, colorbar_rect)
        };
        let canvas = rgb_to_rgba(width, height, buf)?;

        let panels = [
            Panel {
                title: spec_title,
                rect: spec_rect,
                x_axis: x_axis.clone(),
                y_axis,
            },
            Panel {
                title: shap_title,
                rect: shap_rect,
                x_axis,
                y_axis: overlay_y_axis,
            },
        ];

        Ok(Figure {
            width,
            height,
            panels,
            colorbar: Colorbar {
                label: self.config.colorbar_label.clone(),
                rect: colorbar_rect,
                vmin: -lim,
                vmax: lim,
                orientation: "horizontal",
                outline_visible: false,
            },
            overlay: OverlaySummary {
                aggregated_class: pred_idx,
                display_class: display_idx,
                limit: lim,
            },
            reduced,
            canvas,
        })
    }
}
