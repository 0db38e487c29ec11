// Rendering configuration for attribution overlays

/// Figure geometry and display settings. Defaults reproduce the 9 x 2.5 inch
/// notebook figure at 100 dpi.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    pub fig_width: f32,
    pub fig_height: f32,
    pub dpi: u32,
    /// Multiplier applied to the reduced attributions before coloring.
    pub overlay_scale: f32,
    /// Opacity of the grayscale spectrogram under the attributions.
    pub backdrop_alpha: f32,
    pub hop_length: usize,
    pub fmin: f64,
    pub fmax: Option<f64>,
    pub n_ticks: usize,
    pub colorbar_label: String,
    /// Colorbar width as a fraction of the figure width.
    pub colorbar_width: f32,
    pub font_family: String,
    pub title_font_pt: f32,
    /// Tick labels and axis descriptions.
    pub label_font_pt: f32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            fig_width: 9.0,
            fig_height: 2.5,
            dpi: 100,
            overlay_scale: 2.0,
            backdrop_alpha: 0.20,
            hop_length: 512,
            fmin: 0.0,
            fmax: None,
            n_ticks: 5,
            colorbar_label: "Importance".to_string(),
            colorbar_width: 0.725,
            font_family: "sans-serif".to_string(),
            title_font_pt: 12.0,
            label_font_pt: 8.0,
        }
    }
}

impl PlotConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let fig_width = std::env::var("SHAP_PLOT_FIG_WIDTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.fig_width);

        let fig_height = std::env::var("SHAP_PLOT_FIG_HEIGHT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.fig_height);

        let dpi = std::env::var("SHAP_PLOT_DPI")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.dpi);

        let overlay_scale = std::env::var("SHAP_PLOT_OVERLAY_SCALE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.overlay_scale);

        let backdrop_alpha = std::env::var("SHAP_PLOT_BACKDROP_ALPHA")
            .ok()
            .and_then(|v| v.parse::<f32>().ok())
            .map(|a| a.clamp(0.0, 1.0))
            .unwrap_or(defaults.backdrop_alpha);

        let hop_length = std::env::var("SHAP_PLOT_HOP_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.hop_length);

        let fmax = std::env::var("SHAP_PLOT_FMAX")
            .ok()
            .and_then(|v| v.parse().ok());

        Self {
            fig_width,
            fig_height,
            dpi,
            overlay_scale,
            backdrop_alpha,
            hop_length,
            fmax,
            ..defaults
        }
    }

    /// Figure size in pixels, before the canvas is extended for the colorbar.
    pub fn pixel_size(&self) -> (u32, u32) {
        let w = (self.fig_width * self.dpi as f32).round().max(1.0) as u32;
        let h = (self.fig_height * self.dpi as f32).round().max(1.0) as u32;
        (w, h)
    }

    /// Point size to pixels at the configured dpi.
    pub fn font_px(&self, points: f32) -> f64 {
        (points * self.dpi as f32 / 72.0).max(1.0) as f64
    }
}

/// Serializes tests that touch process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
