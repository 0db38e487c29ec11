//! Drawing onto a `plotters` bitmap.
//!
//! Heatmap cells are placed in pixel space so neighbouring cells never
//! overlap; otherwise translucent layers would darken along cell edges.

use image::{DynamicImage, Rgba, RgbImage, RgbaImage};
use ndarray::ArrayView2;
use plotters::coord::Shift;
use plotters::prelude::{BitMapBackend, ChartBuilder, DrawingArea, Rectangle};
use plotters::style::{Color, FontDesc, FontFamily, FontStyle, RGBAColor, BLACK, TRANSPARENT};
use shap_core::{AxisSpec, PlotError, Result};

use crate::colormap::{Colormap, Normalize};
use crate::config::PlotConfig;
use crate::layout::{ChartArea, Rect};

pub type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub fn render_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Render(e.to_string())
}

/// Font family and pixel sizes derived from the config dpi.
#[derive(Debug, Clone)]
pub struct Fonts {
    family: String,
    title: f64,
    label: f64,
}

impl Fonts {
    pub fn new(config: &PlotConfig) -> Self {
        Self {
            family: config.font_family.clone(),
            title: config.font_px(config.title_font_pt),
            label: config.font_px(config.label_font_pt),
        }
    }

    fn title(&self) -> FontDesc<'_> {
        FontDesc::new(FontFamily::from(self.family.as_str()), self.title, FontStyle::Normal)
    }

    fn label(&self) -> FontDesc<'_> {
        FontDesc::new(FontFamily::from(self.family.as_str()), self.label, FontStyle::Normal)
    }
}

fn sub_area<'a>(root: &Canvas<'a>, area: &ChartArea) -> Canvas<'a> {
    let (w, h) = root.dim_in_pixel();
    let (top, bottom, left, right) = area.margins(w, h);
    root.margin(top, bottom, left, right)
}

fn to_color(c: Rgba<f32>, alpha: f32) -> Option<RGBAColor> {
    let a = (c.0[3] * alpha).clamp(0.0, 1.0);
    if a <= 0.0 {
        return None;
    }
    let [r, g, b, _] = c.0.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8);
    Some(RGBAColor(r, g, b, a as f64))
}

/// `n + 1` cell boundaries splitting `len` pixels as evenly as possible.
fn cell_edges(len: u32, n: usize) -> Vec<i32> {
    (0..=n)
        .map(|i| (i as u64 * len as u64 / n as u64) as i32)
        .collect()
}

/// Caption, axes and tick labels for one panel on a unit coordinate grid.
/// Returns the plotting rectangle the chart ended up with.
pub fn draw_axes(
    root: &Canvas<'_>,
    area: &ChartArea,
    title: &str,
    x_axis: &AxisSpec,
    y_axis: &AxisSpec,
    n_ticks: usize,
    fonts: &Fonts,
) -> Result<Rect> {
    let outer = sub_area(root, area);
    let mut chart = ChartBuilder::on(&outer)
        .caption(title, fonts.title())
        .x_label_area_size(area.x_label_area as i32)
        .y_label_area_size(area.y_label_area as i32)
        .build_cartesian_2d(0f64..1f64, 0f64..1f64)
        .map_err(render_err)?;

    let x_fmt = |v: &f64| x_axis.label_at(*v);
    let y_fmt = |v: &f64| y_axis.label_at(*v);

    {
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh()
            .x_labels(n_ticks)
            .x_label_formatter(&x_fmt)
            .x_desc(x_axis.label.as_str())
            .label_style(fonts.label())
            .axis_desc_style(fonts.label());
        if y_axis.has_ticks() {
            mesh.y_labels(n_ticks)
                .y_label_formatter(&y_fmt)
                .y_desc(y_axis.label.as_str());
        } else {
            mesh.y_labels(0);
        }
        mesh.draw().map_err(render_err)?;
    }

    let (xr, yr) = chart.plotting_area().get_pixel_range();
    Ok(Rect::from_ranges(xr, yr))
}

/// Stretch a `(time, frequency)` array over `rect`. Time runs left to right,
/// frequency bottom to top.
pub fn draw_heatmap(
    root: &Canvas<'_>,
    rect: Rect,
    data: ArrayView2<'_, f32>,
    cmap: &Colormap,
    norm: Normalize,
    alpha: f32,
) -> Result<()> {
    let (n_time, n_freq) = data.dim();
    if n_time == 0 || n_freq == 0 || rect.width == 0 || rect.height == 0 {
        return Ok(());
    }

    let x_edges = cell_edges(rect.width, n_time);
    let y_edges = cell_edges(rect.height, n_freq);
    let last_row = rect.bottom() as i32 - 1;

    for t in 0..n_time {
        let x0 = rect.x as i32 + x_edges[t];
        let x1 = rect.x as i32 + x_edges[t + 1] - 1;
        if x1 < x0 {
            continue;
        }
        for f in 0..n_freq {
            // write bottom-up so low bins are at the bottom
            let y1 = last_row - y_edges[f];
            let y0 = last_row - (y_edges[f + 1] - 1);
            if y1 < y0 {
                continue;
            }
            let color = cmap.map(norm.apply(data[[t, f]] as f64));
            if let Some(c) = to_color(color, alpha) {
                root.draw(&Rectangle::new([(x0, y0), (x1, y1)], c.filled()))
                    .map_err(render_err)?;
            }
        }
    }
    Ok(())
}

/// One pixel outline just inside `rect`.
pub fn draw_frame(root: &Canvas<'_>, rect: Rect) -> Result<()> {
    if rect.width == 0 || rect.height == 0 {
        return Ok(());
    }
    let corners = [
        (rect.x as i32, rect.y as i32),
        (rect.right() as i32 - 1, rect.bottom() as i32 - 1),
    ];
    root.draw(&Rectangle::new(corners, BLACK.stroke_width(1)))
        .map_err(render_err)
}

/// Horizontal colorbar: the full colormap as a gradient over
/// `[vmin, vmax]`, tick labels and a description, no outline.
#[allow(clippy::too_many_arguments)]
pub fn draw_colorbar(
    root: &Canvas<'_>,
    area: &ChartArea,
    cmap: &Colormap,
    vmin: f32,
    vmax: f32,
    label: &str,
    n_ticks: usize,
    fonts: &Fonts,
) -> Result<Rect> {
    let outer = sub_area(root, area);
    let mut chart = ChartBuilder::on(&outer)
        .x_label_area_size(area.x_label_area as i32)
        .build_cartesian_2d(0f64..1f64, 0f64..1f64)
        .map_err(render_err)?;

    let (lo, span) = (vmin as f64, (vmax - vmin) as f64);
    let fmt = |v: &f64| format!("{:.2}", lo + span * *v);
    chart
        .configure_mesh()
        .disable_mesh()
        .axis_style(&TRANSPARENT)
        .y_labels(0)
        .x_labels(n_ticks)
        .x_label_formatter(&fmt)
        .x_desc(label)
        .label_style(fonts.label())
        .axis_desc_style(fonts.label())
        .draw()
        .map_err(render_err)?;

    let (xr, yr) = chart.plotting_area().get_pixel_range();
    let rect = Rect::from_ranges(xr, yr);
    if rect.height == 0 {
        return Ok(rect);
    }

    let (top, last_row) = (rect.y as i32, rect.bottom() as i32 - 1);
    for px in 0..rect.width {
        let frac = (px as f64 + 0.5) / rect.width as f64;
        if let Some(c) = to_color(cmap.map(frac), 1.0) {
            let x = (rect.x + px) as i32;
            root.draw(&Rectangle::new([(x, top), (x, last_row)], c.filled()))
                .map_err(render_err)?;
        }
    }
    Ok(rect)
}

/// Wrap the backend's RGB buffer as an RGBA image.
pub fn rgb_to_rgba(width: u32, height: u32, buf: Vec<u8>) -> Result<RgbaImage> {
    let rgb = RgbImage::from_raw(width, height, buf)
        .ok_or_else(|| PlotError::Render("canvas buffer size mismatch".to_string()))?;
    Ok(DynamicImage::ImageRgb8(rgb).into_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::{greys_r, shap_diverging};
    use ndarray::Array2;
    use plotters::prelude::{IntoDrawingArea, WHITE};

    fn render<F>(w: u32, h: u32, draw: F) -> RgbaImage
    where
        F: FnOnce(&Canvas<'_>),
    {
        let mut buf = vec![0u8; (w * h * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
            root.fill(&WHITE).unwrap();
            draw(&root);
            root.present().unwrap();
        }
        rgb_to_rgba(w, h, buf).unwrap()
    }

    const WHITE_PX: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK_PX: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn test_cell_edges() {
        assert_eq!(cell_edges(10, 4), vec![0, 2, 5, 7, 10]);
        assert_eq!(cell_edges(2, 4), vec![0, 0, 1, 1, 2]);
    }

    #[test]
    fn test_to_color() {
        assert!(to_color(Rgba([1.0, 0.0, 0.0, 0.0]), 1.0).is_none());
        let c = to_color(Rgba([1.0, 13.0 / 255.0, 87.0 / 255.0, 1.0]), 0.5).unwrap();
        assert_eq!((c.0, c.1, c.2), (255, 13, 87));
        assert!((c.3 - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_heatmap_orientation() {
        // low time index on the left, low frequency at the bottom
        let mut data = Array2::<f32>::zeros((2, 2));
        data[[0, 0]] = 1.0;
        let img = render(4, 4, |root| {
            let rect = Rect { x: 0, y: 0, width: 4, height: 4 };
            draw_heatmap(root, rect, data.view(), &greys_r(), Normalize::new(0.0, 1.0), 1.0).unwrap();
        });

        assert_eq!(*img.get_pixel(0, 3), WHITE_PX);
        assert_eq!(*img.get_pixel(3, 3), BLACK_PX);
        assert_eq!(*img.get_pixel(0, 0), BLACK_PX);
    }

    #[test]
    fn test_translucent_cells_do_not_overlap() {
        let data = Array2::<f32>::zeros((7, 5));
        let img = render(20, 20, |root| {
            let rect = Rect { x: 0, y: 0, width: 20, height: 20 };
            draw_heatmap(root, rect, data.view(), &greys_r(), Normalize::new(0.0, 1.0), 0.5).unwrap();
        });
        // every pixel was blended exactly once
        let first = *img.get_pixel(0, 0);
        assert_ne!(first, WHITE_PX);
        assert!(img.pixels().all(|p| *p == first));
    }

    #[test]
    fn test_frame() {
        let img = render(6, 6, |root| {
            draw_frame(root, Rect { x: 1, y: 1, width: 4, height: 4 }).unwrap();
        });
        assert_eq!(*img.get_pixel(1, 1), BLACK_PX);
        assert_eq!(*img.get_pixel(4, 4), BLACK_PX);
        assert_eq!(*img.get_pixel(2, 2), WHITE_PX);
        assert_eq!(*img.get_pixel(0, 0), WHITE_PX);
    }

    #[test]
    fn test_colorbar_gradient() {
        let fonts = Fonts::new(&PlotConfig::default());
        let mut drawn = None;
        let img = render(240, 60, |root| {
            let area = ChartArea {
                outer: Rect { x: 20, y: 0, width: 200, height: 60 },
                x_label_area: 40,
                y_label_area: 0,
            };
            drawn = Some(
                draw_colorbar(root, &area, &shap_diverging(), -1.0, 1.0, "Importance", 5, &fonts)
                    .unwrap(),
            );
        });
        let rect = drawn.unwrap();
        assert!(rect.width > 100);

        let row = rect.y + rect.height / 2;
        assert_eq!(*img.get_pixel(rect.x, row), Rgba([30, 136, 229, 255]));
        assert_eq!(*img.get_pixel(rect.right() - 1, row), Rgba([255, 13, 87, 255]));
        let mid = img.get_pixel(rect.x + rect.width / 2, row);
        assert!(mid.0[..3].iter().all(|&c| c > 240));

        // tick labels and the description land below the bar
        let text = (rect.bottom()..60)
            .flat_map(|y| (0..240).map(move |x| (x, y)))
            .filter(|&(x, y)| *img.get_pixel(x, y) != WHITE_PX)
            .count();
        assert!(text > 0);
    }

    #[test]
    fn test_rgb_to_rgba_size_mismatch() {
        assert!(matches!(rgb_to_rgba(2, 2, vec![0; 5]), Err(PlotError::Render(_))));
    }
}
