//! Pixel layout of the two-panel figure and its colorbar.
//!
//! Panel rectangles are the target plotting areas. Each chart is built on
//! a larger drawing area that also holds its caption and label areas.

use std::ops::Range;

use serde::Serialize;

use crate::config::PlotConfig;

// Default subplot parameters, as fractions of the figure.
const SUBPLOT_LEFT: f64 = 0.125;
const SUBPLOT_RIGHT: f64 = 0.9;
const SUBPLOT_BOTTOM: f64 = 0.11;
const SUBPLOT_TOP: f64 = 0.88;
const SUBPLOT_WSPACE: f64 = 0.2;

const COLORBAR_BOTTOM: f64 = -0.1;
const COLORBAR_HEIGHT: f64 = 0.03;
const COLORBAR_NUDGE: f64 = 0.01;
/// Room below the colorbar for its ticks and label.
const BOTTOM_PAD: f64 = 0.14;

/// Pixel rectangle, origin at the top-left of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// From the half-open pixel ranges a drawing area reports.
    pub fn from_ranges(x: Range<i32>, y: Range<i32>) -> Self {
        let x0 = x.start.max(0);
        let y0 = y.start.max(0);
        Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x.end - x0).max(0) as u32,
            height: (y.end - y0).max(0) as u32,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// A chart's full drawing area and the label areas carved out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartArea {
    pub outer: Rect,
    pub x_label_area: u32,
    pub y_label_area: u32,
}

impl ChartArea {
    /// Margins `(top, bottom, left, right)` that shrink a canvas-sized
    /// area down to `outer`.
    pub fn margins(&self, canvas_width: u32, canvas_height: u32) -> (i32, i32, i32, i32) {
        (
            self.outer.y as i32,
            canvas_height.saturating_sub(self.outer.bottom()) as i32,
            self.outer.x as i32,
            canvas_width.saturating_sub(self.outer.right()) as i32,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub figure_height: u32,
    pub panels: [Rect; 2],
    pub colorbar: Rect,
}

impl Layout {
    pub fn new(config: &PlotConfig) -> Self {
        let (w, h) = config.pixel_size();
        let (fw, fh) = (w as f64, h as f64);

        let n_cols = 2.0;
        let axes_w = (SUBPLOT_RIGHT - SUBPLOT_LEFT) / (n_cols + SUBPLOT_WSPACE * (n_cols - 1.0));
        let axes_h = SUBPLOT_TOP - SUBPLOT_BOTTOM;
        let left_2 = SUBPLOT_LEFT + axes_w * (1.0 + SUBPLOT_WSPACE);

        let panels = [
            frac_rect(fw, fh, SUBPLOT_LEFT, SUBPLOT_BOTTOM, axes_w, axes_h),
            frac_rect(fw, fh, left_2, SUBPLOT_BOTTOM, axes_w, axes_h),
        ];

        let cb_width = config.colorbar_width as f64;
        let cb_left = (1.0 - cb_width) / 2.0 + COLORBAR_NUDGE;
        let colorbar = frac_rect(fw, fh, cb_left, COLORBAR_BOTTOM, cb_width, COLORBAR_HEIGHT);

        // the colorbar hangs below the figure, so the canvas grows downward
        let extra = ((-COLORBAR_BOTTOM + BOTTOM_PAD) * fh).round() as u32;

        Self {
            canvas_width: w,
            canvas_height: h + extra,
            figure_height: h,
            panels,
            colorbar,
        }
    }

    /// Drawing area for panel `idx`. It spans the figure height so the
    /// caption sits above and the x labels below the plotting area. Only
    /// the first panel keeps a y label area.
    pub fn panel_area(&self, idx: usize) -> ChartArea {
        let panel = self.panels[idx];
        let left = if idx == 0 { 0 } else { panel.x };
        ChartArea {
            outer: Rect {
                x: left,
                y: 0,
                width: panel.right() - left,
                height: self.figure_height,
            },
            x_label_area: self.figure_height.saturating_sub(panel.bottom()),
            y_label_area: panel.x - left,
        }
    }

    pub fn colorbar_area(&self) -> ChartArea {
        let cb = self.colorbar;
        ChartArea {
            outer: Rect {
                x: cb.x,
                y: cb.y,
                width: cb.width,
                height: self.canvas_height.saturating_sub(cb.y),
            },
            x_label_area: self.canvas_height.saturating_sub(cb.bottom()),
            y_label_area: 0,
        }
    }
}

/// Convert a figure-fraction rectangle (origin bottom-left) into pixels.
fn frac_rect(fw: f64, fh: f64, left: f64, bottom: f64, width: f64, height: f64) -> Rect {
    let x0 = (left * fw).round().max(0.0);
    let x1 = ((left + width) * fw).round().max(x0);
    let y0 = ((1.0 - (bottom + height)) * fh).round().max(0.0);
    let y1 = ((1.0 - bottom) * fh).round().max(y0);
    Rect {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = Layout::new(&PlotConfig::default());
        assert_eq!(layout.canvas_width, 900);
        assert_eq!(layout.figure_height, 250);
        assert!(layout.canvas_height > 250);

        let [p1, p2] = layout.panels;
        assert_eq!(p1.width, p2.width);
        assert_eq!(p1.y, p2.y);
        assert_eq!(p1.height, p2.height);
        assert!(p1.right() < p2.x);
        assert!(p2.right() <= layout.canvas_width);
    }

    #[test]
    fn test_colorbar_below_panels() {
        let layout = Layout::new(&PlotConfig::default());
        let cb = layout.colorbar;
        assert!(cb.y > layout.figure_height);
        assert!(cb.bottom() < layout.canvas_height);
        assert!(cb.x > layout.panels[0].x);
        assert!(cb.right() > layout.panels[1].x);
        assert!(cb.height > 0);
    }

    #[test]
    fn test_panel_areas() {
        let layout = Layout::new(&PlotConfig::default());
        let first = layout.panel_area(0);
        assert_eq!(first.outer.x, 0);
        assert_eq!(first.y_label_area, layout.panels[0].x);
        assert_eq!(first.outer.bottom(), layout.figure_height);

        let second = layout.panel_area(1);
        assert_eq!(second.y_label_area, 0);
        assert_eq!(second.outer.x, layout.panels[1].x);
        assert_eq!(second.outer.right(), layout.panels[1].right());
        assert_eq!(
            second.x_label_area,
            layout.figure_height - layout.panels[1].bottom()
        );
    }

    #[test]
    fn test_colorbar_area_and_margins() {
        let layout = Layout::new(&PlotConfig::default());
        let area = layout.colorbar_area();
        assert_eq!(area.outer.bottom(), layout.canvas_height);
        assert!(area.x_label_area > 0);

        let (top, bottom, left, right) = area.margins(layout.canvas_width, layout.canvas_height);
        assert_eq!(top as u32, layout.colorbar.y);
        assert_eq!(bottom, 0);
        assert_eq!(left as u32, layout.colorbar.x);
        assert_eq!(right as u32, layout.canvas_width - layout.colorbar.right());
    }

    #[test]
    fn test_rect_helpers() {
        let r = Rect { x: 10, y: 20, width: 4, height: 6 };
        assert_eq!(r.center(), (12, 23));
        assert_eq!(r.right(), 14);
        assert_eq!(Rect::from_ranges(10..14, 20..26), r);
        assert_eq!(Rect::from_ranges(-3..2, 0..1).x, 0);
    }
}
