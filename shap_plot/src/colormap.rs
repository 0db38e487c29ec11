//! Colormaps and value normalization.
//!
//! A colormap is a lookup table of RGBA entries built by linear
//! interpolation between evenly spaced color stops.

use image::Rgba;

pub const DEFAULT_LUT_SIZE: usize = 256;

const TRANSPARENT: Rgba<f32> = Rgba([0.0, 0.0, 0.0, 0.0]);

const SHAP_BLUE: [f32; 3] = [30.0 / 255.0, 136.0 / 255.0, 229.0 / 255.0];
const SHAP_RED: [f32; 3] = [255.0 / 255.0, 13.0 / 255.0, 87.0 / 255.0];
const RAMP_STEPS: usize = 100;

/// Viridis anchor colors, evenly spaced.
const VIRIDIS: [[u8; 3]; 9] = [
    [0x44, 0x01, 0x54],
    [0x47, 0x2d, 0x7b],
    [0x3b, 0x52, 0x8b],
    [0x2c, 0x72, 0x8e],
    [0x21, 0x91, 0x8c],
    [0x28, 0xae, 0x80],
    [0x5e, 0xc9, 0x62],
    [0xad, 0xdc, 0x30],
    [0xfd, 0xe7, 0x25],
];

#[derive(Debug, Clone)]
pub struct Colormap {
    name: String,
    lut: Vec<Rgba<f32>>,
}

impl Colormap {
    /// Interpolate `stops` (placed evenly over [0, 1]) into an `n` entry table.
    pub fn from_list(name: &str, stops: &[Rgba<f32>], n: usize) -> Self {
        let n = n.max(1);
        let lut = match stops.len() {
            0 => vec![TRANSPARENT; n],
            1 => vec![stops[0]; n],
            k => (0..n)
                .map(|j| {
                    let x = if n == 1 { 0.0 } else { j as f32 / (n - 1) as f32 };
                    let s = x * (k - 1) as f32;
                    let i = (s.floor() as usize).min(k - 2);
                    lerp(stops[i], stops[i + 1], s - i as f32)
                })
                .collect(),
        };

        Self {
            name: name.to_string(),
            lut,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.lut.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lut.is_empty()
    }

    /// Color for a normalized value. Out of range values take the end
    /// colors; NaN is fully transparent.
    pub fn map(&self, x: f64) -> Rgba<f32> {
        if x.is_nan() {
            return TRANSPARENT;
        }
        let n = self.lut.len();
        let idx = (x.clamp(0.0, 1.0) * n as f64) as usize;
        self.lut[idx.min(n - 1)]
    }
}

fn lerp(a: Rgba<f32>, b: Rgba<f32>, t: f32) -> Rgba<f32> {
    let mut out = a;
    for c in 0..4 {
        out.0[c] = a.0[c] + (b.0[c] - a.0[c]) * t;
    }
    out
}

fn linspace(start: f32, end: f32, steps: usize) -> impl Iterator<Item = f32> {
    let denom = steps.saturating_sub(1).max(1) as f32;
    (0..steps).map(move |i| start + (end - start) * i as f32 / denom)
}

/// Blue for negative, red for positive, transparent at zero.
pub fn shap_diverging() -> Colormap {
    let [br, bg, bb] = SHAP_BLUE;
    let [rr, rg, rb] = SHAP_RED;
    let stops: Vec<Rgba<f32>> = linspace(1.0, 0.0, RAMP_STEPS)
        .map(|a| Rgba([br, bg, bb, a]))
        .chain(linspace(0.0, 1.0, RAMP_STEPS).map(|a| Rgba([rr, rg, rb, a])))
        .collect();
    Colormap::from_list("red_transparent_blue", &stops, DEFAULT_LUT_SIZE)
}

pub fn viridis() -> Colormap {
    let stops: Vec<Rgba<f32>> = VIRIDIS
        .iter()
        .map(|[r, g, b]| Rgba([*r as f32 / 255.0, *g as f32 / 255.0, *b as f32 / 255.0, 1.0]))
        .collect();
    Colormap::from_list("viridis", &stops, DEFAULT_LUT_SIZE)
}

pub fn greys_r() -> Colormap {
    Colormap::from_list(
        "Greys_r",
        &[Rgba([0.0, 0.0, 0.0, 1.0]), Rgba([1.0, 1.0, 1.0, 1.0])],
        DEFAULT_LUT_SIZE,
    )
}

/// Linear map from `[vmin, vmax]` onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub vmin: f64,
    pub vmax: f64,
}

impl Normalize {
    pub fn new(vmin: f64, vmax: f64) -> Self {
        Self { vmin, vmax }
    }

    /// Limits taken from the finite data range.
    pub fn auto<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a f32>,
    {
        let (lo, hi) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v as f64), hi.max(v as f64))
            });
        if lo > hi {
            return Self::new(0.0, 0.0);
        }
        Self::new(lo, hi)
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.vmin.is_finite() && self.vmax.is_finite() && self.vmax > self.vmin)
    }

    /// Non-finite input gives NaN. A degenerate range sends everything to
    /// the colormap center.
    pub fn apply(&self, v: f64) -> f64 {
        if !v.is_finite() {
            return f64::NAN;
        }
        // matplotlib sends a zero-width range to 0.0 (opaque blue here);
        // the center keeps an all-zero attribution map transparent instead
        if self.is_degenerate() {
            return 0.5;
        }
        (v - self.vmin) / (self.vmax - self.vmin)
    }
}
