//! Time and mel-frequency axis scaling.
//!
//! The sample rate is only used here: it turns frame indices into seconds
//! and mel bins into Hz so the panels can carry meaningful tick labels.

use serde::Serialize;

use crate::error::{PlotError, Result};

/// Slaney mel scale constants.
const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

fn log_step() -> f64 {
    6.4f64.ln() / 27.0
}

pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Time,
    Mel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    /// Fraction along the axis, 0.0 at the origin.
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub kind: AxisKind,
    pub label: String,
    /// Data range covered by the axis (seconds or Hz).
    pub extent: (f64, f64),
    pub ticks: Vec<Tick>,
}

impl AxisSpec {
    fn new(kind: AxisKind, label: &str, extent: (f64, f64), n_ticks: usize) -> Self {
        let mut axis = Self {
            kind,
            label: label.to_string(),
            extent,
            ticks: Vec::new(),
        };
        let ticks = tick_positions(n_ticks)
            .map(|p| Tick {
                position: p,
                label: axis.label_at(p),
            })
            .collect();
        axis.ticks = ticks;
        axis
    }

    /// Value at a fraction along the axis. Mel axes are linear in mels,
    /// not in Hz.
    pub fn value_at(&self, position: f64) -> f64 {
        let (lo, hi) = self.extent;
        match self.kind {
            AxisKind::Time => lo + (hi - lo) * position,
            AxisKind::Mel => {
                let (m_lo, m_hi) = (hz_to_mel(lo), hz_to_mel(hi));
                mel_to_hz(m_lo + (m_hi - m_lo) * position)
            }
        }
    }

    /// Tick text for a fraction along the axis.
    pub fn label_at(&self, position: f64) -> String {
        let value = self.value_at(position);
        match self.kind {
            AxisKind::Time => format!("{:.2}", value),
            AxisKind::Mel => format_hz(value),
        }
    }

    pub fn has_ticks(&self) -> bool {
        !self.ticks.is_empty()
    }

    /// Same scaling with ticks and label removed.
    pub fn stripped(mut self) -> Self {
        self.ticks.clear();
        self.label.clear();
        self
    }
}

fn check_sample_rate(sample_rate: f32) -> Result<f64> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(sample_rate as f64)
    } else {
        Err(PlotError::InvalidSampleRate(sample_rate))
    }
}

fn tick_positions(n_ticks: usize) -> impl Iterator<Item = f64> {
    let denom = n_ticks.saturating_sub(1).max(1) as f64;
    (0..n_ticks).map(move |i| i as f64 / denom)
}

/// Time axis for `n_frames` frames spaced `hop_length` samples apart.
pub fn time_axis(n_frames: usize, sample_rate: f32, hop_length: usize, n_ticks: usize) -> Result<AxisSpec> {
    let sr = check_sample_rate(sample_rate)?;
    let duration = n_frames as f64 * hop_length as f64 / sr;
    Ok(AxisSpec::new(AxisKind::Time, "Time", (0.0, duration), n_ticks))
}

/// Mel axis from `fmin` up to `fmax`, defaulting to Nyquist.
pub fn mel_axis(sample_rate: f32, fmin: f64, fmax: Option<f64>, n_ticks: usize) -> Result<AxisSpec> {
    let sr = check_sample_rate(sample_rate)?;
    let fmax = fmax.unwrap_or(sr / 2.0);
    Ok(AxisSpec::new(AxisKind::Mel, "Hz", (fmin, fmax), n_ticks))
}

fn format_hz(hz: f64) -> String {
    if hz >= 1000.0 {
        format!("{:.1}k", hz / 1000.0)
    } else {
        format!("{:.0}", hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6 * b.abs().max(1.0)
    }

    #[test]
    fn test_mel_scale_linear_region() {
        assert!(close(hz_to_mel(200.0), 3.0));
        assert!(close(mel_to_hz(3.0), 200.0));
        assert!(close(hz_to_mel(1000.0), 15.0));
    }

    #[test]
    fn test_mel_scale_round_trip_log_region() {
        for hz in [1500.0, 4000.0, 8000.0] {
            assert!(close(mel_to_hz(hz_to_mel(hz)), hz));
        }
    }

    #[test]
    fn test_time_axis_duration() {
        let axis = time_axis(64, 16000.0, 512, 5).unwrap();
        assert_eq!(axis.kind, AxisKind::Time);
        assert!(close(axis.extent.1, 64.0 * 512.0 / 16000.0));
        assert_eq!(axis.ticks.len(), 5);
        assert_eq!(axis.ticks[0].label, "0.00");
        assert_eq!(axis.ticks[4].label, "2.05");
        assert_eq!(axis.ticks[4].position, 1.0);
    }

    #[test]
    fn test_mel_axis_defaults_to_nyquist() {
        let axis = mel_axis(16000.0, 0.0, None, 3).unwrap();
        assert_eq!(axis.extent, (0.0, 8000.0));
        assert_eq!(axis.ticks[0].label, "0");
        assert_eq!(axis.ticks[2].label, "8.0k");
    }

    #[test]
    fn test_mel_axis_is_linear_in_mels() {
        let axis = mel_axis(16000.0, 0.0, None, 3).unwrap();
        let mid = axis.value_at(0.5);
        assert!(close(hz_to_mel(mid), hz_to_mel(8000.0) / 2.0));
        // the midpoint in mels sits well below the midpoint in Hz
        assert!(mid < 4000.0);
        assert_eq!(axis.label_at(0.5), axis.ticks[1].label);
    }

    #[test]
    fn test_invalid_sample_rate() {
        assert_eq!(
            time_axis(10, 0.0, 512, 5),
            Err(PlotError::InvalidSampleRate(0.0))
        );
        assert!(mel_axis(-1.0, 0.0, None, 5).is_err());
        assert!(mel_axis(f32::NAN, 0.0, None, 5).is_err());
    }

    #[test]
    fn test_stripped_axis() {
        let axis = mel_axis(22050.0, 0.0, None, 5).unwrap().stripped();
        assert!(!axis.has_ticks());
        assert!(axis.label.is_empty());
        assert_eq!(axis.kind, AxisKind::Mel);
    }
}
