//! Common fixtures for overlay tests

#![allow(dead_code)]

use std::sync::Once;

use ndarray::{Array2, Array4, ArrayD};

static TRACING: Once = Once::new();

/// Install a test subscriber once per binary; RUST_LOG controls verbosity.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

pub const N_TIME: usize = 64;
pub const N_FREQ: usize = 32;
pub const N_CHANNELS: usize = 3;
pub const N_CLASSES: usize = 8;
pub const SAMPLE_RATE: f32 = 16000.0;

/// Attributions equal to `value` for one class and zero everywhere else.
pub fn class_filled(class_idx: usize, value: f32) -> Array4<f32> {
    Array4::from_shape_fn((N_TIME, N_FREQ, N_CHANNELS, N_CLASSES), |(_, _, _, l)| {
        if l == class_idx {
            value
        } else {
            0.0
        }
    })
}

/// Spectrogram rising along both time and frequency.
pub fn ramp_spectrogram() -> ArrayD<f32> {
    Array2::from_shape_fn((N_TIME, N_FREQ), |(t, f)| (t + f) as f32).into_dyn()
}
