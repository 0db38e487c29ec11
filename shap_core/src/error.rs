use thiserror::Error;

/// Errors raised while preparing or rendering an attribution overlay
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlotError {
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error("Label index {index} out of range for {len} labels")]
    LabelIndexOutOfRange { index: usize, len: usize },

    #[error("Shape error: {0}")]
    Shape(String),

    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(f32),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Encode error: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, PlotError>;
