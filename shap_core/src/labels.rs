use serde::{Deserialize, Serialize};

use crate::error::{PlotError, Result};

/// Emotion classes in model output order.
pub const LABELS: [&str; 8] = [
    "neutral", "calm", "happy", "sad", "angry", "fear", "disgust", "surprise",
];

/// Ordered class names, used to go from a label to its position in the
/// attribution class axis and back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet {
    names: Vec<String>,
}

impl Default for LabelSet {
    fn default() -> Self {
        Self::new(LABELS.iter().map(|s| s.to_string()))
    }
}

impl LabelSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| PlotError::UnknownLabel(name.to_string()))
    }

    pub fn name(&self, index: usize) -> Result<&str> {
        self.names
            .get(index)
            .map(String::as_str)
            .ok_or(PlotError::LabelIndexOutOfRange {
                index,
                len: self.names.len(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
