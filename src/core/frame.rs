//! PSD frame and signal classification

use std::fmt;

use super::errors::ValidationError;

/// Number of frequency bins in every PSD frame
pub const FRAME_LEN: usize = 8192;

/// Dominant signal type reported alongside each frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Classification {
    WiFi,
    Bluetooth,
    #[default]
    Unknown,
    /// Any other label the producer sends
    Other(String),
}

impl Classification {
    pub fn from_label(label: &str) -> Self {
        match label {
            "WiFi" => Classification::WiFi,
            "Bluetooth" => Classification::Bluetooth,
            "Unknown" | "" => Classification::Unknown,
            other => Classification::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Classification::WiFi => "WiFi",
            Classification::Bluetooth => "Bluetooth",
            Classification::Unknown => "Unknown",
            Classification::Other(label) => label,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One validated PSD measurement. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    values: Vec<f32>,
    classification: Classification,
}

impl Frame {
    /// Build a frame, checking length and that every value is finite and in [0, 1].
    pub fn new(values: Vec<f32>, classification: Classification) -> Result<Self, ValidationError> {
        if values.len() != FRAME_LEN {
            return Err(ValidationError::WrongLength {
                expected: FRAME_LEN,
                actual: values.len(),
            });
        }
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || !(0.0..=1.0).contains(*v))
        {
            return Err(ValidationError::OutOfRange {
                index,
                value: value as f64,
            });
        }
        Ok(Self {
            values,
            classification,
        })
    }

    /// Flat frame at a constant level, used for "draw mock data".
    pub fn uniform(level: f32) -> Self {
        let level = if level.is_finite() {
            level.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            values: vec![level; FRAME_LEN],
            classification: Classification::Unknown,
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn into_parts(self) -> (Vec<f32>, Classification) {
        (self.values, self.classification)
    }
}
