//! Core value types shared by the augmentation crates.

use serde::{Deserialize, Serialize};

/// Image dimensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ImageDimensions {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Number of interleaved channels (e.g., 3 for RGB)
    pub channels: u32,
}

impl ImageDimensions {
    /// Creates new image dimensions
    pub fn new(width: u32, height: u32, channels: u32) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    /// Number of samples in a buffer of these dimensions
    pub fn sample_count(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }
}

impl std::fmt::Display for ImageDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.height, self.width, self.channels)
    }
}

/// Numeric type of the samples in an image buffer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SampleType {
    /// 8-bit unsigned, valid range 0..=255
    U8,
    /// 32-bit float, valid range 0.0..=1.0
    F32,
}

impl SampleType {
    /// Largest valid intensity for this sample type
    pub fn max_value(&self) -> f32 {
        match self {
            SampleType::U8 => 255.0,
            SampleType::F32 => 1.0,
        }
    }
}

impl std::fmt::Display for SampleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleType::U8 => write!(f, "u8"),
            SampleType::F32 => write!(f, "f32"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_dimensions() {
        let dims = ImageDimensions::new(160, 120, 3);
        assert_eq!(dims.sample_count(), 160 * 120 * 3);
        assert_eq!(dims.to_string(), "120x160x3");
    }

    #[test]
    fn test_sample_type_range() {
        assert_eq!(SampleType::U8.max_value(), 255.0);
        assert_eq!(SampleType::F32.max_value(), 1.0);
        assert_eq!(SampleType::F32.to_string(), "f32");
    }
}
