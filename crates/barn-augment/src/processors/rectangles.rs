//! Random occlusion rectangles.

use barn_core::{RectanglesConfig, Result};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use super::{single_image, Processor};
use crate::field::Field;
use crate::raster::{Image, PixelData, Sample};

/// Colour channels are drawn from `0..COLOR_LIMIT` on the 8-bit scale
const COLOR_LIMIT: u8 = 200;

/// Inclusive pixel box of one occlusion rectangle.
///
/// The lower corner is clamped at zero; the upper corner is not clamped to
/// the image and may lie outside it. Drawing clips to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Rectangle {
    /// Box around a centre with the given half extents
    pub fn around(x_center: u32, y_center: u32, half_width: u32, half_height: u32) -> Self {
        Self {
            x0: x_center.saturating_sub(half_width),
            y0: y_center.saturating_sub(half_height),
            x1: x_center.saturating_add(half_width),
            y1: y_center.saturating_add(half_height),
        }
    }

    /// Whether the box, unclipped, fits inside a `width` × `height` image
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.x1 < width && self.y1 < height
    }
}

/// Draws filled, randomly coloured rectangles to simulate occlusion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomRectangles {
    config: RectanglesConfig,
}

impl RandomRectangles {
    pub fn new(config: RectanglesConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Default placement with `count` rectangles per call
    pub fn with_count(count: usize) -> Self {
        Self {
            config: RectanglesConfig {
                count,
                ..RectanglesConfig::default()
            },
        }
    }

    pub fn config(&self) -> &RectanglesConfig {
        &self.config
    }

    /// Samples the geometry of one rectangle
    pub fn sample_rectangle(&self, rng: &mut ChaCha8Rng) -> Rectangle {
        let c = &self.config;
        let half_width = rng.gen_range(c.min_width..=c.max_width) / 2;
        let half_height = rng.gen_range(c.min_half_height..=c.max_half_height);
        let x_center = rng.gen_range(c.left..=c.right);
        let y_center = rng.gen_range(c.top..=c.bottom);
        Rectangle::around(x_center, y_center, half_width, half_height)
    }

    /// Samples an 8-bit RGB colour
    pub fn sample_color(rng: &mut ChaCha8Rng) -> [u8; 3] {
        [
            rng.gen_range(0..COLOR_LIMIT),
            rng.gen_range(0..COLOR_LIMIT),
            rng.gen_range(0..COLOR_LIMIT),
        ]
    }

    /// Draws `count` rectangles onto a copy of `image`
    pub fn apply(&self, image: &Image, rng: &mut ChaCha8Rng) -> Image {
        let mut out = image.clone();
        for _ in 0..self.config.count {
            let rect = self.sample_rectangle(rng);
            let color = Self::sample_color(rng);
            trace!(?rect, ?color, "drawing occlusion rectangle");
            out = fill_rectangle(out, rect, color);
        }
        out
    }
}

impl Default for RandomRectangles {
    fn default() -> Self {
        Self {
            config: RectanglesConfig::default(),
        }
    }
}

impl Processor for RandomRectangles {
    fn name(&self) -> &str {
        "random_rectangles"
    }

    fn arity(&self) -> usize {
        1
    }

    fn transform(&self, inputs: Vec<Field>, rng: &mut ChaCha8Rng) -> Result<Vec<Field>> {
        let image = single_image(self.name(), inputs)?;
        Ok(vec![Field::Image(self.apply(&image, rng))])
    }
}

/// Fills `rect`, clipped to the image, with an 8-bit colour.
///
/// Gray images take the first colour channel; channels past the third
/// (alpha) are left as they are.
pub fn fill_rectangle(mut image: Image, rect: Rectangle, color: [u8; 3]) -> Image {
    let dims = image.dims();
    if dims.channels == 0 || rect.x0 >= dims.width || rect.y0 >= dims.height {
        return image;
    }

    let clipped = Rectangle {
        x1: rect.x1.min(dims.width - 1),
        y1: rect.y1.min(dims.height - 1),
        ..rect
    };
    let width = dims.width as usize;
    let channels = dims.channels as usize;

    match image.data_mut() {
        PixelData::U8(data) => fill_samples(data, width, channels, clipped, color),
        PixelData::F32(data) => fill_samples(data, width, channels, clipped, color),
    }
    image
}

fn fill_samples<T: Sample>(
    data: &mut [T],
    width: usize,
    channels: usize,
    rect: Rectangle,
    color: [u8; 3],
) {
    let painted = if channels >= 3 { 3 } else { 1 };
    let value = color.map(|v| T::from_f32(v as f32 / 255.0 * T::MAX));

    for y in rect.y0 as usize..=rect.y1 as usize {
        for x in rect.x0 as usize..=rect.x1 as usize {
            let base = (y * width + x) * channels;
            data[base..base + painted].copy_from_slice(&value[..painted]);
        }
    }
}
