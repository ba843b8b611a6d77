//! Random brightness through the HSV value channel.

use barn_core::{BrightnessConfig, Error, Result};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{single_image, Processor};
use crate::field::Field;
use crate::raster::{Image, PixelData, Sample};

/// Scales the HSV value of every pixel by a random factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomBrightness {
    config: BrightnessConfig,
}

impl RandomBrightness {
    pub fn new(config: BrightnessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn sample_factor(&self, rng: &mut ChaCha8Rng) -> f32 {
        rng.gen_range(self.config.min_factor..self.config.max_factor)
    }

    pub fn apply(&self, image: &Image, rng: &mut ChaCha8Rng) -> Result<Image> {
        let factor = self.sample_factor(rng);
        adjust_brightness(image, factor)
    }
}

impl Default for RandomBrightness {
    fn default() -> Self {
        Self {
            config: BrightnessConfig::default(),
        }
    }
}

impl Processor for RandomBrightness {
    fn name(&self) -> &str {
        "random_brightness"
    }

    fn arity(&self) -> usize {
        1
    }

    fn transform(&self, inputs: Vec<Field>, rng: &mut ChaCha8Rng) -> Result<Vec<Field>> {
        let image = single_image(self.name(), inputs)?;
        Ok(vec![Field::Image(self.apply(&image, rng)?)])
    }
}

/// Scales brightness by `factor`, clamping to the valid sample range.
///
/// Colour images (3 or 4 channels) are scaled on the HSV value channel so hue
/// and saturation are kept; alpha is untouched. Gray images are scaled
/// directly.
pub fn adjust_brightness(image: &Image, factor: f32) -> Result<Image> {
    let channels = image.channels() as usize;
    if !matches!(channels, 1 | 3 | 4) {
        return Err(Error::InvalidArgument(format!(
            "Brightness needs 1, 3 or 4 channels, got {}",
            channels
        )));
    }

    let mut out = image.clone();
    match out.data_mut() {
        PixelData::U8(data) => scale_value(data, channels, factor),
        PixelData::F32(data) => scale_value(data, channels, factor),
    }
    Ok(out)
}

fn scale_value<T: Sample>(data: &mut [T], channels: usize, factor: f32) {
    if channels == 1 {
        for v in data.iter_mut() {
            *v = T::from_f32((v.to_f32() * factor).clamp(0.0, T::MAX));
        }
        return;
    }

    for pixel in data.chunks_exact_mut(channels) {
        let rgb = [
            pixel[0].to_f32() / T::MAX,
            pixel[1].to_f32() / T::MAX,
            pixel[2].to_f32() / T::MAX,
        ];
        let (h, s, v) = rgb_to_hsv(rgb);
        let scaled = hsv_to_rgb(h, s, (v * factor).clamp(0.0, 1.0));
        for c in 0..3 {
            pixel[c] = T::from_f32((scaled[c] * T::MAX).clamp(0.0, T::MAX));
        }
    }
}

/// RGB in [0, 1] to (hue in degrees [0, 360), saturation, value)
fn rgb_to_hsv([r, g, b]: [f32; 3]) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max > 0.0 { delta / max } else { 0.0 };
    let h = if delta <= 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    (h, s, max)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let c = v * s;
    let sector = h / 60.0;
    let x = c * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match sector as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r + m, g + m, b + m]
}
