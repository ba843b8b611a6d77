//! Random box blur.

use barn_core::{BlurConfig, Result};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{single_image, Processor};
use crate::field::Field;
use crate::raster::{Image, PixelData, Sample};

/// Convolves with a normalized square box kernel of random size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomBlur {
    config: BlurConfig,
}

impl RandomBlur {
    pub fn new(config: BlurConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn sample_kernel_size(&self, rng: &mut ChaCha8Rng) -> u32 {
        rng.gen_range(self.config.min_kernel..=self.config.max_kernel)
    }

    pub fn apply(&self, image: &Image, rng: &mut ChaCha8Rng) -> Image {
        let kernel_size = self.sample_kernel_size(rng);
        box_blur(image, kernel_size)
    }
}

impl Default for RandomBlur {
    fn default() -> Self {
        Self {
            config: BlurConfig::default(),
        }
    }
}

impl Processor for RandomBlur {
    fn name(&self) -> &str {
        "random_blur"
    }

    fn arity(&self) -> usize {
        1
    }

    fn transform(&self, inputs: Vec<Field>, rng: &mut ChaCha8Rng) -> Result<Vec<Field>> {
        let image = single_image(self.name(), inputs)?;
        Ok(vec![Field::Image(self.apply(&image, rng))])
    }
}

/// Applies a `kernel_size`² box filter with weights `1 / kernel_size²`.
///
/// The kernel anchor sits at `kernel_size / 2` on both axes, so even sizes
/// lean up and to the left. Borders mirror without repeating the edge
/// sample (`dcb|abcd|cba`).
pub fn box_blur(image: &Image, kernel_size: u32) -> Image {
    if kernel_size <= 1 {
        return image.clone();
    }

    let mut out = image.clone();
    match (image.data(), out.data_mut()) {
        (PixelData::U8(src), PixelData::U8(dst)) => convolve(src, dst, image, kernel_size),
        (PixelData::F32(src), PixelData::F32(dst)) => convolve(src, dst, image, kernel_size),
        _ => {}
    }
    out
}

fn convolve<T: Sample>(src: &[T], dst: &mut [T], image: &Image, kernel_size: u32) {
    let width = image.width() as i64;
    let height = image.height() as i64;
    let channels = image.channels() as usize;
    let k = kernel_size as i64;
    let anchor = k / 2;
    let weight = 1.0 / (k * k) as f32;

    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for ky in 0..k {
                    let sy = reflect_101(y + ky - anchor, height);
                    for kx in 0..k {
                        let sx = reflect_101(x + kx - anchor, width);
                        sum += src[(sy * width as usize + sx) * channels + c].to_f32();
                    }
                }
                dst[(y as usize * width as usize + x as usize) * channels + c] =
                    T::from_f32(sum * weight);
            }
        }
    }
}

/// Maps an out-of-range coordinate back inside `0..len` by mirroring
/// around the edge samples
fn reflect_101(mut p: i64, len: i64) -> usize {
    if len <= 1 {
        return 0;
    }
    loop {
        if p < 0 {
            p = -p;
        } else if p >= len {
            p = 2 * (len - 1) - p;
        } else {
            return p as usize;
        }
    }
}
