//! Horizontal flip with paired label mirroring.

use std::sync::Arc;

use barn_core::{Error, Result};
use image::{imageops, ImageBuffer, Luma, LumaA, Pixel, Rgb, Rgba};
use rand_chacha::ChaCha8Rng;

use super::{arity_error, Processor};
use crate::field::Field;
use crate::raster::{Image, PixelData};

/// Maps a label to its value for the mirrored image
pub type MirrorFn = Arc<dyn Fn(Field) -> Result<Field> + Send + Sync>;

/// Mirrors an image left to right and maps its paired label.
///
/// Consumes `[image, label]`. The label goes through the mirror function,
/// negation by default, so a steering angle keeps pointing the right way.
#[derive(Clone)]
pub struct RandomFlip {
    mirror: MirrorFn,
}

impl RandomFlip {
    pub fn new() -> Self {
        Self {
            mirror: Arc::new(Field::negate),
        }
    }

    pub fn with_mirror<F>(mirror: F) -> Self
    where
        F: Fn(Field) -> Result<Field> + Send + Sync + 'static,
    {
        Self {
            mirror: Arc::new(mirror),
        }
    }
}

impl Default for RandomFlip {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RandomFlip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomFlip").finish_non_exhaustive()
    }
}

impl Processor for RandomFlip {
    fn name(&self) -> &str {
        "random_flip"
    }

    fn arity(&self) -> usize {
        2
    }

    fn transform(&self, inputs: Vec<Field>, _rng: &mut ChaCha8Rng) -> Result<Vec<Field>> {
        let [image, label]: [Field; 2] = inputs
            .try_into()
            .map_err(|inputs: Vec<Field>| arity_error(self.name(), 2, inputs.len()))?;
        let image = image.into_image()?;

        Ok(vec![
            Field::Image(flip_horizontal(&image)?),
            (self.mirror)(label)?,
        ])
    }
}

/// Mirrors an image left to right with `image::imageops`.
///
/// Supports 1 to 4 channels in either sample type.
pub fn flip_horizontal(image: &Image) -> Result<Image> {
    let (width, height, channels) = (image.width(), image.height(), image.channels());

    match image.clone().into_data() {
        PixelData::U8(data) => {
            let flipped = match channels {
                1 => flip_buffer::<Luma<u8>>(width, height, data)?,
                2 => flip_buffer::<LumaA<u8>>(width, height, data)?,
                3 => flip_buffer::<Rgb<u8>>(width, height, data)?,
                4 => flip_buffer::<Rgba<u8>>(width, height, data)?,
                n => return Err(unsupported_channels(n)),
            };
            Image::from_u8(width, height, channels, flipped)
        }
        PixelData::F32(data) => {
            let flipped = match channels {
                1 => flip_buffer::<Luma<f32>>(width, height, data)?,
                2 => flip_buffer::<LumaA<f32>>(width, height, data)?,
                3 => flip_buffer::<Rgb<f32>>(width, height, data)?,
                4 => flip_buffer::<Rgba<f32>>(width, height, data)?,
                n => return Err(unsupported_channels(n)),
            };
            Image::from_f32(width, height, channels, flipped)
        }
    }
}

fn flip_buffer<P>(width: u32, height: u32, data: Vec<P::Subpixel>) -> Result<Vec<P::Subpixel>>
where
    P: Pixel + 'static,
{
    let buffer = ImageBuffer::<P, Vec<P::Subpixel>>::from_raw(width, height, data)
        .ok_or_else(|| Error::Image(format!("Buffer too small for {}x{} image", width, height)))?;
    Ok(imageops::flip_horizontal(&buffer).into_raw())
}

fn unsupported_channels(channels: u32) -> Error {
    Error::InvalidArgument(format!("Cannot flip an image with {} channels", channels))
}
