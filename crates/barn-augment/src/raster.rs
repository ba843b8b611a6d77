//! Interleaved H×W×C pixel buffers.
//!
//! Images are stored row-major with channels interleaved, in either 8-bit or
//! 32-bit float samples. Processors work on both through the [`Sample`]
//! trait; conversion to and from the `image` crate is provided for I/O.

use barn_core::{Error, ImageDimensions, Result, SampleType};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage, Rgba, RgbaImage};

/// Numeric sample stored in an image buffer
pub trait Sample: Copy + PartialEq + Send + Sync + 'static {
    /// Largest valid intensity
    const MAX: f32;

    fn to_f32(self) -> f32;

    /// Converts back from float. `u8` rounds half to even and saturates,
    /// `f32` is passed through.
    fn from_f32(value: f32) -> Self;
}

impl Sample for u8 {
    const MAX: f32 = 255.0;

    fn to_f32(self) -> f32 {
        self as f32
    }

    fn from_f32(value: f32) -> Self {
        value.round_ties_even().clamp(0.0, 255.0) as u8
    }
}

impl Sample for f32 {
    const MAX: f32 = 1.0;

    fn to_f32(self) -> f32 {
        self
    }

    fn from_f32(value: f32) -> Self {
        value
    }
}

/// Typed sample storage
#[derive(Debug, Clone, PartialEq)]
pub enum PixelData {
    U8(Vec<u8>),
    F32(Vec<f32>),
}

impl PixelData {
    pub fn len(&self) -> usize {
        match self {
            PixelData::U8(data) => data.len(),
            PixelData::F32(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sample_type(&self) -> SampleType {
        match self {
            PixelData::U8(_) => SampleType::U8,
            PixelData::F32(_) => SampleType::F32,
        }
    }
}

/// An H×W×C image
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    dims: ImageDimensions,
    data: PixelData,
}

impl Image {
    /// Creates an image, checking the buffer length against the dimensions
    pub fn new(dims: ImageDimensions, data: PixelData) -> Result<Self> {
        if dims.channels == 0 {
            return Err(Error::InvalidArgument(
                "Image must have at least one channel".to_string(),
            ));
        }
        if data.len() != dims.sample_count() {
            return Err(Error::InvalidArgument(format!(
                "Buffer of {} samples does not match image shape {}",
                data.len(),
                dims
            )));
        }
        Ok(Self { dims, data })
    }

    pub fn from_u8(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(ImageDimensions::new(width, height, channels), PixelData::U8(data))
    }

    pub fn from_f32(width: u32, height: u32, channels: u32, data: Vec<f32>) -> Result<Self> {
        Self::new(ImageDimensions::new(width, height, channels), PixelData::F32(data))
    }

    /// Creates an 8-bit image with every sample set to `value`
    pub fn filled_u8(width: u32, height: u32, channels: u32, value: u8) -> Result<Self> {
        let dims = ImageDimensions::new(width, height, channels);
        Self::new(dims, PixelData::U8(vec![value; dims.sample_count()]))
    }

    /// Creates a float image with every sample set to `value`
    pub fn filled_f32(width: u32, height: u32, channels: u32, value: f32) -> Result<Self> {
        let dims = ImageDimensions::new(width, height, channels);
        Self::new(dims, PixelData::F32(vec![value; dims.sample_count()]))
    }

    pub fn dims(&self) -> ImageDimensions {
        self.dims
    }

    pub fn width(&self) -> u32 {
        self.dims.width
    }

    pub fn height(&self) -> u32 {
        self.dims.height
    }

    pub fn channels(&self) -> u32 {
        self.dims.channels
    }

    pub fn sample_type(&self) -> SampleType {
        self.data.sample_type()
    }

    pub fn data(&self) -> &PixelData {
        &self.data
    }

    pub fn into_data(self) -> PixelData {
        self.data
    }

    /// Mutable samples; the buffer length must not change
    pub(crate) fn data_mut(&mut self) -> &mut PixelData {
        &mut self.data
    }

    /// Offset of sample (x, y, c) in the buffer
    pub fn index(&self, x: u32, y: u32, c: u32) -> usize {
        ((y as usize * self.dims.width as usize) + x as usize) * self.dims.channels as usize
            + c as usize
    }

    /// Sample (x, y, c) widened to f32
    pub fn sample(&self, x: u32, y: u32, c: u32) -> f32 {
        let ix = self.index(x, y, c);
        match &self.data {
            PixelData::U8(data) => data[ix].to_f32(),
            PixelData::F32(data) => data[ix],
        }
    }

    /// All channels of the pixel at (x, y), widened to f32
    pub fn pixel(&self, x: u32, y: u32) -> Vec<f32> {
        (0..self.dims.channels).map(|c| self.sample(x, y, c)).collect()
    }

    /// Converts to 8-bit samples, scaling float images by 255
    pub fn to_u8(&self) -> Image {
        Image {
            dims: self.dims,
            data: PixelData::U8(self.quantized()),
        }
    }

    fn quantized(&self) -> Vec<u8> {
        match &self.data {
            PixelData::U8(data) => data.clone(),
            PixelData::F32(data) => data.iter().map(|&v| u8::from_f32(v * 255.0)).collect(),
        }
    }

    /// Converts to float samples in [0, 1]
    pub fn to_f32(&self) -> Image {
        let data = match &self.data {
            PixelData::U8(data) => data.iter().map(|&v| v as f32 / 255.0).collect(),
            PixelData::F32(data) => data.clone(),
        };
        Image {
            dims: self.dims,
            data: PixelData::F32(data),
        }
    }

    pub fn from_rgb8(img: &RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            dims: ImageDimensions::new(width, height, 3),
            data: PixelData::U8(img.as_raw().clone()),
        }
    }

    pub fn from_gray8(img: &GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            dims: ImageDimensions::new(width, height, 1),
            data: PixelData::U8(img.as_raw().clone()),
        }
    }

    pub fn from_rgba8(img: &RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            dims: ImageDimensions::new(width, height, 4),
            data: PixelData::U8(img.as_raw().clone()),
        }
    }

    /// Converts a decoded image, keeping gray and RGBA layouts and
    /// collapsing everything else to 8-bit RGB
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        match img {
            DynamicImage::ImageLuma8(gray) => Self::from_gray8(gray),
            DynamicImage::ImageRgba8(rgba) => Self::from_rgba8(rgba),
            other => Self::from_rgb8(&other.to_rgb8()),
        }
    }

    /// Converts to an `image` crate buffer; float images are quantized to 8 bits
    pub fn to_dynamic(&self) -> Result<DynamicImage> {
        let (width, height) = (self.dims.width, self.dims.height);
        let raw = self.quantized();

        let too_small = || Error::Image(format!("Buffer too small for {}", self.dims));
        match self.dims.channels {
            1 => ImageBuffer::<Luma<u8>, _>::from_raw(width, height, raw)
                .map(DynamicImage::ImageLuma8)
                .ok_or_else(too_small),
            3 => ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, raw)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(too_small),
            4 => ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, raw)
                .map(DynamicImage::ImageRgba8)
                .ok_or_else(too_small),
            n => Err(Error::Image(format!(
                "Cannot convert a {}-channel image",
                n
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image() -> RgbImage {
        let mut img = ImageBuffer::new(4, 2);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([(x * 60) as u8, (y * 100) as u8, 7]);
        }
        img
    }

    #[test]
    fn test_buffer_length_checked() {
        assert!(Image::from_u8(2, 2, 3, vec![0; 12]).is_ok());
        assert!(matches!(
            Image::from_u8(2, 2, 3, vec![0; 11]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(Image::from_f32(2, 2, 0, vec![]).is_err());
    }

    #[test]
    fn test_filled_requires_channels() {
        assert!(matches!(Image::filled_u8(200, 100, 0, 0), Err(Error::InvalidArgument(_))));
        assert!(matches!(Image::filled_f32(4, 4, 0, 0.5), Err(Error::InvalidArgument(_))));

        let empty = Image::filled_u8(0, 5, 3, 0).unwrap();
        assert!(empty.data().is_empty());
    }

    #[test]
    fn test_index_layout() {
        let img = Image::from_rgb8(&create_test_image());
        assert_eq!(img.dims(), ImageDimensions::new(4, 2, 3));
        assert_eq!(img.index(1, 1, 2), (4 + 1) * 3 + 2);
        assert_eq!(img.pixel(3, 1), vec![180.0, 100.0, 7.0]);
    }

    #[test]
    fn test_rgb8_conversion() {
        let rgb = create_test_image();
        let img = Image::from_rgb8(&rgb);
        let back = img.to_dynamic().unwrap().to_rgb8();
        assert_eq!(back, rgb);
    }

    #[test]
    fn test_float_quantization() {
        let img = Image::from_f32(1, 1, 3, vec![0.0, 0.5, 1.0]).unwrap();
        let quantized = img.to_u8();
        assert_eq!(quantized.data(), &PixelData::U8(vec![0, 128, 255]));

        let widened = quantized.to_f32();
        assert_eq!(widened.sample_type(), SampleType::F32);
        assert_eq!(widened.sample(0, 0, 2), 1.0);
    }

    #[test]
    fn test_u8_sample_saturates() {
        assert_eq!(u8::from_f32(-3.0), 0);
        assert_eq!(u8::from_f32(300.0), 255);
        assert_eq!(u8::from_f32(2.5), 2);
        assert_eq!(u8::from_f32(3.5), 4);
    }

    #[test]
    fn test_from_dynamic_keeps_gray() {
        let gray = GrayImage::from_pixel(3, 3, Luma([9u8]));
        let img = Image::from_dynamic(&DynamicImage::ImageLuma8(gray));
        assert_eq!(img.channels(), 1);
        assert_eq!(img.sample(2, 2, 0), 9.0);
    }
}
