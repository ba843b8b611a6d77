//! Row processors.
//!
//! A processor receives the fields a pipeline step targets, in step order,
//! and returns the same number of fields to be written back to the same
//! positions. Inputs are owned copies, so the dataset and any row whose step
//! did not fire are never touched.

mod blur;
mod brightness;
mod flip;
mod identity;
mod rectangles;

pub use blur::{box_blur, RandomBlur};
pub use brightness::{adjust_brightness, RandomBrightness};
pub use flip::{flip_horizontal, MirrorFn, RandomFlip};
pub use identity::{FnProcessor, Identity};
pub use rectangles::{fill_rectangle, RandomRectangles, Rectangle};

use barn_core::{Error, ProcessorConfig, Result};
use rand_chacha::ChaCha8Rng;

use crate::field::Field;
use crate::raster::Image;

/// Multi-field transform applied by a pipeline step
pub trait Processor: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Number of fields consumed and produced
    fn arity(&self) -> usize;

    /// Transforms `inputs` (exactly `arity()` fields) into the same number
    /// of outputs, drawing any randomness from `rng`
    fn transform(&self, inputs: Vec<Field>, rng: &mut ChaCha8Rng) -> Result<Vec<Field>>;
}

/// Builds a processor from its serialized description
pub fn build_processor(config: &ProcessorConfig) -> Result<Box<dyn Processor>> {
    let processor: Box<dyn Processor> = match config {
        ProcessorConfig::Identity(c) => Box::new(Identity::with_arity(c.arity)?),
        ProcessorConfig::RandomRectangles(c) => Box::new(RandomRectangles::new(*c)?),
        ProcessorConfig::RandomBrightness(c) => Box::new(RandomBrightness::new(*c)?),
        ProcessorConfig::RandomBlur(c) => Box::new(RandomBlur::new(*c)?),
        ProcessorConfig::RandomFlip => Box::new(RandomFlip::default()),
    };
    Ok(processor)
}

pub(crate) fn arity_error(name: &str, expected: usize, got: usize) -> Error {
    Error::Config(format!("{} expects {} field(s), got {}", name, expected, got))
}

pub(crate) fn check_arity(name: &str, expected: usize, inputs: &[Field]) -> Result<()> {
    if inputs.len() != expected {
        return Err(arity_error(name, expected, inputs.len()));
    }
    Ok(())
}

/// Unpacks the single image of an arity-1 image processor
pub(crate) fn single_image(name: &str, inputs: Vec<Field>) -> Result<Image> {
    let [field]: [Field; 1] = inputs
        .try_into()
        .map_err(|inputs: Vec<Field>| arity_error(name, 1, inputs.len()))?;
    field.into_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use barn_core::{BlurConfig, IdentityConfig, RectanglesConfig};

    #[test]
    fn test_build_processor() {
        let flip = build_processor(&ProcessorConfig::RandomFlip).unwrap();
        assert_eq!(flip.name(), "random_flip");
        assert_eq!(flip.arity(), 2);

        let identity =
            build_processor(&ProcessorConfig::Identity(IdentityConfig { arity: 3 })).unwrap();
        assert_eq!(identity.arity(), 3);

        let blur = build_processor(&ProcessorConfig::RandomBlur(BlurConfig::default())).unwrap();
        assert_eq!(blur.name(), "random_blur");
    }

    #[test]
    fn test_build_processor_rejects_bad_range() {
        let config = ProcessorConfig::RandomRectangles(RectanglesConfig {
            min_width: 30,
            max_width: 10,
            ..RectanglesConfig::default()
        });
        assert!(matches!(build_processor(&config), Err(Error::InvalidRange(_))));
    }

    #[test]
    fn test_single_image_checks_arity() {
        let fields = vec![Field::Scalar(1.0), Field::Scalar(2.0)];
        assert!(matches!(single_image("test", fields), Err(Error::Config(_))));

        let fields = vec![Field::Scalar(1.0)];
        assert!(matches!(single_image("test", fields), Err(Error::InvalidArgument(_))));
    }
}
