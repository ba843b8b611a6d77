use barn_core::{Error, Result};
use rand_chacha::ChaCha8Rng;

use super::{check_arity, single_image, Processor};
use crate::field::Field;
use crate::raster::Image;

/// Returns its inputs unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    arity: usize,
}

impl Identity {
    /// Single-field pass-through
    pub fn new() -> Self {
        Self { arity: 1 }
    }

    pub fn with_arity(arity: usize) -> Result<Self> {
        if arity == 0 {
            return Err(Error::Config("Identity arity must be at least 1".to_string()));
        }
        Ok(Self { arity })
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for Identity {
    fn name(&self) -> &str {
        "identity"
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn transform(&self, inputs: Vec<Field>, _rng: &mut ChaCha8Rng) -> Result<Vec<Field>> {
        check_arity(self.name(), self.arity, &inputs)?;
        Ok(inputs)
    }
}

/// Custom single-image processor backed by a closure.
///
/// ```
/// use barn_augment::{FnProcessor, Image};
///
/// let to_float = FnProcessor::new("to_float", |image: Image, _rng| Ok(image.to_f32()));
/// ```
pub struct FnProcessor<F> {
    name: String,
    func: F,
}

impl<F> FnProcessor<F>
where
    F: Fn(Image, &mut ChaCha8Rng) -> Result<Image> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> std::fmt::Debug for FnProcessor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProcessor").field("name", &self.name).finish()
    }
}

impl<F> Processor for FnProcessor<F>
where
    F: Fn(Image, &mut ChaCha8Rng) -> Result<Image> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        1
    }

    fn transform(&self, inputs: Vec<Field>, rng: &mut ChaCha8Rng) -> Result<Vec<Field>> {
        let image = single_image(&self.name, inputs)?;
        Ok(vec![Field::Image((self.func)(image, rng)?)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_identity_passthrough() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let identity = Identity::with_arity(2).unwrap();
        let inputs = vec![Field::Image(Image::filled_u8(3, 3, 3, 17).unwrap()), Field::Scalar(0.3)];

        let outputs = identity.transform(inputs.clone(), &mut rng).unwrap();
        assert_eq!(outputs, inputs);
    }

    #[test]
    fn test_identity_arity() {
        assert_eq!(Identity::default().arity(), 1);
        assert!(Identity::with_arity(0).is_err());

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let inputs = vec![Field::Scalar(1.0), Field::Scalar(2.0)];
        let result = Identity::new().transform(inputs, &mut rng);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_fn_processor() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let darken = FnProcessor::new("darken", |image: Image, _rng: &mut ChaCha8Rng| {
            Image::filled_u8(image.width(), image.height(), image.channels(), 0)
        });
        assert_eq!(darken.name(), "darken");
        assert_eq!(darken.arity(), 1);

        let outputs = darken
            .transform(vec![Field::Image(Image::filled_u8(2, 2, 3, 200).unwrap())], &mut rng)
            .unwrap();
        assert_eq!(outputs, vec![Field::Image(Image::filled_u8(2, 2, 3, 0).unwrap())]);
    }
}
