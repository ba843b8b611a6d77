//! Configuration structures for augmentation pipelines.
//!
//! These are plain serde types so a pipeline can be described in TOML and
//! rebuilt by the augmentation crate. Range checks live here so processors
//! built directly in code and processors built from a file fail the same way.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Field indices a step reads and writes when none are given
pub const DEFAULT_TARGETS: [usize; 1] = [0];

/// Trigger probability a step uses when none is given
pub const DEFAULT_PROBABILITY: f64 = 0.2;

/// Full pipeline description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Seed for the pipeline generator; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Rows per run; dataset size when absent
    #[serde(default)]
    pub gen_count: Option<usize>,
    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

/// One probabilistic step of a pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Processor to invoke
    pub processor: ProcessorConfig,
    /// Row fields handed to the processor, in order
    #[serde(default = "default_targets")]
    pub targets: Vec<usize>,
    /// Chance in [0, 1] that the step fires for a given row
    #[serde(default = "default_probability")]
    pub probability: f64,
}

impl StepConfig {
    /// Creates a step with the default target and probability
    pub fn new(processor: ProcessorConfig) -> Self {
        Self {
            processor,
            targets: default_targets(),
            probability: DEFAULT_PROBABILITY,
        }
    }
}

fn default_targets() -> Vec<usize> {
    DEFAULT_TARGETS.to_vec()
}

fn default_probability() -> f64 {
    DEFAULT_PROBABILITY
}

/// Checks that a trigger probability lies in [0, 1]
pub fn validate_probability(probability: f64) -> Result<()> {
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(Error::Config(format!(
            "Trigger probability must be within [0, 1], got {}",
            probability
        )));
    }
    Ok(())
}

/// Processor selection and parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProcessorConfig {
    /// Pass-through
    Identity(IdentityConfig),
    /// Random filled occlusion rectangles
    RandomRectangles(RectanglesConfig),
    /// Random HSV value scaling
    RandomBrightness(BrightnessConfig),
    /// Random box blur
    RandomBlur(BlurConfig),
    /// Horizontal mirror with label negation
    RandomFlip,
}

impl ProcessorConfig {
    /// Validates the processor parameters
    pub fn validate(&self) -> Result<()> {
        match self {
            ProcessorConfig::Identity(config) => config.validate(),
            ProcessorConfig::RandomRectangles(config) => config.validate(),
            ProcessorConfig::RandomBrightness(config) => config.validate(),
            ProcessorConfig::RandomBlur(config) => config.validate(),
            ProcessorConfig::RandomFlip => Ok(()),
        }
    }
}

impl std::fmt::Display for ProcessorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessorConfig::Identity(_) => write!(f, "identity"),
            ProcessorConfig::RandomRectangles(_) => write!(f, "random_rectangles"),
            ProcessorConfig::RandomBrightness(_) => write!(f, "random_brightness"),
            ProcessorConfig::RandomBlur(_) => write!(f, "random_blur"),
            ProcessorConfig::RandomFlip => write!(f, "random_flip"),
        }
    }
}

/// Identity processor parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IdentityConfig {
    /// Number of fields passed through
    pub arity: usize,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self { arity: 1 }
    }
}

impl IdentityConfig {
    pub fn validate(&self) -> Result<()> {
        if self.arity == 0 {
            return Err(Error::Config("Identity arity must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Occlusion rectangle parameters.
///
/// Bounds constrain the rectangle centre, widths are full widths before
/// halving. All ranges are inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RectanglesConfig {
    /// Rectangles drawn per invocation
    pub count: usize,
    /// Smallest centre row
    pub top: u32,
    /// Largest centre row
    pub bottom: u32,
    /// Smallest centre column
    pub left: u32,
    /// Largest centre column
    pub right: u32,
    /// Smallest full width
    pub min_width: u32,
    /// Largest full width
    pub max_width: u32,
    /// Smallest half height
    pub min_half_height: u32,
    /// Largest half height
    pub max_half_height: u32,
}

impl Default for RectanglesConfig {
    fn default() -> Self {
        Self {
            count: 2,
            top: 10,
            bottom: 30,
            left: 10,
            right: 150,
            min_width: 10,
            max_width: 30,
            min_half_height: 30,
            max_half_height: 50,
        }
    }
}

impl RectanglesConfig {
    pub fn validate(&self) -> Result<()> {
        check_range("rectangle width", self.min_width, self.max_width)?;
        check_range("rectangle half height", self.min_half_height, self.max_half_height)?;
        check_range("rectangle vertical bounds", self.top, self.bottom)?;
        check_range("rectangle horizontal bounds", self.left, self.right)?;
        Ok(())
    }
}

/// Brightness factor range, half-open `[min_factor, max_factor)`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrightnessConfig {
    pub min_factor: f32,
    pub max_factor: f32,
}

impl Default for BrightnessConfig {
    fn default() -> Self {
        // uniform(0.1, 1.0) shifted by 0.5
        Self {
            min_factor: 0.6,
            max_factor: 1.5,
        }
    }
}

impl BrightnessConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.min_factor.is_finite() || !self.max_factor.is_finite() {
            return Err(Error::InvalidRange(format!(
                "Brightness factors must be finite, got [{}, {})",
                self.min_factor, self.max_factor
            )));
        }
        if self.min_factor < 0.0 || self.min_factor >= self.max_factor {
            return Err(Error::InvalidRange(format!(
                "Brightness factor range must satisfy 0 <= min < max, got [{}, {})",
                self.min_factor, self.max_factor
            )));
        }
        Ok(())
    }
}

/// Box blur kernel size range, inclusive
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BlurConfig {
    pub min_kernel: u32,
    pub max_kernel: u32,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            min_kernel: 2,
            max_kernel: 3,
        }
    }
}

impl BlurConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_kernel == 0 {
            return Err(Error::InvalidRange("Blur kernel size must be at least 1".to_string()));
        }
        check_range("blur kernel size", self.min_kernel, self.max_kernel)
    }
}

fn check_range(what: &str, min: u32, max: u32) -> Result<()> {
    if min > max {
        return Err(Error::InvalidRange(format!(
            "{} minimum {} exceeds maximum {}",
            what, min, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rectangles_config() {
        let config = RectanglesConfig::default();
        assert_eq!(config.count, 2);
        assert_eq!((config.min_width, config.max_width), (10, 30));
        assert_eq!((config.min_half_height, config.max_half_height), (30, 50));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_ranges_rejected() {
        let config = RectanglesConfig {
            min_width: 40,
            max_width: 20,
            ..RectanglesConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidRange(_))));

        let config = RectanglesConfig {
            left: 100,
            right: 10,
            ..RectanglesConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidRange(_))));

        let blur = BlurConfig {
            min_kernel: 5,
            max_kernel: 3,
        };
        assert!(matches!(blur.validate(), Err(Error::InvalidRange(_))));

        let blur = BlurConfig {
            min_kernel: 0,
            max_kernel: 3,
        };
        assert!(matches!(blur.validate(), Err(Error::InvalidRange(_))));

        let brightness = BrightnessConfig {
            min_factor: 1.5,
            max_factor: 0.6,
        };
        assert!(matches!(brightness.validate(), Err(Error::InvalidRange(_))));
    }

    #[test]
    fn test_probability_validation() {
        assert!(validate_probability(0.0).is_ok());
        assert!(validate_probability(1.0).is_ok());
        assert!(validate_probability(0.2).is_ok());
        assert!(matches!(validate_probability(1.01), Err(Error::Config(_))));
        assert!(matches!(validate_probability(-0.1), Err(Error::Config(_))));
        assert!(matches!(validate_probability(f64::NAN), Err(Error::Config(_))));
    }

    #[test]
    fn test_step_defaults() {
        let step = StepConfig::new(ProcessorConfig::RandomBlur(BlurConfig::default()));
        assert_eq!(step.targets, vec![0]);
        assert_eq!(step.probability, 0.2);
    }

    #[test]
    fn test_parse_pipeline_toml() {
        let text = r#"
            seed = 7
            gen_count = 16

            [[steps]]
            processor = { kind = "random_rectangles", count = 3 }

            [[steps]]
            targets = [0, 1]
            probability = 0.5
            processor = { kind = "random_flip" }

            [[steps]]
            probability = 1.0
            processor = { kind = "random_blur", min_kernel = 3, max_kernel = 5 }
        "#;

        let config: PipelineConfig = toml::from_str(text).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.gen_count, Some(16));
        assert_eq!(config.steps.len(), 3);

        let rectangles = &config.steps[0];
        assert_eq!(rectangles.targets, vec![0]);
        assert_eq!(rectangles.probability, 0.2);
        match &rectangles.processor {
            ProcessorConfig::RandomRectangles(r) => {
                assert_eq!(r.count, 3);
                assert_eq!(r.right, 150);
            }
            other => panic!("unexpected processor {}", other),
        }

        assert_eq!(config.steps[1].processor, ProcessorConfig::RandomFlip);
        assert_eq!(config.steps[1].targets, vec![0, 1]);
        assert_eq!(
            config.steps[2].processor,
            ProcessorConfig::RandomBlur(BlurConfig {
                min_kernel: 3,
                max_kernel: 5
            })
        );
    }

    #[test]
    fn test_processor_display() {
        assert_eq!(ProcessorConfig::RandomFlip.to_string(), "random_flip");
        assert_eq!(
            ProcessorConfig::RandomBrightness(BrightnessConfig::default()).to_string(),
            "random_brightness"
        );
    }
}
