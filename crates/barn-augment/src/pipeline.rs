//! Probabilistic augmentation pipeline.
//!
//! # Generation
//!
//! Each call to [`AugmentPipeline::run_n`] draws `gen_count` rows uniformly
//! *with replacement* from the pipeline's private copy of the dataset. A row
//! may appear several times in one batch and another may not appear at all;
//! there is no guarantee of exhaustive coverage, even across calls.
//!
//! Every drawn row is copied and passed through the steps in registration
//! order. A step fires when a uniform draw in `[0, 1)` is below its trigger
//! probability; it then hands the targeted fields to its processor and writes
//! the outputs back to the same positions, where later steps see them.

use barn_core::{
    validate_probability, Error, PipelineConfig, Result, DEFAULT_PROBABILITY, DEFAULT_TARGETS,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use crate::batch::Batch;
use crate::dataset::Dataset;
use crate::field::{Field, Row};
use crate::processors::{build_processor, Processor};

/// A processor bound to the row fields it reads and writes, and the chance
/// that it fires
pub struct ProcessorStep {
    processor: Box<dyn Processor>,
    targets: Vec<usize>,
    probability: f64,
}

impl ProcessorStep {
    /// Step on field 0 with the default trigger probability
    pub fn new<P: Processor + 'static>(processor: P) -> Self {
        Self::from_boxed(Box::new(processor))
    }

    pub fn from_boxed(processor: Box<dyn Processor>) -> Self {
        Self {
            processor,
            targets: DEFAULT_TARGETS.to_vec(),
            probability: DEFAULT_PROBABILITY,
        }
    }

    pub fn targets(mut self, targets: &[usize]) -> Self {
        self.targets = targets.to_vec();
        self
    }

    pub fn probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    pub fn processor(&self) -> &dyn Processor {
        self.processor.as_ref()
    }

    pub fn target_indices(&self) -> &[usize] {
        &self.targets
    }

    pub fn trigger_probability(&self) -> f64 {
        self.probability
    }

    fn validate(&self, row_arity: usize) -> Result<()> {
        validate_probability(self.probability)?;

        let name = self.processor.name();
        if self.targets.len() != self.processor.arity() {
            return Err(Error::Config(format!(
                "{} takes {} field(s) but the step targets {:?}",
                name,
                self.processor.arity(),
                self.targets
            )));
        }
        if let Some(&bad) = self.targets.iter().find(|&&ix| ix >= row_arity) {
            return Err(Error::Config(format!(
                "{} targets field {} but rows have {} field(s)",
                name, bad, row_arity
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ProcessorStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorStep")
            .field("processor", &self.processor.name())
            .field("targets", &self.targets)
            .field("probability", &self.probability)
            .finish()
    }
}

/// Resamples dataset rows and augments them through an ordered list of steps
pub struct AugmentPipeline {
    rows: Vec<Row>,
    arity: usize,
    steps: Vec<ProcessorStep>,
    gen_count: Option<usize>,
    rng: ChaCha8Rng,
}

impl AugmentPipeline {
    /// Copies the dataset; randomness is seeded from the OS
    pub fn new<D: Dataset + ?Sized>(dataset: &D) -> Result<Self> {
        Self::with_rng(dataset, ChaCha8Rng::from_entropy())
    }

    /// Copies the dataset; identical seeds, datasets and steps give identical batches
    pub fn with_seed<D: Dataset + ?Sized>(dataset: &D, seed: u64) -> Result<Self> {
        Self::with_rng(dataset, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rng<D: Dataset + ?Sized>(dataset: &D, rng: ChaCha8Rng) -> Result<Self> {
        if dataset.is_empty() {
            return Err(Error::Dataset("Cannot augment an empty dataset".to_string()));
        }

        let rows = (0..dataset.len())
            .map(|i| {
                dataset
                    .get(i)
                    .ok_or_else(|| Error::Dataset(format!("Row {} missing from dataset", i)))
            })
            .collect::<Result<Vec<_>>>()?;

        let arity = rows[0].arity();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.arity() != arity) {
            return Err(Error::Dataset(format!(
                "Row {} has {} field(s), row 0 has {}",
                i,
                row.arity(),
                arity
            )));
        }

        debug!(rows = rows.len(), arity, "copied dataset into pipeline");
        Ok(Self {
            rows,
            arity,
            steps: Vec::new(),
            gen_count: None,
            rng,
        })
    }

    /// Builds a pipeline and all of its steps from a configuration
    pub fn from_config<D: Dataset + ?Sized>(dataset: &D, config: &PipelineConfig) -> Result<Self> {
        let mut pipeline = match config.seed {
            Some(seed) => Self::with_seed(dataset, seed)?,
            None => Self::new(dataset)?,
        };
        pipeline.gen_count = config.gen_count;

        for step in &config.steps {
            let processor = build_processor(&step.processor)?;
            pipeline.add_step(
                ProcessorStep::from_boxed(processor)
                    .targets(&step.targets)
                    .probability(step.probability),
            )?;
        }
        Ok(pipeline)
    }

    /// Adds a step on field 0 firing with probability 0.2
    pub fn add<P: Processor + 'static>(&mut self, processor: P) -> Result<()> {
        self.add_step(ProcessorStep::new(processor))
    }

    pub fn add_with<P: Processor + 'static>(
        &mut self,
        processor: P,
        targets: &[usize],
        probability: f64,
    ) -> Result<()> {
        self.add_step(
            ProcessorStep::new(processor)
                .targets(targets)
                .probability(probability),
        )
    }

    /// Validates and appends a step
    pub fn add_step(&mut self, step: ProcessorStep) -> Result<()> {
        step.validate(self.arity)?;
        debug!(
            processor = step.processor.name(),
            targets = ?step.targets,
            probability = step.probability,
            "added pipeline step"
        );
        self.steps.push(step);
        Ok(())
    }

    pub fn steps(&self) -> &[ProcessorStep] {
        &self.steps
    }

    /// The pipeline's copy of the dataset
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Fields per row
    pub fn row_arity(&self) -> usize {
        self.arity
    }

    /// Rows produced by [`run`](Self::run): the configured count, else the dataset size
    pub fn default_gen_count(&self) -> usize {
        self.gen_count.unwrap_or(self.rows.len())
    }

    /// Generates and stacks the default number of rows
    pub fn run(&mut self) -> Result<Batch> {
        self.run_n(self.default_gen_count())
    }

    /// Generates `gen_count` augmented rows and stacks them per field
    pub fn run_n(&mut self, gen_count: usize) -> Result<Batch> {
        let rows = self.generate(gen_count)?;
        Batch::stack(rows)
    }

    /// Generates `gen_count` augmented rows without stacking them
    pub fn generate(&mut self, gen_count: usize) -> Result<Vec<Row>> {
        info!(gen_count, steps = self.steps.len(), "generating augmented rows");

        let mut results = Vec::with_capacity(gen_count);
        for _ in 0..gen_count {
            let source = self.rng.gen_range(0..self.rows.len());
            let row = self.augment_row(self.rows[source].clone())?;
            results.push(row);
        }

        info!(rows = results.len(), "generation complete");
        Ok(results)
    }

    fn augment_row(&mut self, mut row: Row) -> Result<Row> {
        for step in &self.steps {
            let draw: f64 = self.rng.gen();
            if draw >= step.probability {
                continue;
            }

            let name = step.processor.name();
            trace!(processor = name, draw, "step fired");

            let inputs = take_targets(&mut row, &step.targets);
            let outputs = step.processor.transform(inputs, &mut self.rng)?;
            if outputs.len() != step.targets.len() {
                return Err(Error::Config(format!(
                    "{} returned {} field(s) for {} target(s)",
                    name,
                    outputs.len(),
                    step.targets.len()
                )));
            }

            for (&ix, field) in step.targets.iter().zip(outputs) {
                row[ix] = field;
            }
        }
        Ok(row)
    }
}

/// Moves the targeted fields out of `row`; a repeated index gets a copy
fn take_targets(row: &mut Row, targets: &[usize]) -> Vec<Field> {
    let mut inputs: Vec<Field> = Vec::with_capacity(targets.len());
    for (pos, &ix) in targets.iter().enumerate() {
        let field = match targets[..pos].iter().position(|&prev| prev == ix) {
            Some(first) => inputs[first].clone(),
            None => std::mem::replace(&mut row[ix], Field::Scalar(0.0)),
        };
        inputs.push(field);
    }
    inputs
}

impl std::fmt::Debug for AugmentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AugmentPipeline")
            .field("rows", &self.rows.len())
            .field("arity", &self.arity)
            .field("steps", &self.steps)
            .field("gen_count", &self.gen_count)
            .finish()
    }
}
