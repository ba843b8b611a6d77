//! Randomized augmentation pipeline for labeled image rows.
//!
//! A dataset supplies rows of fields (an image plus auxiliary values such as
//! a steering label). [`AugmentPipeline`] resamples those rows with
//! replacement, runs each one through an ordered list of probabilistic
//! [`Processor`] steps and stacks the results into a per-field [`Batch`].
//!
//! ```no_run
//! use barn_augment::prelude::*;
//!
//! # fn main() -> barn_core::Result<()> {
//! let rows = (0..3)
//!     .map(|i| {
//!         let image = Image::filled_u8(10, 10, 3, 0)?;
//!         Ok(Row::new(vec![image.into(), Field::Scalar(i as f32)]))
//!     })
//!     .collect::<barn_core::Result<Vec<Row>>>()?;
//!
//! let mut pipeline = AugmentPipeline::with_seed(&rows, 42)?;
//! pipeline.add(RandomRectangles::default())?;
//! pipeline.add_with(RandomFlip::default(), &[0, 1], 0.5)?;
//!
//! let batch = pipeline.run()?;
//! assert_eq!(batch.len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod dataset;
pub mod field;
pub mod pipeline;
pub mod processors;
pub mod raster;

pub use batch::{Batch, Column, ImageStack};
pub use dataset::Dataset;
pub use field::{Field, Row};
pub use pipeline::{AugmentPipeline, ProcessorStep};
pub use processors::{
    build_processor, FnProcessor, Identity, MirrorFn, Processor, RandomBlur, RandomBrightness,
    RandomFlip, RandomRectangles, Rectangle,
};
pub use raster::{Image, PixelData, Sample};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::batch::*;
    pub use crate::dataset::*;
    pub use crate::field::*;
    pub use crate::pipeline::*;
    pub use crate::processors::*;
    pub use crate::raster::*;
}
