//! Augmentation tool for labeled driving images.
//!
//! Loads a directory of images as `[image, label]` rows, runs them through a
//! pipeline described in TOML and writes the augmented batch back to disk:
//! - `run`: generate and export an augmented batch
//! - `check`: validate a pipeline configuration

mod export;
mod rows;

use anyhow::{Context, Result};
use barn_augment::{AugmentPipeline, Field, Image, Row};
use barn_core::{load_toml_config, setup_cli_logging, PipelineConfig};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "augment")]
#[command(about = "Generate augmented image batches from a directory", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Augment images and write the generated batch
    Run {
        /// Directory containing .png/.jpg images
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Pipeline configuration (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory for augmented images and labels.json
        #[arg(short, long)]
        output_dir: PathBuf,

        /// JSON object mapping file names to scalar labels
        #[arg(short, long)]
        labels: Option<PathBuf>,

        /// Rows to generate (overrides the config)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Random seed (overrides the config)
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Parse and validate a pipeline configuration
    Check {
        /// Pipeline configuration (TOML)
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_cli_logging(cli.verbose)?;

    match cli.command {
        Commands::Run {
            input_dir,
            config,
            output_dir,
            labels,
            count,
            seed,
        } => run(&input_dir, &config, &output_dir, labels.as_deref(), count, seed)?,

        Commands::Check { config } => check(&config)?,
    }

    Ok(())
}

fn run(
    input_dir: &Path,
    config_path: &Path,
    output_dir: &Path,
    labels_path: Option<&Path>,
    count: Option<usize>,
    seed: Option<u64>,
) -> Result<()> {
    let mut config: PipelineConfig = load_toml_config(config_path)?;
    if seed.is_some() {
        config.seed = seed;
    }
    if count.is_some() {
        config.gen_count = count;
    }

    let labels = match labels_path {
        Some(path) => rows::load_labels(path)?,
        None => Default::default(),
    };

    info!("Loading images from {:?}", input_dir);
    let dataset = rows::load_rows(input_dir, &labels)?;
    info!("Loaded {} rows", dataset.len());

    let mut pipeline = AugmentPipeline::from_config(&dataset, &config)
        .context("Failed to build augmentation pipeline")?;
    let batch = pipeline.run().context("Failed to generate augmented batch")?;

    let written = export::write_batch(&batch, output_dir)?;
    info!("✓ Wrote {} augmented rows to {:?}", written, output_dir);
    Ok(())
}

fn check(config_path: &Path) -> Result<()> {
    let config: PipelineConfig = load_toml_config(config_path)?;

    // Rows produced by `run` are [image, label]
    let sample_rows = vec![Row::new(vec![
        Field::Image(Image::filled_u8(1, 1, 3, 0)?),
        Field::Scalar(0.0),
    ])];
    let pipeline = AugmentPipeline::from_config(&sample_rows, &config)
        .with_context(|| format!("Invalid pipeline config {}", config_path.display()))?;

    println!("{} step(s)", pipeline.steps().len());
    for (i, step) in pipeline.steps().iter().enumerate() {
        println!(
            "  {}. {} on {:?} with p={}",
            i + 1,
            step.processor().name(),
            step.target_indices(),
            step.trigger_probability()
        );
    }
    if let Some(seed) = config.seed {
        println!("seed: {}", seed);
    }
    if let Some(gen_count) = config.gen_count {
        println!("rows per run: {}", gen_count);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configs/donkey.toml");
        assert!(check(&path).is_ok());
    }

    #[test]
    fn test_check_rejects_bad_targets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        let config = "[[steps]]\ntargets = [0, 2]\nprocessor = { kind = \"random_flip\" }\n";
        std::fs::write(&path, config).unwrap();
        assert!(check(&path).is_err());
    }

    #[test]
    fn test_run_end_to_end() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for (name, value) in [("1_cam.png", 30u8), ("2_cam.png", 60u8)] {
            image::RgbImage::from_pixel(6, 4, image::Rgb([value, value, value]))
                .save(input.path().join(name))
                .unwrap();
        }
        let labels = input.path().join("labels.json");
        std::fs::write(&labels, r#"{"1_cam.png": 0.5, "2_cam.png": -0.25}"#).unwrap();
        let config = input.path().join("pipeline.toml");
        std::fs::write(
            &config,
            concat!(
                "[[steps]]\ntargets = [0, 1]\nprobability = 1.0\n",
                "processor = { kind = \"random_flip\" }\n",
            ),
        )
        .unwrap();

        run(input.path(), &config, output.path(), Some(&labels), Some(5), Some(1)).unwrap();

        let written: std::collections::HashMap<String, f32> = serde_json::from_str(
            &std::fs::read_to_string(output.path().join("labels.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(written.len(), 5);
        assert!(written.values().all(|v| *v == -0.5 || *v == 0.25));
        assert!(output.path().join("aug_00004.png").exists());
    }
}
