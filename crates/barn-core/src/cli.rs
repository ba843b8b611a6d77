//! Shared CLI helpers for workspace tools.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{Error, Result};

/// Log targets of the crates in this workspace
const WORKSPACE_TARGETS: [&str; 3] = ["barn_core", "barn_augment", "augment"];

/// Installs the `augment` tool's log output.
///
/// Pipeline and processor events from the workspace crates log at `info`,
/// or `debug` with `verbose`; other crates only report warnings. Per-step
/// `trace` events (rectangle geometry, fired steps) need an explicit
/// `RUST_LOG`, which replaces this filter entirely.
pub fn setup_cli_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(verbose))
        .with(filter)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logger: {e}")))?;

    Ok(())
}

fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .chain(std::iter::once("warn".to_string()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Reads and deserializes a TOML file such as a [`PipelineConfig`](crate::PipelineConfig)
pub fn load_toml_config<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config {}: {e}", path.display())))?;

    toml::from_str(&content).map_err(|e| {
        Error::Serialization(format!("Failed to parse config {}: {e}", path.display()))
    })
}
