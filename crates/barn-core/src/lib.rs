//! Core types and utilities for the barn augmentation workspace.
//!
//! This crate provides the error type, shared value types, pipeline
//! configuration and CLI helpers used across the workspace.

pub mod error;
pub mod types;
pub mod config;
pub mod cli;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
pub use cli::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::*;
    pub use crate::config::*;
}
