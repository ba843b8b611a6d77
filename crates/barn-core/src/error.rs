//! Error types for the barn augmentation workspace.

use thiserror::Error;

/// Main error type for augmentation operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image conversion or decoding error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Pipeline or step configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rows that cannot be stacked into a uniform batch
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Processor built with an unusable random range
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Dataset error
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid argument error
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

/// Specialized Result type for augmentation operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config("step expects 2 fields".to_string());
        assert_eq!(err.to_string(), "Configuration error: step expects 2 fields");

        let err = Error::ShapeMismatch("10x10x3 vs 8x8x3".to_string());
        assert_eq!(err.to_string(), "Shape mismatch: 10x10x3 vs 8x8x3");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let parsed: std::result::Result<toml::Value, _> = toml::from_str("steps = [");
        let err: Error = parsed.unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
