use thiserror::Error;

/// Reasons an image export did not produce a file
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Saving images is not supported on this platform")]
    Unsupported,

    #[error("Export was cancelled before it finished")]
    Cancelled,
}

/// Errors that can occur while loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

pub type ExportResult<T> = Result<T, ExportError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
