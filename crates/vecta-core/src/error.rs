//! Error types for Vecta

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectaError>;

/// Main error type for Vecta
#[derive(Debug, Error)]
pub enum VectaError {
    #[error("Configuration rejected: {0}")]
    Config(#[from] ConfigError),

    #[error("Image resolution failed: {0}")]
    Image(#[from] ImageError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A configuration value was refused; the previous value is still in place
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid locale tag: {0:?}")]
    InvalidLocale(String),

    #[error("Locale value is missing")]
    MissingLocale,

    #[error("Default font name is empty")]
    EmptyFontName,

    #[error("Font family name is empty")]
    EmptyFontFamily,

    #[error("Font family override is missing")]
    MissingFontFamily,

    #[error("Invalid value for setting '{key}': {value:?}")]
    InvalidSetting { key: String, value: String },

    #[error("Settings could not be parsed: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Image resolution errors
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("Malformed data URI: {0}")]
    InvalidDataUri(String),

    #[error("Image payload could not be decoded: {0}")]
    Decode(String),

    #[error("Image format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Image payload too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },

    #[error("Embedded image {0:?} needs runtime helpers")]
    RuntimeHelpersRequired(String),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),
}

/// Resource loading errors
#[derive(Debug, Clone, Error)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}
