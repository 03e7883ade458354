use thiserror::Error;

pub type Result<T> = std::result::Result<T, BloomError>;

#[derive(Error, Debug)]
pub enum BloomError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid configuration: unknown hash type {0}")]
    UnknownHashType(i64),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Index out of range: requested {requested} elements, only {available} available")]
    IndexOutOfRange { requested: usize, available: usize },

    #[error("Index out of bounds: {index} >= {capacity}")]
    IndexOutOfBounds { index: usize, capacity: usize },

    #[error("Failed to parse line {line}: '{value}' is not a non-negative integer")]
    Parse { line: usize, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for BloomError {
    fn from(err: serde_json::Error) -> Self {
        BloomError::SerializationError(err.to_string())
    }
}

impl From<crate::config::FilterConfigBuilderError> for BloomError {
    fn from(err: crate::config::FilterConfigBuilderError) -> Self {
        BloomError::InvalidConfig(err.to_string())
    }
}
