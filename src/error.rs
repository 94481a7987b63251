//! Error types for the robot NAS crate

use thiserror::Error;

/// Result type alias for NAS operations
pub type Result<T> = std::result::Result<T, NasError>;

/// Main error type for the search pipeline
#[derive(Error, Debug)]
pub enum NasError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid metric: {0}")]
    InvalidMetric(String),

    #[error("Simulation unavailable: {0}")]
    SimulationUnavailable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for NasError {
    fn from(err: serde_json::Error) -> Self {
        NasError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NasError::InvalidMetric("stability must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid metric: stability must be positive");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NasError = io_err.into();
        assert!(matches!(err, NasError::IoError(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: NasError = json_err.into();
        assert!(matches!(err, NasError::SerializationError(_)));
    }
}
