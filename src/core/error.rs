//! Broker error types

use thiserror::Error;

/// Errors that can occur while mediating a command
#[derive(Error, Debug)]
pub enum BrokerError {
    /// A required field was missing or empty
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A persisted store could not be written
    #[error("Store error: {0}")]
    Store(String),
}

impl BrokerError {
    /// Create a validation error from a string
    pub fn validation(msg: impl Into<String>) -> Self {
        BrokerError::Validation(msg.into())
    }

    /// Create a store error from a string
    pub fn store(msg: impl Into<String>) -> Self {
        BrokerError::Store(msg.into())
    }
}

/// Result type alias for broker operations
pub type BrokerResult<T> = Result<T, BrokerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BrokerError::validation("command is required");
        assert_eq!(err.to_string(), "Validation error: command is required");

        let err = BrokerError::store("write failed");
        assert_eq!(err.to_string(), "Store error: write failed");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let broker_err: BrokerError = io_err.into();
        assert!(matches!(broker_err, BrokerError::Io(_)));
    }
}
