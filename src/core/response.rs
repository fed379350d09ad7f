//! Operation response type
//!
//! Every inbound operation resolves to text content plus an error flag,
//! regardless of which internal path produced it.

use serde::{Deserialize, Serialize};

/// Result of a broker operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerResponse {
    /// The text content of the response
    pub output: String,
    /// Whether the operation resulted in an error
    pub is_error: bool,
}

impl BrokerResponse {
    /// Create a successful response
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            is_error: false,
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            output: message.into(),
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_success() {
        let response = BrokerResponse::success("output");
        assert_eq!(response.output, "output");
        assert!(!response.is_error);
    }

    #[test]
    fn test_response_error() {
        let response = BrokerResponse::error("error message");
        assert_eq!(response.output, "error message");
        assert!(response.is_error);
    }
}
