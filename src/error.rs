//! Unified error types for the bridge asset core
//!
//! All errors flow through this module so that failures from balance
//! sources, configuration and amount parsing share one shape.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::amount::AmountError;

/// Main error type for all bridge asset operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl BridgeError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfig, msg)
    }

    pub fn network_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, msg)
    }

    pub fn provider_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProviderError, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, msg)
    }

    pub fn unsupported_chain(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedChain, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for BridgeError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    InvalidInput,
    InvalidAmount,
    InvalidAddress,
    UnsupportedChain,

    // Configuration errors
    InvalidConfig,

    // Network errors
    NetworkError,
    ProviderError,
    Timeout,

    // Parse errors
    ParseError,
    JsonError,

    // Internal
    Internal,
}

/// Result type alias for bridge asset operations
pub type BridgeResult<T> = Result<T, BridgeError>;

// Conversions from common error types

impl From<serde_json::Error> for BridgeError {
    fn from(e: serde_json::Error) -> Self {
        BridgeError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(e: std::io::Error) -> Self {
        BridgeError::new(ErrorCode::Internal, e.to_string())
    }
}

impl From<url::ParseError> for BridgeError {
    fn from(e: url::ParseError) -> Self {
        BridgeError::new(ErrorCode::InvalidConfig, format!("Invalid URL: {}", e))
    }
}

impl From<AmountError> for BridgeError {
    fn from(e: AmountError) -> Self {
        BridgeError::new(ErrorCode::InvalidAmount, e.to_string())
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BridgeError::new(ErrorCode::Timeout, "Request timed out")
        } else if e.is_connect() {
            BridgeError::new(ErrorCode::NetworkError, "Connection failed")
        } else if e.is_decode() {
            BridgeError::new(ErrorCode::ParseError, e.without_url().to_string())
        } else {
            BridgeError::new(ErrorCode::NetworkError, e.without_url().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = BridgeError::provider_error("LCD returned 500")
            .with_details("GET /cosmos/bank/v1beta1/balances");

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("provider_error"));
        assert!(json.contains("LCD returned 500"));
    }

    #[test]
    fn test_display_includes_details() {
        let err = BridgeError::invalid_config("missing catalog").with_details("config.json");
        assert_eq!(err.to_string(), "[InvalidConfig] missing catalog (config.json)");
    }

    #[test]
    fn test_amount_error_conversion() {
        let err: BridgeError = AmountError::Negative("-1".to_string()).into();
        assert_eq!(err.code, ErrorCode::InvalidAmount);
    }
}
