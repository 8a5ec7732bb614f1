//! # API Error Type
//!
//! Unified error type for portal commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Margem                                 │
//! │                                                                         │
//! │  UI shell                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  {"command":"set_field",...}                                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Unknown field/UF? ─── ValidationError::Unknown* ── NOT_FOUND   │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad number? ──── CoreError::Validation ──── VALIDATION_ERROR   │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success (infeasible prices included) ─────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  {"error":{"code":"NOT_FOUND","message":"..."}}                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An impossible price or a rejected DIFAL is a normal response: it never
//! becomes an `ApiError`.

use margem_core::{CoreError, ValidationError};
use serde::Serialize;

use crate::state::ConfigError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "no internal aliquot configured for state 'XX'"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown field key or state code
    NotFound,

    /// Input validation failed, or the request itself was malformed
    ValidationError,

    /// Configuration could not be loaded
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UnknownField { .. } | ValidationError::UnknownState { .. } => {
                ApiError::new(ErrorCode::NotFound, err.to_string())
            }
            other => ApiError::validation(other.to_string()),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

/// Converts configuration errors to API errors.
impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        tracing::error!("Configuration error: {}", err);
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_state_maps_to_not_found() {
        let err = ApiError::from(ValidationError::UnknownState {
            uf: "XX".to_string(),
        });
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(err.message.contains("XX"));
    }

    #[test]
    fn test_core_validation_maps_to_validation_error() {
        let err = ApiError::from(CoreError::from(ValidationError::NotFinite {
            field: "cost".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "cost must be a finite number");
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::new(ErrorCode::ConfigError, "bad");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "CONFIG_ERROR");
        assert_eq!(json["message"], "bad");
        assert_eq!(err.to_string(), "[ConfigError] bad");
    }
}
