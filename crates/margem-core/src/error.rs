//! # Error Types
//!
//! Domain-specific error types for margem-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  margem-core errors (this file)                                        │
//! │  ├── CoreError        - Broken call contract                           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  Business rejections (NOT errors, carried inside results)              │
//! │  ├── Infeasibility        - pricing.rs                                 │
//! │  ├── BreakEvenRejection   - breakeven.rs                               │
//! │  └── DifalRejection       - difal.rs                                   │
//! │                                                                         │
//! │  Portal errors (in app)                                                │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field in every message
//! 3. An infeasible price or a bad rate ordering is an expected outcome,
//!    so it never shows up here

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised when a solver is called outside its contract.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any formula runs, so a NaN never reaches a result record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Text could not be read as a number.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Form key does not belong to the calculator.
    #[error("{calculator} has no field named '{field}'")]
    UnknownField { calculator: String, field: String },

    /// State code has no configured aliquot.
    #[error("no internal aliquot configured for state '{uf}'")]
    UnknownState { uf: String },
}

impl ValidationError {
    /// Name of the field the error refers to, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::NotFinite { field }
            | ValidationError::MustBeNonNegative { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::UnknownField { field, .. } => Some(field),
            ValidationError::UnknownState { .. } => None,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
