//! # Validation Module
//!
//! Input checks every solver runs before touching a formula.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: NumberFormat (format.rs)                                     │
//! │  └── Masked text → number, or InvalidFormat                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (call contract)                                  │
//! │  ├── NaN / infinity rejected                                           │
//! │  └── Negative cost, negative rates rejected                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Solver feasibility (business outcome, not an error)          │
//! │  ├── tax% + fixed% ≥ 100 → impossible                                  │
//! │  ├── price ≤ variable cost → rejection                                 │
//! │  └── destination ≤ interstate → rejection                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use margem_core::validation::{ensure_finite, ensure_non_negative};
//!
//! assert!(ensure_finite("cost", 100.0).is_ok());
//! assert!(ensure_finite("cost", f64::NAN).is_err());
//! assert!(ensure_non_negative("cost", -1.0).is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Rejects NaN and infinities.
pub fn ensure_finite(field: &str, value: f64) -> ValidationResult<f64> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    Ok(value)
}

/// Rejects non-finite and negative values. Zero is allowed.
///
/// ## Example
/// ```rust
/// use margem_core::validation::ensure_non_negative;
///
/// assert!(ensure_non_negative("cost", 0.0).is_ok());
/// assert!(ensure_non_negative("cost", 10.5).is_ok());
/// assert!(ensure_non_negative("cost", -0.01).is_err());
/// ```
pub fn ensure_non_negative(field: &str, value: f64) -> ValidationResult<f64> {
    ensure_finite(field, value)?;

    if value < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(value)
}

/// Requires `min <= value < max`.
///
/// Used for percentages where the upper bound would zero out a denominator,
/// e.g. a base reduction of 100% leaves nothing to tax.
pub fn ensure_half_open(field: &str, value: f64, min: f64, max: f64) -> ValidationResult<f64> {
    ensure_finite(field, value)?;

    if value < min || value >= max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max,
        });
    }

    Ok(value)
}

// =============================================================================
// Unit Tests
// =============================================================================
