//! # Numeric Safety Helpers
//!
//! Small shared helpers the solvers use at every denominator.
//!
//! Percentages travel through the engine in "percent units" (`18` means
//! 18%) and only become fractions inside a formula via [`fraction`].

/// Converts a percent-unit value into a fraction (`18.0` → `0.18`).
#[inline]
pub fn fraction(percent: f64) -> f64 {
    percent / 100.0
}

/// Divides, returning `None` for a zero denominator or a non-finite quotient.
///
/// ## Example
/// ```rust
/// use margem_core::numeric::safe_div;
///
/// assert_eq!(safe_div(10.0, 4.0), Some(2.5));
/// assert_eq!(safe_div(10.0, 0.0), None);
/// assert_eq!(safe_div(f64::MAX, 1e-300), None);
/// ```
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }

    let quotient = numerator / denominator;
    quotient.is_finite().then_some(quotient)
}

/// Clamps into `[0, 1]`; NaN collapses to 0.
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

// =============================================================================
// Unit Tests
// =============================================================================
