//! # Pricing Commands
//!
//! Stateless access to the pricing solver, for callers that already hold
//! numbers (batch pricing, what-if tables) and don't need a form session.

use margem_core::{pricing, PricingInputs, PricingResult};
use tracing::debug;

use crate::error::ApiError;

/// Solves one pricing request.
///
/// ## Returns
/// - `Ok(Some(result))`, possibly with `impossible = true`
/// - `Ok(None)` when the resolved sale price is not positive
/// - `Err(ApiError)` with `VALIDATION_ERROR` for NaN or negative inputs
pub fn solve_pricing(inputs: &PricingInputs) -> Result<Option<PricingResult>, ApiError> {
    debug!(mode = %inputs.target.mode(), "solve_pricing command");
    Ok(pricing::compute(inputs)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use margem_core::PricingTarget;

    #[test]
    fn test_solve_pricing_command() {
        let result = solve_pricing(&PricingInputs {
            cost: 100.0,
            tax_percent: 18.0,
            fixed_cost_percent: 20.0,
            target: PricingTarget::NetProfit(86.0),
        })
        .unwrap()
        .unwrap();
        assert!((result.sale - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_cost_is_validation_error() {
        let err = solve_pricing(&PricingInputs {
            cost: -1.0,
            tax_percent: 0.0,
            fixed_cost_percent: 0.0,
            target: PricingTarget::SalePrice(10.0),
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
