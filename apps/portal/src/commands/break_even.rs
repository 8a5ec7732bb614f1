//! # Break-Even Commands

use margem_core::{breakeven, BreakEvenInputs, BreakEvenResult};
use tracing::debug;

use crate::error::ApiError;

/// Solves one break-even request.
///
/// A rejection (price not above variable cost, no fixed costs) comes back
/// inside the result's `error` field, not as an `ApiError`.
pub fn solve_break_even(inputs: &BreakEvenInputs) -> Result<Option<BreakEvenResult>, ApiError> {
    debug!(goal_mode = %inputs.goal.mode(), "solve_break_even command");
    Ok(breakeven::compute(inputs)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use margem_core::{BreakEvenGoal, BreakEvenRejection};

    #[test]
    fn test_rejection_is_not_an_error() {
        let result = solve_break_even(&BreakEvenInputs {
            fixed_costs: 8000.0,
            unit_price: 20.0,
            unit_variable_cost: 20.0,
            goal: BreakEvenGoal::Revenue(0.0),
        })
        .unwrap()
        .unwrap();
        assert_eq!(
            result.error,
            Some(BreakEvenRejection::NonPositiveContributionMargin)
        );
    }
}
