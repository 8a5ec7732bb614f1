//! # DIFAL Solver
//!
//! Interstate tax differential with the destination base computed
//! "por dentro" (tax inside its own base).
//!
//! ## Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. originBase      = productValue · (1 − reduction%)                  │
//! │  2. creditValue     = originBase · interstate%                         │
//! │  3. destinationBase = (originBase − creditValue) / (1 − destination%)  │
//! │  4. debitValue      = destinationBase · destination%                   │
//! │  5. amountDue       = debitValue − creditValue                         │
//! │                                                                         │
//! │  Step 3 grosses the base up: the destination tax must sit inside the   │
//! │  base it is charged on, so it divides by (1 − rate).                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `amountDue` is reported as computed, with no floor at zero.
//!
//! ## Example
//! ```rust
//! use margem_core::difal::solve_difal;
//!
//! let result = solve_difal(1494.33, 12.0, 18.0, 0.0).unwrap().unwrap();
//! let values = result.values.unwrap();
//! assert!((values.amount_due - 109.34).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::numeric::{fraction, safe_div};
use crate::validation::{ensure_half_open, ensure_non_negative};

/// Numbers the DIFAL screen hands to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DifalInputs {
    pub product_value: f64,
    /// Interstate rate, percent units.
    pub interstate_rate: f64,
    /// Internal rate of the destination state, percent units.
    pub destination_rate: f64,
    /// Base reduction, percent units in `[0, 100)`.
    pub base_reduction_percent: f64,
}

/// Why the differential cannot be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DifalRejection {
    #[error("destination rate must exceed interstate rate")]
    RateOrdering,
    #[error("invalid destination rate")]
    InvalidDestinationRate,
}

/// The five DIFAL steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DifalValues {
    pub origin_base: f64,
    pub credit_value: f64,
    pub destination_base: f64,
    pub debit_value: f64,
    pub amount_due: f64,
    /// Destination minus interstate rate, percent units.
    pub rate_differential: f64,
}

/// Either the computed steps or the reason there are none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DifalResult {
    pub values: Option<DifalValues>,
    pub error: Option<DifalRejection>,
}

impl DifalResult {
    pub fn solved(values: DifalValues) -> Self {
        DifalResult {
            values: Some(values),
            error: None,
        }
    }

    pub fn rejected(reason: DifalRejection) -> Self {
        DifalResult {
            values: None,
            error: Some(reason),
        }
    }

    pub fn is_solved(&self) -> bool {
        self.values.is_some()
    }
}

/// Solves the DIFAL steps.
///
/// ## Returns
/// - `Err` for NaN/infinite or negative inputs, or a base reduction
///   outside `[0, 100)`
/// - `Ok(None)` when product value and both rates are zero
/// - `Ok(Some(result))` with either `values` or `error` set
pub fn compute(inputs: &DifalInputs) -> CoreResult<Option<DifalResult>> {
    let product_value = ensure_non_negative("product_value", inputs.product_value)?;
    let interstate_rate = ensure_non_negative("interstate_rate", inputs.interstate_rate)?;
    let destination_rate = ensure_non_negative("destination_rate", inputs.destination_rate)?;
    let reduction = ensure_half_open(
        "base_reduction_percent",
        inputs.base_reduction_percent,
        0.0,
        100.0,
    )?;

    if product_value == 0.0 && interstate_rate == 0.0 && destination_rate == 0.0 {
        return Ok(None);
    }

    if destination_rate >= 100.0 {
        return Ok(Some(DifalResult::rejected(
            DifalRejection::InvalidDestinationRate,
        )));
    }
    if destination_rate <= interstate_rate {
        return Ok(Some(DifalResult::rejected(DifalRejection::RateOrdering)));
    }

    let origin_base = product_value * (1.0 - fraction(reduction));
    let credit_value = origin_base * fraction(interstate_rate);
    let Some(destination_base) =
        safe_div(origin_base - credit_value, 1.0 - fraction(destination_rate))
    else {
        return Ok(Some(DifalResult::rejected(
            DifalRejection::InvalidDestinationRate,
        )));
    };
    let debit_value = destination_base * fraction(destination_rate);

    Ok(Some(DifalResult::solved(DifalValues {
        origin_base,
        credit_value,
        destination_base,
        debit_value,
        amount_due: debit_value - credit_value,
        rate_differential: destination_rate - interstate_rate,
    })))
}

/// Flat entry point: `solveDifal(productValue, interstateRate, destinationRate, baseReductionPercent)`.
pub fn solve_difal(
    product_value: f64,
    interstate_rate: f64,
    destination_rate: f64,
    base_reduction_percent: f64,
) -> CoreResult<Option<DifalResult>> {
    compute(&DifalInputs {
        product_value,
        interstate_rate,
        destination_rate,
        base_reduction_percent,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn values(value: f64, inter: f64, dest: f64, reduction: f64) -> DifalValues {
        solve_difal(value, inter, dest, reduction)
            .unwrap()
            .unwrap()
            .values
            .expect("expected DIFAL values")
    }

    #[test]
    fn test_grossed_up_base() {
        let v = values(1000.0, 12.0, 18.0, 0.0);
        assert!((v.origin_base - 1000.0).abs() < 1e-9);
        assert!((v.credit_value - 120.0).abs() < 1e-9);
        // (1000 − 120) / 0.82
        assert!((v.destination_base - 1073.170_731_707).abs() < 1e-6);
        assert!((v.debit_value - 193.170_731_707).abs() < 1e-6);
        assert!((v.amount_due - 73.170_731_707).abs() < 1e-6);
        assert_eq!(v.rate_differential, 6.0);
    }

    #[test]
    fn test_base_reduction_shrinks_origin_base() {
        let v = values(1000.0, 12.0, 18.0, 40.0);
        assert!((v.origin_base - 600.0).abs() < 1e-9);
        assert!((v.credit_value - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_rate_ordering_rejected() {
        let r = solve_difal(1000.0, 18.0, 12.0, 0.0).unwrap().unwrap();
        assert_eq!(r.error, Some(DifalRejection::RateOrdering));
        assert!(r.values.is_none());

        let equal = solve_difal(1000.0, 12.0, 12.0, 0.0).unwrap().unwrap();
        assert_eq!(equal.error, Some(DifalRejection::RateOrdering));
    }

    #[test]
    fn test_destination_rate_of_100_rejected_first() {
        let r = solve_difal(1000.0, 12.0, 100.0, 0.0).unwrap().unwrap();
        assert_eq!(r.error, Some(DifalRejection::InvalidDestinationRate));
        assert_eq!(r.error.unwrap().to_string(), "invalid destination rate");
    }

    #[test]
    fn test_zero_product_value_still_computes() {
        let v = values(0.0, 12.0, 18.0, 0.0);
        assert_eq!(v.amount_due, 0.0);
    }

    #[test]
    fn test_all_zero_is_no_result() {
        assert!(solve_difal(0.0, 0.0, 0.0, 0.0).unwrap().is_none());
    }

    #[test]
    fn test_contract_violations() {
        assert!(solve_difal(-1.0, 12.0, 18.0, 0.0).is_err());
        assert!(solve_difal(1000.0, f64::NAN, 18.0, 0.0).is_err());
        assert!(solve_difal(1000.0, 12.0, 18.0, 100.0).is_err());
        assert!(solve_difal(1000.0, 12.0, 18.0, -5.0).is_err());
    }
}
