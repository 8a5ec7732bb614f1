//! # Pricing Solver
//!
//! Builds the full income-statement (DRE) breakdown for a product from its
//! cost and two revenue ratios, solving for the sale price when the operator
//! states a profit goal instead of a price.
//!
//! ## The Contribution Ratio `k`
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every real of revenue loses tax% and fixed-cost% before it can pay    │
//! │  for the goods:                                                        │
//! │                                                                         │
//! │      k = 1 − (tax% + fixed%) / 100                                     │
//! │      netProfit = sale · k − cost                                       │
//! │                                                                         │
//! │  tax% + fixed% ≥ 100  ⇒  k ≤ 0  ⇒  no price can ever cover the cost    │
//! │                                                                         │
//! │  Mode               Authoritative input    Sale price                  │
//! │  ────────────────   ────────────────────   ─────────────────────────   │
//! │  venda              sale price             as typed                    │
//! │  lucro_valor        net profit P           (P + cost) / k              │
//! │  lucro_percentual   net margin m%          cost / (k − m/100)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use margem_core::pricing::{compute, PricingInputs};
//! use margem_core::types::PricingTarget;
//!
//! let inputs = PricingInputs {
//!     cost: 100.0,
//!     tax_percent: 18.0,
//!     fixed_cost_percent: 20.0,
//!     target: PricingTarget::SalePrice(300.0),
//! };
//! let result = compute(&inputs).unwrap().unwrap();
//! assert!((result.net_profit - 86.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::numeric::{fraction, safe_div};
use crate::types::{PricingMode, PricingTarget};
use crate::validation::{ensure_finite, ensure_non_negative};

/// Below this `k` the ratios count as summing to 100% (float rounding of
/// `tax = 100 − fixed`).
const MIN_CONTRIBUTION_RATIO: f64 = 1e-12;

// =============================================================================
// Inputs
// =============================================================================

/// Numbers the pricing screen hands to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingInputs {
    /// Unit cost of goods.
    pub cost: f64,
    /// Taxes on revenue, percent units.
    pub tax_percent: f64,
    /// Fixed-cost allocation on revenue, percent units.
    pub fixed_cost_percent: f64,
    /// The one authoritative input, with its mode.
    pub target: PricingTarget,
}

// =============================================================================
// Infeasibility
// =============================================================================

/// Why no sale price satisfies the request.
#[derive(Debug, Clone, Copy, PartialEq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Infeasibility {
    /// Tax and fixed costs alone consume the whole revenue.
    #[error("tax ({tax_percent}%) plus fixed cost ({fixed_cost_percent}%) take 100% or more of revenue")]
    #[serde(rename_all = "camelCase")]
    RatiosExceedRevenue {
        tax_percent: f64,
        fixed_cost_percent: f64,
    },

    /// The target margin is at or above what any price can yield.
    #[error("a net margin of {target_margin_percent}% is unreachable; the maximum is below {max_margin_percent}%")]
    #[serde(rename_all = "camelCase")]
    MarginUnreachable {
        target_margin_percent: f64,
        max_margin_percent: f64,
    },
}

// =============================================================================
// Result
// =============================================================================

/// Full DRE breakdown for one sale.
///
/// When `impossible` is set, every monetary field is zero, the two ratios
/// are echoed back and `infeasibility` says which rule failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub mode: PricingMode,
    pub sale: f64,
    pub cost: f64,
    pub tax_percent: f64,
    pub tax_value: f64,
    pub net_revenue: f64,
    pub gross_profit: f64,
    pub fixed_cost_percent: f64,
    pub fixed_cost_value: f64,
    pub net_profit: f64,
    pub net_margin_percent: f64,
    /// `None` when cost is zero (markup over nothing).
    pub markup_percent: Option<f64>,
    pub contribution_margin: f64,
    /// Price at which net profit is exactly zero.
    pub break_even_price: f64,
    pub impossible: bool,
    pub infeasibility: Option<Infeasibility>,
}

impl PricingResult {
    fn impossible(
        mode: PricingMode,
        cost: f64,
        tax_percent: f64,
        fixed_cost_percent: f64,
        reason: Infeasibility,
    ) -> Self {
        PricingResult {
            mode,
            sale: 0.0,
            cost,
            tax_percent,
            tax_value: 0.0,
            net_revenue: 0.0,
            gross_profit: 0.0,
            fixed_cost_percent,
            fixed_cost_value: 0.0,
            net_profit: 0.0,
            net_margin_percent: 0.0,
            markup_percent: None,
            contribution_margin: 0.0,
            break_even_price: 0.0,
            impossible: true,
            infeasibility: Some(reason),
        }
    }
}

// =============================================================================
// Solver
// =============================================================================

/// Solves the pricing breakdown.
///
/// ## Returns
/// - `Err` if an input is NaN/infinite or cost/ratios are negative
/// - `Ok(None)` when the resolved sale price is not positive (empty form,
///   or a profit target below `-cost`), or when a figure would overflow `f64`
/// - `Ok(Some(result))` otherwise; check `result.impossible`
pub fn compute(inputs: &PricingInputs) -> CoreResult<Option<PricingResult>> {
    let cost = ensure_non_negative("cost", inputs.cost)?;
    let tax_percent = ensure_non_negative("tax_percent", inputs.tax_percent)?;
    let fixed_cost_percent = ensure_non_negative("fixed_cost_percent", inputs.fixed_cost_percent)?;
    let mode = inputs.target.mode();
    ensure_finite(target_field(mode), inputs.target.value())?;

    let k = 1.0 - fraction(tax_percent + fixed_cost_percent);

    if tax_percent + fixed_cost_percent >= 100.0 || k <= MIN_CONTRIBUTION_RATIO {
        return Ok(Some(PricingResult::impossible(
            mode,
            cost,
            tax_percent,
            fixed_cost_percent,
            Infeasibility::RatiosExceedRevenue {
                tax_percent,
                fixed_cost_percent,
            },
        )));
    }

    // k > 0 from here on
    let sale = match inputs.target {
        PricingTarget::SalePrice(price) => Some(price),
        PricingTarget::NetProfit(profit) => safe_div(profit + cost, k),
        PricingTarget::NetMarginPercent(margin_percent) => {
            let margin = fraction(margin_percent);
            if k - margin <= MIN_CONTRIBUTION_RATIO {
                return Ok(Some(PricingResult::impossible(
                    mode,
                    cost,
                    tax_percent,
                    fixed_cost_percent,
                    Infeasibility::MarginUnreachable {
                        target_margin_percent: margin_percent,
                        max_margin_percent: k * 100.0,
                    },
                )));
            }
            safe_div(cost, k - margin)
        }
    };

    let Some(sale) = sale.filter(|s| *s > 0.0) else {
        return Ok(None);
    };

    Ok(breakdown(mode, sale, cost, tax_percent, fixed_cost_percent, k))
}

/// Flat entry point: `solvePricing(cost, taxPercent, fixedCostPercent, mode, modeValue)`.
pub fn solve_pricing(
    cost: f64,
    tax_percent: f64,
    fixed_cost_percent: f64,
    mode: PricingMode,
    mode_value: f64,
) -> CoreResult<Option<PricingResult>> {
    compute(&PricingInputs {
        cost,
        tax_percent,
        fixed_cost_percent,
        target: PricingTarget::from_mode(mode, mode_value),
    })
}

/// Derives every DRE line from a positive sale price.
///
/// `None` when a line would leave the `f64` range.
fn breakdown(
    mode: PricingMode,
    sale: f64,
    cost: f64,
    tax_percent: f64,
    fixed_cost_percent: f64,
    k: f64,
) -> Option<PricingResult> {
    let tax_value = sale * fraction(tax_percent);
    let net_revenue = sale - tax_value;
    let gross_profit = net_revenue - cost;
    let fixed_cost_value = sale * fraction(fixed_cost_percent);
    let net_profit = gross_profit - fixed_cost_value;
    let net_margin_percent = safe_div(net_profit, sale)? * 100.0;
    let break_even_price = safe_div(cost, k)?;

    let result = PricingResult {
        mode,
        sale,
        cost,
        tax_percent,
        tax_value,
        net_revenue,
        gross_profit,
        fixed_cost_percent,
        fixed_cost_value,
        net_profit,
        net_margin_percent,
        markup_percent: safe_div(sale - cost, cost).map(|m| m * 100.0),
        contribution_margin: sale - cost,
        break_even_price,
        impossible: false,
        infeasibility: None,
    };

    [
        result.tax_value,
        result.net_revenue,
        result.gross_profit,
        result.fixed_cost_value,
        result.net_profit,
        result.net_margin_percent,
        result.contribution_margin,
    ]
    .iter()
    .all(|v| v.is_finite())
    .then_some(result)
}

fn target_field(mode: PricingMode) -> &'static str {
    match mode {
        PricingMode::Venda => "sale_price",
        PricingMode::LucroValor => "target_net_profit",
        PricingMode::LucroPercentual => "target_net_margin_percent",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
