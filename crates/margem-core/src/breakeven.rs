//! # Break-Even Solver
//!
//! Minimum monthly revenue and unit volume that cover fixed costs, plus a
//! two-way projection between a revenue goal and a profit goal.
//!
//! ## Formulas
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cmr  = (unitPrice − unitVariableCost) / unitPrice                     │
//! │                                                                         │
//! │  breakEvenRevenue = fixedCosts / cmr                                   │
//! │  breakEvenUnits   = fixedCosts / (unitPrice − unitVariableCost)        │
//! │                                                                         │
//! │  goal = revenue R   →  profit  = R · cmr − fixedCosts                  │
//! │  goal = profit  P   →  revenue = (P + fixedCosts) / cmr                │
//! │                                                                         │
//! │  progressRatio = min(breakEvenRevenue / projectedRevenue, 1), ≥ 0      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::numeric::{clamp_unit, safe_div};
use crate::types::{BreakEvenGoal, GoalMode};
use crate::validation::{ensure_finite, ensure_non_negative};

/// Numbers the break-even screen hands to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BreakEvenInputs {
    /// Monthly fixed costs.
    pub fixed_costs: f64,
    pub unit_price: f64,
    pub unit_variable_cost: f64,
    /// The goal field the user last edited, with its value.
    pub goal: BreakEvenGoal,
}

/// Why the break-even point does not exist for these inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BreakEvenRejection {
    #[error("unit price must exceed unit variable cost")]
    NonPositiveContributionMargin,
    #[error("fixed costs must be positive")]
    NonPositiveFixedCosts,
}

/// Computed break-even figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BreakEvenValues {
    pub break_even_revenue: f64,
    pub break_even_units: f64,
    pub contribution_margin_ratio: f64,
    pub goal_mode: GoalMode,
    pub projected_revenue: f64,
    pub projected_profit: f64,
    /// Share of the projected revenue consumed by reaching break-even, in `[0, 1]`.
    pub progress_ratio: f64,
    /// How far projected revenue may fall before a loss, percent units.
    pub safety_margin_percent: f64,
}

/// Either the figures or the reason there are none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BreakEvenResult {
    pub values: Option<BreakEvenValues>,
    pub error: Option<BreakEvenRejection>,
}

impl BreakEvenResult {
    pub fn solved(values: BreakEvenValues) -> Self {
        BreakEvenResult {
            values: Some(values),
            error: None,
        }
    }

    pub fn rejected(reason: BreakEvenRejection) -> Self {
        BreakEvenResult {
            values: None,
            error: Some(reason),
        }
    }

    pub fn is_solved(&self) -> bool {
        self.values.is_some()
    }
}

/// Solves break-even and projects the goal.
///
/// ## Returns
/// - `Err` for NaN/infinite input or a negative variable cost
/// - `Ok(None)` when fixed costs, price and variable cost are all zero, or
///   when a figure would overflow `f64`
/// - `Ok(Some(result))` with either `values` or `error` set
pub fn compute(inputs: &BreakEvenInputs) -> CoreResult<Option<BreakEvenResult>> {
    let fixed_costs = ensure_finite("fixed_costs", inputs.fixed_costs)?;
    let unit_price = ensure_finite("unit_price", inputs.unit_price)?;
    let unit_variable_cost = ensure_non_negative("unit_variable_cost", inputs.unit_variable_cost)?;
    let goal_field = match inputs.goal.mode() {
        GoalMode::Revenue => "target_revenue",
        GoalMode::Profit => "target_profit",
    };
    ensure_finite(goal_field, inputs.goal.value())?;

    if fixed_costs == 0.0 && unit_price == 0.0 && unit_variable_cost == 0.0 {
        return Ok(None);
    }

    // price must beat variable cost before anything is divided by the margin
    let unit_margin = unit_price - unit_variable_cost;
    let contribution_margin_ratio = match safe_div(unit_margin, unit_price) {
        Some(ratio) if unit_margin > 0.0 && ratio > 0.0 => ratio,
        _ => {
            return Ok(Some(BreakEvenResult::rejected(
                BreakEvenRejection::NonPositiveContributionMargin,
            )))
        }
    };

    if fixed_costs <= 0.0 {
        return Ok(Some(BreakEvenResult::rejected(
            BreakEvenRejection::NonPositiveFixedCosts,
        )));
    }

    let (Some(break_even_revenue), Some(break_even_units)) = (
        safe_div(fixed_costs, contribution_margin_ratio),
        safe_div(fixed_costs, unit_margin),
    ) else {
        return Ok(None);
    };

    let projection = match inputs.goal {
        BreakEvenGoal::Revenue(revenue) => {
            Some((revenue, revenue * contribution_margin_ratio - fixed_costs))
        }
        BreakEvenGoal::Profit(profit) => safe_div(profit + fixed_costs, contribution_margin_ratio)
            .map(|revenue| (revenue, profit)),
    };
    let Some((projected_revenue, projected_profit)) =
        projection.filter(|(revenue, profit)| revenue.is_finite() && profit.is_finite())
    else {
        return Ok(None);
    };

    let (progress_ratio, safety_margin_percent) = if projected_revenue > 0.0 {
        (
            safe_div(break_even_revenue, projected_revenue)
                .map(clamp_unit)
                .unwrap_or(0.0),
            safe_div(projected_revenue - break_even_revenue, projected_revenue)
                .map(|share| share * 100.0)
                .unwrap_or(0.0),
        )
    } else {
        (0.0, 0.0)
    };

    Ok(Some(BreakEvenResult::solved(BreakEvenValues {
        break_even_revenue,
        break_even_units,
        contribution_margin_ratio,
        goal_mode: inputs.goal.mode(),
        projected_revenue,
        projected_profit,
        progress_ratio,
        safety_margin_percent,
    })))
}

/// Flat entry point: `solveBreakEven(fixedCosts, unitPrice, unitVariableCost, goalMode, goalValue)`.
pub fn solve_break_even(
    fixed_costs: f64,
    unit_price: f64,
    unit_variable_cost: f64,
    goal_mode: GoalMode,
    goal_value: f64,
) -> CoreResult<Option<BreakEvenResult>> {
    compute(&BreakEvenInputs {
        fixed_costs,
        unit_price,
        unit_variable_cost,
        goal: BreakEvenGoal::from_mode(goal_mode, goal_value),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
