//! # Domain Types
//!
//! Mode selectors shared by the solvers and the portal.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Mode Types                                      │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │  PricingMode     │   │    GoalMode      │   │ CalculatorKind   │    │
//! │  │  ──────────────  │   │  ──────────────  │   │  ──────────────  │    │
//! │  │  venda           │   │  revenue         │   │  pricing         │    │
//! │  │  lucro_valor     │   │  profit          │   │  break_even      │    │
//! │  │  lucro_percentual│   └──────────────────┘   │  difal           │    │
//! │  └──────────────────┘                          └──────────────────┘    │
//! │                                                                         │
//! │  PricingTarget / BreakEvenGoal carry the authoritative value WITH      │
//! │  its mode, so a solver never has to guess which field is live.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Pricing Mode
// =============================================================================

/// Which pricing input is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    /// The operator typed the sale price.
    #[default]
    Venda,
    /// The operator typed a target net profit (currency).
    LucroValor,
    /// The operator typed a target net margin (percent).
    LucroPercentual,
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingMode::Venda => write!(f, "venda"),
            PricingMode::LucroValor => write!(f, "lucro_valor"),
            PricingMode::LucroPercentual => write!(f, "lucro_percentual"),
        }
    }
}

impl FromStr for PricingMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "venda" | "sale" => Ok(PricingMode::Venda),
            "lucro_valor" | "profit" => Ok(PricingMode::LucroValor),
            "lucro_percentual" | "margin" => Ok(PricingMode::LucroPercentual),
            other => Err(ValidationError::InvalidFormat {
                field: "mode".to_string(),
                reason: format!(
                    "unknown pricing mode '{}'; expected venda, lucro_valor or lucro_percentual",
                    other
                ),
            }),
        }
    }
}

/// The authoritative pricing input, tagged with its mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "mode", content = "value")]
pub enum PricingTarget {
    /// Direct sale price.
    #[serde(rename = "venda")]
    SalePrice(f64),
    /// Desired net profit; sale price is solved for.
    #[serde(rename = "lucro_valor")]
    NetProfit(f64),
    /// Desired net margin in percent units; sale price is solved for.
    #[serde(rename = "lucro_percentual")]
    NetMarginPercent(f64),
}

impl PricingTarget {
    /// Builds the target for a mode from its value.
    pub fn from_mode(mode: PricingMode, value: f64) -> Self {
        match mode {
            PricingMode::Venda => PricingTarget::SalePrice(value),
            PricingMode::LucroValor => PricingTarget::NetProfit(value),
            PricingMode::LucroPercentual => PricingTarget::NetMarginPercent(value),
        }
    }

    /// The mode this target belongs to.
    pub fn mode(&self) -> PricingMode {
        match self {
            PricingTarget::SalePrice(_) => PricingMode::Venda,
            PricingTarget::NetProfit(_) => PricingMode::LucroValor,
            PricingTarget::NetMarginPercent(_) => PricingMode::LucroPercentual,
        }
    }

    /// The raw value regardless of mode.
    pub fn value(&self) -> f64 {
        match *self {
            PricingTarget::SalePrice(v)
            | PricingTarget::NetProfit(v)
            | PricingTarget::NetMarginPercent(v) => v,
        }
    }
}

// =============================================================================
// Break-Even Goal
// =============================================================================

/// Which break-even goal field the user last edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum GoalMode {
    #[default]
    Revenue,
    Profit,
}

impl fmt::Display for GoalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalMode::Revenue => write!(f, "revenue"),
            GoalMode::Profit => write!(f, "profit"),
        }
    }
}

impl FromStr for GoalMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "revenue" | "faturamento" => Ok(GoalMode::Revenue),
            "profit" | "lucro" => Ok(GoalMode::Profit),
            other => Err(ValidationError::InvalidFormat {
                field: "goal_mode".to_string(),
                reason: format!("unknown goal mode '{}'; expected revenue or profit", other),
            }),
        }
    }
}

/// The authoritative break-even goal, tagged with its mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "goalMode", content = "value", rename_all = "snake_case")]
pub enum BreakEvenGoal {
    /// Target monthly revenue; profit is projected from it.
    Revenue(f64),
    /// Target monthly profit; the revenue needed is solved for.
    Profit(f64),
}

impl BreakEvenGoal {
    /// Builds the goal for a mode from its value.
    pub fn from_mode(mode: GoalMode, value: f64) -> Self {
        match mode {
            GoalMode::Revenue => BreakEvenGoal::Revenue(value),
            GoalMode::Profit => BreakEvenGoal::Profit(value),
        }
    }

    /// The mode this goal belongs to.
    pub fn mode(&self) -> GoalMode {
        match self {
            BreakEvenGoal::Revenue(_) => GoalMode::Revenue,
            BreakEvenGoal::Profit(_) => GoalMode::Profit,
        }
    }

    /// The raw value regardless of mode.
    pub fn value(&self) -> f64 {
        match *self {
            BreakEvenGoal::Revenue(v) | BreakEvenGoal::Profit(v) => v,
        }
    }
}

impl Default for BreakEvenGoal {
    fn default() -> Self {
        BreakEvenGoal::Revenue(0.0)
    }
}

// =============================================================================
// Calculator Kind
// =============================================================================

/// The three calculator screens of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorKind {
    Pricing,
    BreakEven,
    Difal,
}

impl CalculatorKind {
    /// All calculators, in menu order.
    pub const ALL: [CalculatorKind; 3] = [
        CalculatorKind::Pricing,
        CalculatorKind::BreakEven,
        CalculatorKind::Difal,
    ];
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculatorKind::Pricing => write!(f, "pricing"),
            CalculatorKind::BreakEven => write!(f, "break_even"),
            CalculatorKind::Difal => write!(f, "difal"),
        }
    }
}

impl FromStr for CalculatorKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pricing" | "precificacao" => Ok(CalculatorKind::Pricing),
            "break_even" | "breakeven" | "ponto_equilibrio" => Ok(CalculatorKind::BreakEven),
            "difal" => Ok(CalculatorKind::Difal),
            other => Err(ValidationError::InvalidFormat {
                field: "calculator".to_string(),
                reason: format!("unknown calculator '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_mode_default() {
        assert_eq!(PricingMode::default(), PricingMode::Venda);
    }

    #[test]
    fn test_pricing_mode_round_trips_through_text() {
        for mode in [
            PricingMode::Venda,
            PricingMode::LucroValor,
            PricingMode::LucroPercentual,
        ] {
            assert_eq!(mode.to_string().parse::<PricingMode>().unwrap(), mode);
        }
        assert!("markup".parse::<PricingMode>().is_err());
    }

    #[test]
    fn test_pricing_target_mode_and_value() {
        let target = PricingTarget::from_mode(PricingMode::LucroValor, 86.0);
        assert_eq!(target, PricingTarget::NetProfit(86.0));
        assert_eq!(target.mode(), PricingMode::LucroValor);
        assert_eq!(target.value(), 86.0);
    }

    #[test]
    fn test_pricing_target_serializes_with_mode_tag() {
        let json = serde_json::to_string(&PricingTarget::NetMarginPercent(25.0)).unwrap();
        assert_eq!(json, r#"{"mode":"lucro_percentual","value":25.0}"#);

        let back: PricingTarget = serde_json::from_str(r#"{"mode":"venda","value":300}"#).unwrap();
        assert_eq!(back, PricingTarget::SalePrice(300.0));
    }

    #[test]
    fn test_break_even_goal() {
        let goal = BreakEvenGoal::from_mode(GoalMode::Profit, 5000.0);
        assert_eq!(goal.mode(), GoalMode::Profit);
        assert_eq!(goal.value(), 5000.0);
        assert_eq!(BreakEvenGoal::default(), BreakEvenGoal::Revenue(0.0));

        let json = serde_json::to_string(&goal).unwrap();
        assert_eq!(json, r#"{"goalMode":"profit","value":5000.0}"#);
    }

    #[test]
    fn test_calculator_kind_parse() {
        assert_eq!("difal".parse::<CalculatorKind>().unwrap(), CalculatorKind::Difal);
        assert_eq!(
            "ponto_equilibrio".parse::<CalculatorKind>().unwrap(),
            CalculatorKind::BreakEven
        );
        for kind in CalculatorKind::ALL {
            assert_eq!(kind.to_string().parse::<CalculatorKind>().unwrap(), kind);
        }
        assert!("tickets".parse::<CalculatorKind>().is_err());
    }
}
