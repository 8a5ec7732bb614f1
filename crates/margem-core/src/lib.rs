//! # margem-core: Financial Calculation Engine
//!
//! Pure solvers behind the portal's three calculators. Every function here
//! takes plain numbers and returns a result record; nothing touches I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Margem Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Calculator screens (JSON-lines IPC)             │   │
//! │  │    Pricing form ──► Break-even form ──► DIFAL form              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ set_field / solve_*                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          margem-portal (CalculatorSession, commands)            │   │
//! │  │    masked text ──► format::parse_decimal ──► solver inputs      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ margem-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │ breakeven │  │   difal   │  │  format   │  │   │
//! │  │   │    DRE    │  │  goals    │  │ por dentro│  │  pt-BR    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STATE • PURE FUNCTIONS                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pricing`] - DRE breakdown and sale-price solving
//! - [`breakeven`] - Break-even revenue/units and goal projection
//! - [`difal`] - Interstate tax differential
//! - [`types`] - Mode selectors (PricingMode, GoalMode, CalculatorKind)
//! - [`format`] - pt-BR number parsing and display
//! - [`money`] - Centavo-exact currency display
//! - [`error`] - Validation errors
//!
//! ## Three Ways a Solver Answers
//!
//! 1. **`Err(CoreError)`**: the caller broke the contract (NaN, negative cost)
//! 2. **`Ok(None)`**: nothing to show yet (all-zero form)
//! 3. **`Ok(Some(result))`**: a record; business infeasibility lives inside it
//!
//! ## Example Usage
//!
//! ```rust
//! use margem_core::{solve_pricing, PricingMode};
//!
//! let result = solve_pricing(100.0, 18.0, 20.0, PricingMode::Venda, 300.0)
//!     .unwrap()
//!     .unwrap();
//!
//! assert!(!result.impossible);
//! assert!((result.net_profit - 86.0).abs() < 1e-9);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod breakeven;
pub mod difal;
pub mod error;
pub mod format;
pub mod money;
pub mod numeric;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use breakeven::{
    solve_break_even, BreakEvenInputs, BreakEvenRejection, BreakEvenResult, BreakEvenValues,
};
pub use difal::{solve_difal, DifalInputs, DifalRejection, DifalResult, DifalValues};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{solve_pricing, Infeasibility, PricingInputs, PricingResult};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Interstate ICMS rate used when the caller supplies none (percent units).
///
/// 12% applies to most interstate flows; 4% (imported goods) and 7%
/// (South/Southeast to North/Northeast) are the other legal values.
pub const DEFAULT_INTERSTATE_RATE: f64 = 12.0;
