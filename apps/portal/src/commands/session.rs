//! # Session Commands
//!
//! Commands that drive a calculator form one keystroke at a time.
//!
//! ## Form Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐  set_field   ┌──────────┐  set_field   ┌──────────┐       │
//! │  │  Empty   │─────────────►│ Partial  │─────────────►│  Solved  │       │
//! │  │  form    │              │ (Empty / │              │ (result  │       │
//! │  └──────────┘              │ Invalid) │              │ + write- │       │
//! │       ▲                    └──────────┘              │   back)  │       │
//! │       │                                              └────┬─────┘       │
//! │       └───────────────────── reset_session ◄──────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use margem_core::{CalculatorKind, ValidationError};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::{CalculatorSession, PortalConfig, SessionState};

/// Gets a snapshot of one calculator form.
pub fn get_session(sessions: &SessionState, calculator: CalculatorKind) -> CalculatorSession {
    debug!(%calculator, "get_session command");
    sessions.with_session(calculator, |session| session.clone())
}

/// Applies one field edit and returns the recomputed form.
///
/// ## Arguments
/// * `calculator` - Which form to edit
/// * `field` - Field key, e.g. `preco_venda` or `uf_destino`
/// * `value` - Raw text as typed (pt-BR masks accepted)
///
/// ## Errors
/// `NOT_FOUND` for an unknown field key or state code. A number that does
/// not parse is reported in the returned session's `outcome`, not here.
pub fn set_field(
    sessions: &SessionState,
    config: &PortalConfig,
    calculator: CalculatorKind,
    field: &str,
    value: &str,
) -> Result<CalculatorSession, ApiError> {
    debug!(%calculator, field, "set_field command");

    sessions
        .with_session_mut(calculator, |session| {
            session.set_field(field, value, config)?;
            Ok::<CalculatorSession, ValidationError>(session.clone())
        })
        .map_err(|err| {
            warn!(%calculator, field, error = %err, "set_field rejected");
            ApiError::from(err)
        })
}

/// Clears one calculator form.
pub fn reset_session(
    sessions: &SessionState,
    config: &PortalConfig,
    calculator: CalculatorKind,
) -> CalculatorSession {
    debug!(%calculator, "reset_session command");
    sessions.reset(calculator, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::SessionOutcome;

    #[test]
    fn test_set_field_returns_recomputed_session() {
        let config = PortalConfig::default();
        let sessions = SessionState::new(&config);

        set_field(&sessions, &config, CalculatorKind::Pricing, "custo", "100").unwrap();
        let session =
            set_field(&sessions, &config, CalculatorKind::Pricing, "preco_venda", "300").unwrap();

        assert!(matches!(session.outcome, SessionOutcome::Pricing(_)));
        assert_eq!(session.field("lucro_valor"), "200,00");
    }

    #[test]
    fn test_unknown_field_is_not_found() {
        let config = PortalConfig::default();
        let sessions = SessionState::new(&config);

        let err = set_field(&sessions, &config, CalculatorKind::Difal, "custo", "1").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "difal has no field named 'custo'");
    }

    #[test]
    fn test_sessions_are_independent() {
        let config = PortalConfig::default();
        let sessions = SessionState::new(&config);

        set_field(&sessions, &config, CalculatorKind::Pricing, "custo", "100").unwrap();
        let break_even = get_session(&sessions, CalculatorKind::BreakEven);
        assert!(break_even.fields.values().all(String::is_empty));

        let reset = reset_session(&sessions, &config, CalculatorKind::Pricing);
        assert_eq!(reset.field("custo"), "");
    }
}
