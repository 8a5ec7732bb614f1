//! # Calculator Session State
//!
//! One form per calculator screen: the raw text of every field, which
//! target field the user typed last, and the latest solver outcome.
//!
//! ## Recompute Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    set_field("lucro_valor", "100")                      │
//! │                                                                         │
//! │  1. key known for this calculator? ─── no ──► UnknownField             │
//! │  2. store raw text (uf_destino: look up aliquot ► aliquota_destino)    │
//! │  3. target field? ─── yes ──► last_edited = key                        │
//! │  4. recompute:                                                          │
//! │       parse fields (NumberFormat) ─── error ──► Invalid { field }      │
//! │       mode = from last_edited (default venda / revenue)                 │
//! │       call solver                                                       │
//! │       write dependent fields back as display text                       │
//! │  5. summary: result lines as currency / percent text                   │
//! │                                                                         │
//! │  Write-back never sets last_edited, so a recompute can't trigger       │
//! │  another recompute.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use margem_core::format::{format_currency, format_decimal, format_percent, parse_decimal};
use margem_core::{
    breakeven, difal, pricing, BreakEvenGoal, BreakEvenInputs, BreakEvenResult, CalculatorKind,
    CoreError, CoreResult, DifalInputs, DifalResult, GoalMode, PricingInputs, PricingMode,
    PricingResult, PricingTarget, ValidationError,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::PortalConfig;

// =============================================================================
// Field Keys
// =============================================================================

pub const CUSTO: &str = "custo";
pub const IMPOSTOS: &str = "impostos";
pub const CUSTO_FIXO: &str = "custo_fixo";
pub const PRECO_VENDA: &str = "preco_venda";
pub const LUCRO_VALOR: &str = "lucro_valor";
pub const LUCRO_PERCENTUAL: &str = "lucro_percentual";

pub const CUSTOS_FIXOS: &str = "custos_fixos";
pub const PRECO_UNITARIO: &str = "preco_unitario";
pub const CUSTO_VARIAVEL: &str = "custo_variavel";
pub const META_FATURAMENTO: &str = "meta_faturamento";
pub const META_LUCRO: &str = "meta_lucro";

pub const VALOR_PRODUTO: &str = "valor_produto";
pub const ALIQUOTA_INTERESTADUAL: &str = "aliquota_interestadual";
pub const ALIQUOTA_DESTINO: &str = "aliquota_destino";
pub const REDUCAO_BASE: &str = "reducao_base";
pub const UF_DESTINO: &str = "uf_destino";

const PRICING_FIELDS: &[&str] = &[
    CUSTO,
    IMPOSTOS,
    CUSTO_FIXO,
    PRECO_VENDA,
    LUCRO_VALOR,
    LUCRO_PERCENTUAL,
];
const BREAK_EVEN_FIELDS: &[&str] = &[
    CUSTOS_FIXOS,
    PRECO_UNITARIO,
    CUSTO_VARIAVEL,
    META_FATURAMENTO,
    META_LUCRO,
];
const DIFAL_FIELDS: &[&str] = &[
    VALOR_PRODUTO,
    ALIQUOTA_INTERESTADUAL,
    ALIQUOTA_DESTINO,
    REDUCAO_BASE,
    UF_DESTINO,
];

/// Field keys of a calculator form, in screen order.
pub fn field_keys(kind: CalculatorKind) -> &'static [&'static str] {
    match kind {
        CalculatorKind::Pricing => PRICING_FIELDS,
        CalculatorKind::BreakEven => BREAK_EVEN_FIELDS,
        CalculatorKind::Difal => DIFAL_FIELDS,
    }
}

/// True for the fields whose edit decides the solver mode.
pub fn is_target_field(kind: CalculatorKind, key: &str) -> bool {
    match kind {
        CalculatorKind::Pricing => matches!(key, PRECO_VENDA | LUCRO_VALOR | LUCRO_PERCENTUAL),
        CalculatorKind::BreakEven => matches!(key, META_FATURAMENTO | META_LUCRO),
        CalculatorKind::Difal => false,
    }
}

/// Form key for a solver input name, so errors point at the right field.
fn form_field(kind: CalculatorKind, solver_field: &str) -> Option<&'static str> {
    let key = match (kind, solver_field) {
        (CalculatorKind::Pricing, "cost") => CUSTO,
        (CalculatorKind::Pricing, "tax_percent") => IMPOSTOS,
        (CalculatorKind::Pricing, "fixed_cost_percent") => CUSTO_FIXO,
        (CalculatorKind::Pricing, "sale_price") => PRECO_VENDA,
        (CalculatorKind::Pricing, "target_net_profit") => LUCRO_VALOR,
        (CalculatorKind::Pricing, "target_net_margin_percent") => LUCRO_PERCENTUAL,
        (CalculatorKind::BreakEven, "fixed_costs") => CUSTOS_FIXOS,
        (CalculatorKind::BreakEven, "unit_price") => PRECO_UNITARIO,
        (CalculatorKind::BreakEven, "unit_variable_cost") => CUSTO_VARIAVEL,
        (CalculatorKind::BreakEven, "target_revenue") => META_FATURAMENTO,
        (CalculatorKind::BreakEven, "target_profit") => META_LUCRO,
        (CalculatorKind::Difal, "product_value") => VALOR_PRODUTO,
        (CalculatorKind::Difal, "interstate_rate") => ALIQUOTA_INTERESTADUAL,
        (CalculatorKind::Difal, "destination_rate") => ALIQUOTA_DESTINO,
        (CalculatorKind::Difal, "base_reduction_percent") => REDUCAO_BASE,
        _ => return None,
    };
    Some(key)
}

fn pricing_field(mode: PricingMode) -> &'static str {
    match mode {
        PricingMode::Venda => PRECO_VENDA,
        PricingMode::LucroValor => LUCRO_VALOR,
        PricingMode::LucroPercentual => LUCRO_PERCENTUAL,
    }
}

fn goal_field(mode: GoalMode) -> &'static str {
    match mode {
        GoalMode::Revenue => META_FATURAMENTO,
        GoalMode::Profit => META_LUCRO,
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// What the screen should render after the last recompute.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Nothing to show yet.
    #[default]
    Empty,
    Pricing(PricingResult),
    BreakEven(BreakEvenResult),
    Difal(DifalResult),
    /// A field could not be used; the solver was not consulted.
    Invalid { field: String, message: String },
}

impl From<CoreError> for SessionOutcome {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => SessionOutcome::Invalid {
                field: e.field().unwrap_or_default().to_string(),
                message: e.to_string(),
            },
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// The live form of one calculator screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorSession {
    pub id: Uuid,
    pub kind: CalculatorKind,
    /// Raw field text keyed by field name.
    pub fields: BTreeMap<String, String>,
    /// Target field the user typed last; decides the solver mode.
    pub last_edited: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub outcome: SessionOutcome,
    /// Result lines ready to show, keyed by line name.
    #[serde(default)]
    pub summary: BTreeMap<String, String>,
}

impl CalculatorSession {
    /// A blank form. The DIFAL form starts with the configured interstate rate.
    pub fn new(kind: CalculatorKind, config: &PortalConfig) -> Self {
        let mut fields: BTreeMap<String, String> = field_keys(kind)
            .iter()
            .map(|key| (key.to_string(), String::new()))
            .collect();

        if kind == CalculatorKind::Difal {
            fields.insert(
                ALIQUOTA_INTERESTADUAL.to_string(),
                format_decimal(config.aliquots.interstate_rate, config.display_decimals),
            );
        }

        CalculatorSession {
            id: Uuid::new_v4(),
            kind,
            fields,
            last_edited: None,
            updated_at: Utc::now(),
            outcome: SessionOutcome::Empty,
            summary: BTreeMap::new(),
        }
    }

    /// Raw text of a field; empty for unknown keys.
    pub fn field(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }

    /// Stores one field edit and recomputes.
    ///
    /// ## Errors
    /// - `UnknownField` if the key does not belong to this calculator
    /// - `UnknownState` if `uf_destino` names a state with no configured
    ///   aliquot; the session is left untouched
    ///
    /// Unparseable numbers are NOT errors here: they land in
    /// `outcome` as `Invalid` so the screen can flag the field.
    pub fn set_field(
        &mut self,
        key: &str,
        raw: &str,
        config: &PortalConfig,
    ) -> Result<(), ValidationError> {
        if !field_keys(self.kind).contains(&key) {
            return Err(ValidationError::UnknownField {
                calculator: self.kind.to_string(),
                field: key.to_string(),
            });
        }

        if key == UF_DESTINO {
            let uf = raw.trim().to_uppercase();
            if !uf.is_empty() {
                let rate = config
                    .aliquots
                    .internal_rate(&uf)
                    .ok_or_else(|| ValidationError::UnknownState { uf: uf.clone() })?;
                self.fields.insert(
                    ALIQUOTA_DESTINO.to_string(),
                    format_decimal(rate, config.display_decimals),
                );
            }
            self.fields.insert(key.to_string(), uf);
        } else {
            self.fields.insert(key.to_string(), raw.to_string());
        }

        if is_target_field(self.kind, key) {
            self.last_edited = Some(key.to_string());
        }

        self.recompute(config);
        Ok(())
    }

    /// Re-runs the solver over the current field text.
    pub fn recompute(&mut self, config: &PortalConfig) {
        let solved = match self.kind {
            CalculatorKind::Pricing => self.solve_pricing(config),
            CalculatorKind::BreakEven => self.solve_break_even(config),
            CalculatorKind::Difal => self.solve_difal(config),
        };

        self.outcome = match solved {
            Ok(outcome) => outcome,
            Err(err) => {
                let mut outcome = SessionOutcome::from(err);
                if let SessionOutcome::Invalid { field, .. } = &mut outcome {
                    if let Some(key) = form_field(self.kind, field) {
                        *field = key.to_string();
                    }
                }
                outcome
            }
        };
        self.summary = summarize(&self.outcome, config);
        self.updated_at = Utc::now();
    }

    /// Parses a field; blank counts as zero.
    fn number(&self, key: &str) -> CoreResult<f64> {
        Ok(parse_decimal(key, self.field(key))?.unwrap_or(0.0))
    }

    fn is_blank(&self, key: &str) -> bool {
        self.field(key).trim().is_empty()
    }

    fn write_back(&mut self, key: &str, value: f64, decimals: u8) {
        self.fields.insert(key.to_string(), format_decimal(value, decimals));
    }

    fn clear(&mut self, keys: &[&str]) {
        for key in keys {
            self.fields.insert(key.to_string(), String::new());
        }
    }

    fn solve_pricing(&mut self, config: &PortalConfig) -> CoreResult<SessionOutcome> {
        let mode = match self.last_edited.as_deref() {
            Some(LUCRO_VALOR) => PricingMode::LucroValor,
            Some(LUCRO_PERCENTUAL) => PricingMode::LucroPercentual,
            _ => PricingMode::Venda,
        };
        let authoritative = pricing_field(mode);
        let dependents: Vec<&str> = [PRECO_VENDA, LUCRO_VALOR, LUCRO_PERCENTUAL]
            .into_iter()
            .filter(|key| *key != authoritative)
            .collect();

        let inputs = PricingInputs {
            cost: self.number(CUSTO)?,
            tax_percent: self.number(IMPOSTOS)?,
            fixed_cost_percent: self.number(CUSTO_FIXO)?,
            target: PricingTarget::from_mode(mode, self.number(authoritative)?),
        };

        let solved = pricing::compute(&inputs)?;
        if self.is_blank(authoritative) {
            self.clear(&dependents);
            return Ok(SessionOutcome::Empty);
        }

        match solved {
            Some(result) if !result.impossible => {
                let decimals = config.display_decimals;
                for key in dependents {
                    let value = match key {
                        PRECO_VENDA => result.sale,
                        LUCRO_VALOR => result.net_profit,
                        _ => result.net_margin_percent,
                    };
                    self.write_back(key, value, decimals);
                }
                Ok(SessionOutcome::Pricing(result))
            }
            Some(result) => {
                self.clear(&dependents);
                Ok(SessionOutcome::Pricing(result))
            }
            None => {
                self.clear(&dependents);
                Ok(SessionOutcome::Empty)
            }
        }
    }

    fn solve_break_even(&mut self, config: &PortalConfig) -> CoreResult<SessionOutcome> {
        let mode = match self.last_edited.as_deref() {
            Some(META_LUCRO) => GoalMode::Profit,
            _ => GoalMode::Revenue,
        };
        let authoritative = goal_field(mode);
        let dependent = match mode {
            GoalMode::Revenue => META_LUCRO,
            GoalMode::Profit => META_FATURAMENTO,
        };

        let inputs = BreakEvenInputs {
            fixed_costs: self.number(CUSTOS_FIXOS)?,
            unit_price: self.number(PRECO_UNITARIO)?,
            unit_variable_cost: self.number(CUSTO_VARIAVEL)?,
            goal: BreakEvenGoal::from_mode(mode, self.number(authoritative)?),
        };

        let Some(result) = breakeven::compute(&inputs)? else {
            self.clear(&[dependent]);
            return Ok(SessionOutcome::Empty);
        };

        match result.values {
            Some(values) if !self.is_blank(authoritative) => {
                let projected = match mode {
                    GoalMode::Revenue => values.projected_profit,
                    GoalMode::Profit => values.projected_revenue,
                };
                self.write_back(dependent, projected, config.display_decimals);
            }
            _ => self.clear(&[dependent]),
        }

        Ok(SessionOutcome::BreakEven(result))
    }

    fn solve_difal(&mut self, config: &PortalConfig) -> CoreResult<SessionOutcome> {
        if self.is_blank(VALOR_PRODUTO) && self.is_blank(ALIQUOTA_DESTINO) {
            return Ok(SessionOutcome::Empty);
        }

        let interstate_rate = if self.is_blank(ALIQUOTA_INTERESTADUAL) {
            config.aliquots.interstate_rate
        } else {
            self.number(ALIQUOTA_INTERESTADUAL)?
        };

        let inputs = DifalInputs {
            product_value: self.number(VALOR_PRODUTO)?,
            interstate_rate,
            destination_rate: self.number(ALIQUOTA_DESTINO)?,
            base_reduction_percent: self.number(REDUCAO_BASE)?,
        };

        Ok(match difal::compute(&inputs)? {
            Some(result) => SessionOutcome::Difal(result),
            None => SessionOutcome::Empty,
        })
    }
}

// =============================================================================
// Display Summary
// =============================================================================

/// Formats an outcome into named result lines.
///
/// A rejected or impossible result gets a single `aviso` line with the reason.
fn summarize(outcome: &SessionOutcome, config: &PortalConfig) -> BTreeMap<String, String> {
    let decimals = config.display_decimals;
    let money = |value: f64| format_currency(value, &config.currency_symbol);
    let percent = |value: f64| format_percent(value, decimals);

    let lines: Vec<(&str, String)> = match outcome {
        SessionOutcome::Pricing(result) => match &result.infeasibility {
            Some(reason) => vec![("aviso", reason.to_string())],
            None => {
                let mut lines = vec![
                    ("preco_venda", money(result.sale)),
                    ("impostos", money(result.tax_value)),
                    ("receita_liquida", money(result.net_revenue)),
                    ("lucro_bruto", money(result.gross_profit)),
                    ("custo_fixo", money(result.fixed_cost_value)),
                    ("lucro_liquido", money(result.net_profit)),
                    ("margem_liquida", percent(result.net_margin_percent)),
                    ("margem_contribuicao", money(result.contribution_margin)),
                    ("preco_equilibrio", money(result.break_even_price)),
                ];
                if let Some(markup) = result.markup_percent {
                    lines.push(("markup", percent(markup)));
                }
                lines
            }
        },
        SessionOutcome::BreakEven(result) => match (result.values, result.error) {
            (Some(v), _) => vec![
                ("faturamento_equilibrio", money(v.break_even_revenue)),
                ("unidades_equilibrio", format_decimal(v.break_even_units, decimals)),
                ("margem_contribuicao", percent(v.contribution_margin_ratio * 100.0)),
                ("faturamento_projetado", money(v.projected_revenue)),
                ("lucro_projetado", money(v.projected_profit)),
                ("progresso", percent(v.progress_ratio * 100.0)),
                ("margem_seguranca", percent(v.safety_margin_percent)),
            ],
            (None, Some(reason)) => vec![("aviso", reason.to_string())],
            (None, None) => Vec::new(),
        },
        SessionOutcome::Difal(result) => match (result.values, result.error) {
            (Some(v), _) => vec![
                ("base_origem", money(v.origin_base)),
                ("credito", money(v.credit_value)),
                ("base_destino", money(v.destination_base)),
                ("debito", money(v.debit_value)),
                ("difal", money(v.amount_due)),
                ("diferencial", percent(v.rate_differential)),
            ],
            (None, Some(reason)) => vec![("aviso", reason.to_string())],
            (None, None) => Vec::new(),
        },
        SessionOutcome::Empty | SessionOutcome::Invalid { .. } => Vec::new(),
    };

    lines
        .into_iter()
        .map(|(key, text)| (key.to_string(), text))
        .collect()
}

// =============================================================================
// Shared State
// =============================================================================

/// The three forms, one per calculator.
#[derive(Debug, Clone)]
pub struct Sessions {
    pricing: CalculatorSession,
    break_even: CalculatorSession,
    difal: CalculatorSession,
}

impl Sessions {
    pub fn new(config: &PortalConfig) -> Self {
        Sessions {
            pricing: CalculatorSession::new(CalculatorKind::Pricing, config),
            break_even: CalculatorSession::new(CalculatorKind::BreakEven, config),
            difal: CalculatorSession::new(CalculatorKind::Difal, config),
        }
    }

    pub fn get(&self, kind: CalculatorKind) -> &CalculatorSession {
        match kind {
            CalculatorKind::Pricing => &self.pricing,
            CalculatorKind::BreakEven => &self.break_even,
            CalculatorKind::Difal => &self.difal,
        }
    }

    pub fn get_mut(&mut self, kind: CalculatorKind) -> &mut CalculatorSession {
        match kind {
            CalculatorKind::Pricing => &mut self.pricing,
            CalculatorKind::BreakEven => &mut self.break_even,
            CalculatorKind::Difal => &mut self.difal,
        }
    }
}

/// Shared session state.
///
/// ## Thread Safety
/// `Arc<Mutex<Sessions>>`: every command that edits a form holds the lock
/// for the whole edit-and-recompute, so two edits never interleave.
#[derive(Debug, Clone)]
pub struct SessionState {
    sessions: Arc<Mutex<Sessions>>,
}

impl SessionState {
    pub fn new(config: &PortalConfig) -> Self {
        SessionState {
            sessions: Arc::new(Mutex::new(Sessions::new(config))),
        }
    }

    /// Executes a function with read access to one session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let outcome = sessions.with_session(CalculatorKind::Difal, |s| s.outcome.clone());
    /// ```
    pub fn with_session<F, R>(&self, kind: CalculatorKind, f: F) -> R
    where
        F: FnOnce(&CalculatorSession) -> R,
    {
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        f(sessions.get(kind))
    }

    /// Executes a function with write access to one session.
    pub fn with_session_mut<F, R>(&self, kind: CalculatorKind, f: F) -> R
    where
        F: FnOnce(&mut CalculatorSession) -> R,
    {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        f(sessions.get_mut(kind))
    }

    /// Replaces one session with a blank form and returns it.
    pub fn reset(&self, kind: CalculatorKind, config: &PortalConfig) -> CalculatorSession {
        self.with_session_mut(kind, |session| {
            *session = CalculatorSession::new(kind, config);
            session.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PortalConfig {
        PortalConfig::from_toml_str("[aliquots.internal]\nSP = 18\nRJ = 20").unwrap()
    }

    fn pricing_session() -> (CalculatorSession, PortalConfig) {
        let config = config();
        let mut session = CalculatorSession::new(CalculatorKind::Pricing, &config);
        session.set_field(CUSTO, "100", &config).unwrap();
        session.set_field(IMPOSTOS, "18", &config).unwrap();
        session.set_field(CUSTO_FIXO, "20", &config).unwrap();
        (session, config)
    }

    fn pricing_result(session: &CalculatorSession) -> &PricingResult {
        match &session.outcome {
            SessionOutcome::Pricing(result) => result,
            other => panic!("expected pricing outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_new_session_is_blank() {
        let session = CalculatorSession::new(CalculatorKind::Pricing, &config());
        assert_eq!(session.fields.len(), 6);
        assert!(session.fields.values().all(String::is_empty));
        assert_eq!(session.outcome, SessionOutcome::Empty);
        assert_eq!(session.last_edited, None);
    }

    #[test]
    fn test_difal_session_prefills_interstate_rate() {
        let session = CalculatorSession::new(CalculatorKind::Difal, &config());
        assert_eq!(session.field(ALIQUOTA_INTERESTADUAL), "12,00");
        assert_eq!(session.outcome, SessionOutcome::Empty);
    }

    #[test]
    fn test_sale_price_writes_back_profit_fields() {
        let (mut session, config) = pricing_session();
        session.set_field(PRECO_VENDA, "300", &config).unwrap();

        assert_eq!(session.last_edited.as_deref(), Some(PRECO_VENDA));
        assert_eq!(session.field(PRECO_VENDA), "300");
        assert_eq!(session.field(LUCRO_VALOR), "86,00");
        assert_eq!(session.field(LUCRO_PERCENTUAL), "28,67");
        assert!((pricing_result(&session).net_profit - 86.0).abs() < 1e-9);
    }

    #[test]
    fn test_editing_profit_switches_mode() {
        let (mut session, config) = pricing_session();
        session.set_field(PRECO_VENDA, "300", &config).unwrap();
        session.set_field(LUCRO_VALOR, "100", &config).unwrap();

        let result = pricing_result(&session);
        assert_eq!(result.mode, PricingMode::LucroValor);
        assert_eq!(session.last_edited.as_deref(), Some(LUCRO_VALOR));
        assert_eq!(session.field(LUCRO_VALOR), "100");
        // (100 + 100) / 0.62
        assert_eq!(session.field(PRECO_VENDA), "322,58");
        assert_eq!(session.field(LUCRO_PERCENTUAL), "31,00");
    }

    #[test]
    fn test_editing_cost_keeps_last_mode() {
        let (mut session, config) = pricing_session();
        session.set_field(LUCRO_PERCENTUAL, "22", &config).unwrap();
        session.set_field(CUSTO, "50", &config).unwrap();

        let result = pricing_result(&session);
        assert_eq!(result.mode, PricingMode::LucroPercentual);
        assert_eq!(session.last_edited.as_deref(), Some(LUCRO_PERCENTUAL));
        // 50 / (0.62 − 0.22)
        assert_eq!(session.field(PRECO_VENDA), "125,00");
        assert_eq!(session.field(LUCRO_PERCENTUAL), "22");
    }

    #[test]
    fn test_impossible_ratios_clear_dependents() {
        let (mut session, config) = pricing_session();
        session.set_field(PRECO_VENDA, "300", &config).unwrap();
        session.set_field(IMPOSTOS, "85", &config).unwrap();

        assert!(pricing_result(&session).impossible);
        assert_eq!(session.field(LUCRO_VALOR), "");
        assert_eq!(session.field(PRECO_VENDA), "300");
    }

    #[test]
    fn test_blank_target_clears_result() {
        let (mut session, config) = pricing_session();
        session.set_field(LUCRO_VALOR, "100", &config).unwrap();
        assert!(matches!(session.outcome, SessionOutcome::Pricing(_)));

        session.set_field(LUCRO_VALOR, "", &config).unwrap();

        assert_eq!(session.last_edited.as_deref(), Some(LUCRO_VALOR));
        assert_eq!(session.outcome, SessionOutcome::Empty);
        assert_eq!(session.field(PRECO_VENDA), "");
        assert_eq!(session.field(LUCRO_PERCENTUAL), "");
        assert!(session.summary.is_empty());
    }

    #[test]
    fn test_pricing_summary_lines() {
        let (mut session, config) = pricing_session();
        session.set_field(PRECO_VENDA, "300", &config).unwrap();

        assert_eq!(session.summary["preco_venda"], "R$ 300,00");
        assert_eq!(session.summary["impostos"], "R$ 54,00");
        assert_eq!(session.summary["lucro_liquido"], "R$ 86,00");
        assert_eq!(session.summary["margem_liquida"], "28,67%");
        assert_eq!(session.summary["markup"], "200,00%");
        assert_eq!(session.summary["preco_equilibrio"], "R$ 161,29");
    }

    #[test]
    fn test_summary_uses_configured_currency_symbol() {
        let config = PortalConfig::from_toml_str("currency_symbol = \"US$\"").unwrap();
        let mut session = CalculatorSession::new(CalculatorKind::Difal, &config);
        session.set_field(VALOR_PRODUTO, "1.494,33", &config).unwrap();
        session.set_field(ALIQUOTA_DESTINO, "18", &config).unwrap();

        assert_eq!(session.summary["credito"], "US$ 179,32");
        assert_eq!(session.summary["difal"], "US$ 109,34");
        assert_eq!(session.summary["diferencial"], "6,00%");
    }

    #[test]
    fn test_impossible_result_summary_is_a_warning() {
        let (mut session, config) = pricing_session();
        session.set_field(PRECO_VENDA, "300", &config).unwrap();
        session.set_field(CUSTO_FIXO, "90", &config).unwrap();

        assert_eq!(session.summary.len(), 1);
        assert_eq!(
            session.summary["aviso"],
            "tax (18%) plus fixed cost (90%) take 100% or more of revenue"
        );
    }

    #[test]
    fn test_unparseable_field_is_invalid_outcome() {
        let (mut session, config) = pricing_session();
        session.set_field(CUSTO, "12abc", &config).unwrap();

        match &session.outcome {
            SessionOutcome::Invalid { field, .. } => assert_eq!(field, CUSTO),
            other => panic!("expected invalid outcome, got {:?}", other),
        }
        assert_eq!(session.field(CUSTO), "12abc");
    }

    #[test]
    fn test_solver_contract_error_names_form_field() {
        let (mut session, config) = pricing_session();
        session.set_field(CUSTO, "-5", &config).unwrap();

        match &session.outcome {
            SessionOutcome::Invalid { field, message } => {
                assert_eq!(field, CUSTO);
                assert_eq!(message, "cost must not be negative");
            }
            other => panic!("expected invalid outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let config = config();
        let mut session = CalculatorSession::new(CalculatorKind::BreakEven, &config);
        let err = session.set_field(CUSTO, "100", &config).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownField { .. }));
        assert_eq!(session.field(CUSTO), "");
    }

    #[test]
    fn test_break_even_goal_write_back() {
        let config = config();
        let mut session = CalculatorSession::new(CalculatorKind::BreakEven, &config);
        session.set_field(CUSTOS_FIXOS, "8.000", &config).unwrap();
        session.set_field(PRECO_UNITARIO, "50", &config).unwrap();
        session.set_field(CUSTO_VARIAVEL, "20", &config).unwrap();

        // no goal typed yet: nothing projected
        assert_eq!(session.field(META_LUCRO), "");

        session.set_field(META_FATURAMENTO, "20.000,00", &config).unwrap();
        assert_eq!(session.field(META_LUCRO), "4.000,00");

        session.set_field(META_LUCRO, "10.000", &config).unwrap();
        assert_eq!(session.field(META_FATURAMENTO), "30.000,00");
        assert_eq!(session.field(META_LUCRO), "10.000");

        match &session.outcome {
            SessionOutcome::BreakEven(result) => {
                let values = result.values.unwrap();
                assert_eq!(values.goal_mode, GoalMode::Profit);
                assert!((values.break_even_revenue - 13_333.333_333).abs() < 1e-6);
            }
            other => panic!("expected break-even outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_uf_lookup_fills_destination_rate() {
        let config = config();
        let mut session = CalculatorSession::new(CalculatorKind::Difal, &config);
        session.set_field(VALOR_PRODUTO, "1.494,33", &config).unwrap();
        session.set_field(UF_DESTINO, "sp", &config).unwrap();

        assert_eq!(session.field(UF_DESTINO), "SP");
        assert_eq!(session.field(ALIQUOTA_DESTINO), "18,00");
        match &session.outcome {
            SessionOutcome::Difal(result) => {
                let values = result.values.unwrap();
                assert!((values.amount_due - 109.34).abs() < 0.005);
            }
            other => panic!("expected DIFAL outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_uf_leaves_session_untouched() {
        let config = config();
        let mut session = CalculatorSession::new(CalculatorKind::Difal, &config);
        session.set_field(UF_DESTINO, "RJ", &config).unwrap();
        let before = session.fields.clone();

        let err = session.set_field(UF_DESTINO, "XX", &config).unwrap_err();
        assert_eq!(err, ValidationError::UnknownState { uf: "XX".to_string() });
        assert_eq!(session.fields, before);
    }

    #[test]
    fn test_difal_rate_ordering_outcome() {
        let config = config();
        let mut session = CalculatorSession::new(CalculatorKind::Difal, &config);
        session.set_field(VALOR_PRODUTO, "1000", &config).unwrap();
        session.set_field(ALIQUOTA_DESTINO, "7", &config).unwrap();

        match &session.outcome {
            SessionOutcome::Difal(result) => assert!(result.error.is_some()),
            other => panic!("expected DIFAL outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_state_reset_replaces_session() {
        let config = config();
        let state = SessionState::new(&config);
        let original_id = state.with_session(CalculatorKind::Pricing, |s| s.id);

        state
            .with_session_mut(CalculatorKind::Pricing, |s| s.set_field(CUSTO, "10", &config))
            .unwrap();
        let fresh = state.reset(CalculatorKind::Pricing, &config);

        assert_ne!(fresh.id, original_id);
        assert_eq!(fresh.field(CUSTO), "");
        assert_eq!(state.with_session(CalculatorKind::Pricing, |s| s.id), fresh.id);
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(SessionOutcome::Empty).unwrap();
        assert_eq!(json["status"], "empty");

        let invalid = SessionOutcome::Invalid {
            field: CUSTO.to_string(),
            message: "bad".to_string(),
        };
        let json = serde_json::to_value(invalid).unwrap();
        assert_eq!(json["status"], "invalid");
        assert_eq!(json["result"]["field"], "custo");
    }
}
