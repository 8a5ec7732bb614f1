//! # JSON-Lines IPC
//!
//! One request per input line, one response per output line.
//!
//! ## Wire Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request   {"command":"get_session","calculator":"difal"}              │
//! │            {"command":"set_field","calculator":"pricing",               │
//! │             "field":"custo","value":"1.234,56"}                         │
//! │            {"command":"solve_pricing","cost":100,"taxPercent":18,       │
//! │             "fixedCostPercent":20,                                      │
//! │             "target":{"mode":"venda","value":300}}                      │
//! │            {"command":"get_config"}                                     │
//! │                                                                         │
//! │  response  {"ok": <payload>}                                            │
//! │            {"error":{"code":"VALIDATION_ERROR","message":"..."}}         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Blank lines are skipped. EOF on the input ends the loop.

use margem_core::{BreakEvenInputs, CalculatorKind, DifalInputs, PricingInputs};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::commands;
use crate::error::ApiError;
use crate::state::AppState;

/// A request line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    GetSession {
        calculator: CalculatorKind,
    },
    SetField {
        calculator: CalculatorKind,
        field: String,
        value: String,
    },
    ResetSession {
        calculator: CalculatorKind,
    },
    SolvePricing(PricingInputs),
    SolveBreakEven(BreakEvenInputs),
    SolveDifal(DifalInputs),
    GetConfig,
}

impl Request {
    /// Command name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Request::GetSession { .. } => "get_session",
            Request::SetField { .. } => "set_field",
            Request::ResetSession { .. } => "reset_session",
            Request::SolvePricing(_) => "solve_pricing",
            Request::SolveBreakEven(_) => "solve_break_even",
            Request::SolveDifal(_) => "solve_difal",
            Request::GetConfig => "get_config",
        }
    }
}

/// A response line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Ok(Value),
    Error(ApiError),
}

impl From<Result<Value, ApiError>> for Response {
    fn from(result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(payload) => Response::Ok(payload),
            Err(err) => Response::Error(err),
        }
    }
}

/// Runs one request against the shared state.
pub fn dispatch(app: &AppState, request: Request) -> Result<Value, ApiError> {
    match request {
        Request::GetSession { calculator } => {
            to_payload(commands::session::get_session(&app.sessions, calculator))
        }
        Request::SetField {
            calculator,
            field,
            value,
        } => to_payload(commands::session::set_field(
            &app.sessions,
            &app.config,
            calculator,
            &field,
            &value,
        )?),
        Request::ResetSession { calculator } => to_payload(commands::session::reset_session(
            &app.sessions,
            &app.config,
            calculator,
        )),
        Request::SolvePricing(inputs) => to_payload(commands::pricing::solve_pricing(&inputs)?),
        Request::SolveBreakEven(inputs) => {
            to_payload(commands::break_even::solve_break_even(&inputs)?)
        }
        Request::SolveDifal(inputs) => to_payload(commands::difal::solve_difal(&inputs)?),
        Request::GetConfig => to_payload(commands::config::get_config(&app.config)),
    }
}

fn to_payload<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::internal(format!("Failed to encode response: {}", e)))
}

/// Parses and runs one raw line.
pub fn handle_line(app: &AppState, line: &str) -> Response {
    let request = match serde_json::from_str::<Request>(line) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Malformed request");
            return Response::Error(ApiError::validation(format!("Invalid request: {}", e)));
        }
    };

    debug!(command = request.name(), "Dispatching request");
    dispatch(app, request).into()
}

/// Serves requests until `reader` reaches EOF. Returns how many were answered.
pub async fn serve<R, W>(reader: R, mut writer: W, app: &AppState) -> std::io::Result<u64>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut answered = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(app, &line);
        let mut encoded = serde_json::to_string(&response)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        encoded.push('\n');

        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
        answered += 1;
    }

    Ok(answered)
}
