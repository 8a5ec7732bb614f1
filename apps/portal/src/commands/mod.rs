//! # Commands Module
//!
//! Every operation the UI shell can request.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs          ◄─── You are here (exports)
//! ├── session.rs      ◄─── get_session, set_field, reset_session
//! ├── pricing.rs      ◄─── solve_pricing
//! ├── break_even.rs   ◄─── solve_break_even
//! ├── difal.rs        ◄─── solve_difal
//! └── config.rs       ◄─── get_config
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin:  {"command":"set_field","calculator":"pricing",                 │
//! │           "field":"preco_venda","value":"300"}                           │
//! │         │                                                               │
//! │         ▼  ipc::dispatch                                                │
//! │  commands::session::set_field(&state.sessions, &state.config, ...)     │
//! │      -> Result<CalculatorSession, ApiError>                             │
//! │         │                                                               │
//! │         ▼  JSON serialization                                           │
//! │  stdout: {"ok":{"id":"...","kind":"pricing","fields":{...},...}}        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands take only the state they need, so they are plain functions
//! callable from tests without the IPC loop.

pub mod break_even;
pub mod config;
pub mod difal;
pub mod pricing;
pub mod session;
