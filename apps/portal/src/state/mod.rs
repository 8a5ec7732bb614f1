//! # State Module
//!
//! Shared state the command layer works against.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │                         ┌──────────────┐                                │
//! │                         │   AppState   │  cloned into every task        │
//! │                         └──────┬───────┘                                │
//! │                    ┌───────────┴───────────┐                            │
//! │                    ▼                       ▼                            │
//! │          ┌──────────────────┐    ┌──────────────────┐                   │
//! │          │  SessionState    │    │  PortalConfig    │                   │
//! │          │                  │    │                  │                   │
//! │          │  Arc<Mutex<      │    │  Arc (read-only) │                   │
//! │          │    Sessions      │    │  aliquots        │                   │
//! │          │  >>              │    │  display_decimals│                   │
//! │          └──────────────────┘    └──────────────────┘                   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SessionState: one lock around the three forms                       │
//! │  • PortalConfig: immutable after startup                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

use std::sync::Arc;

pub use config::{
    config_file_path, AliquotTable, ConfigError, PortalConfig, CONFIG_FILE_NAME, CONFIG_PATH_ENV,
};
pub use session::{
    field_keys, is_target_field, CalculatorSession, SessionOutcome, SessionState, Sessions,
};

/// Everything a command may need, cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub sessions: SessionState,
    pub config: Arc<PortalConfig>,
}

impl AppState {
    pub fn new(config: PortalConfig) -> Self {
        AppState {
            sessions: SessionState::new(&config),
            config: Arc::new(config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(PortalConfig::default())
    }
}
