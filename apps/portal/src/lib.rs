//! # Margem Portal Library
//!
//! The application layer around `margem-core`: configuration, calculator
//! sessions, and the JSON-lines command loop a UI shell talks to.
//!
//! ## Module Organization
//! ```text
//! margem_portal_lib/
//! ├── lib.rs            ◄─── You are here (startup & run)
//! ├── ipc.rs            ◄─── Request/Response types, dispatch, serve loop
//! ├── state/
//! │   ├── mod.rs        ◄─── AppState
//! │   ├── session.rs    ◄─── CalculatorSession, SessionState
//! │   └── config.rs     ◄─── PortalConfig (config crate layering)
//! ├── commands/
//! │   ├── mod.rs        ◄─── Command exports
//! │   ├── session.rs    ◄─── get_session, set_field, reset_session
//! │   ├── pricing.rs    ◄─── solve_pricing
//! │   ├── break_even.rs ◄─── solve_break_even
//! │   ├── difal.rs      ◄─── solve_difal
//! │   └── config.rs     ◄─── get_config
//! └── error.rs          ◄─── API error type for commands
//! ```
//!
//! ## Channels
//! stdout carries only IPC responses; every log line goes to stderr.

pub mod commands;
pub mod error;
pub mod ipc;
pub mod state;

use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use state::{AppState, ConfigError, PortalConfig};

/// Runs the portal until stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Portal Startup                                    │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, writing to stderr             │
/// │     • Default: info,margem=debug; override with RUST_LOG                │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → margem.toml → MARGEM_* env                             │
/// │     • invalid config aborts startup                                     │
/// │                                                                         │
/// │  3. Initialize State ─────────────────────────────────────────────────► │
/// │     • one blank form per calculator                                     │
/// │                                                                         │
/// │  4. Serve stdin/stdout until EOF ─────────────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), PortalError> {
    init_tracing();

    info!("Starting Margem portal");

    let config = PortalConfig::load()?;
    info!(
        display_decimals = config.display_decimals,
        interstate_rate = config.aliquots.interstate_rate,
        states = config.aliquots.internal.len(),
        "Configuration loaded"
    );

    let app = AppState::new(config);

    let answered = ipc::serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), &app).await?;

    info!(answered, "Input closed, shutting down");
    Ok(())
}

/// Startup failures.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IPC channel failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=margem=trace` - Show trace for margem crates only
/// - Default: `info,margem=debug`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,margem=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
