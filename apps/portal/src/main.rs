//! # Margem Portal Entry Point
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Margem Portal                                    │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      UI shell (any language)                     │  │
//! │  │  • Pricing form     • Break-even form     • DIFAL form           │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                    one JSON request per line                            │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Rust Backend (this crate)                     │  │
//! │  │                                                                  │  │
//! │  │  main.rs ────► Starts the tokio runtime                         │  │
//! │  │  lib.rs ─────► Logging, config, state, serve loop               │  │
//! │  │  commands/ ──► set_field, solve_pricing, solve_difal, ...       │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match margem_portal_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("margem-portal: {}", err);
            ExitCode::FAILURE
        }
    }
}
