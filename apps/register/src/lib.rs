//! # Caja Register Library
//!
//! The terminal register for Caja POS. Wires configuration, the product
//! catalog and the collaborator stand-ins around `caja-core`'s sales engine.
//!
//! ## Module Organization
//! ```text
//! caja_register/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── console.rs      ◄─── Line commands over stdin/stdout
//! ├── state/
//! │   ├── session.rs  ◄─── Engine behind Arc<Mutex>, sales history
//! │   └── config.rs   ◄─── Defaults → config.toml → CAJA_* env
//! ├── collab/
//! │   ├── catalog.rs  ◄─── Catalog JSON file or demo catalog
//! │   ├── cash.rs     ◄─── Cash drawer (shift lifecycle, cash in)
//! │   └── checkout.rs ◄─── Async checkout with simulated latency
//! ├── commands/       ◄─── catalog, cart, scan, shift, checkout
//! └── error.rs        ◄─── ApiError (notices) and AppError (startup)
//! ```

pub mod collab;
pub mod commands;
pub mod console;
pub mod error;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

use collab::catalog::load_catalog;
use console::Console;
use error::AppError;
use state::{ConfigState, SessionState};

/// Runs the register.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Register Startup                                  │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter (stderr)                       │
/// │     • Default: info,caja=debug, override with RUST_LOG                  │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults, config.toml, CAJA_* environment                         │
/// │                                                                         │
/// │  3. Load Catalog ─────────────────────────────────────────────────────► │
/// │     • JSON file if configured, demo catalog otherwise                   │
/// │     • invalid catalog aborts startup                                    │
/// │                                                                         │
/// │  4. Start Session ────────────────────────────────────────────────────► │
/// │     • engine starts with no shift: register closed                      │
/// │                                                                         │
/// │  5. Console loop until EOF or 'quit'                                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), AppError> {
    init_tracing();

    info!("Starting Caja POS register");

    let config = ConfigState::load(None)?;
    info!(store = %config.store_name, currency = %config.currency_code, "Configuration loaded");

    let products = load_catalog(config.catalog_path.as_deref())?;
    let session = SessionState::new(products, None);

    Console::new(config, session).run().await?;

    info!("Register stopped");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they never interleave with console output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=caja_core=trace` - Show trace for the engine only
/// - Default: INFO, DEBUG for caja crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,caja=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
