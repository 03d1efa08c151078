//! # State Module
//!
//! Application state for the register.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │          ┌──────────────────────┬──────────────────────┐               │
//! │          ▼                      ▼                                       │
//! │  ┌──────────────────────┐  ┌──────────────────┐                         │
//! │  │    SessionState      │  │   ConfigState    │                         │
//! │  │                      │  │                  │                         │
//! │  │  Arc<Mutex<          │  │  store_name      │                         │
//! │  │    SalesEngine>>     │  │  currency        │                         │
//! │  │  Arc<Mutex<          │  │  catalog_path    │                         │
//! │  │    Vec<Transaction>>>│  │  latency, float  │                         │
//! │  └──────────────────────┘  └──────────────────┘                         │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SessionState: Mutex held only inside closures, never across .await  │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::ConfigState;
pub use session::SessionState;
