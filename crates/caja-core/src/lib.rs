//! # caja-core: Sales Logic for Caja POS
//!
//! The shift-gated sales surface of the register: catalog search, product and
//! variant selection, barcode scanning, and the cart aggregate. Pure logic,
//! no I/O and no async.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Caja POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                caja-register (console app)                      │   │
//! │  │   commands ──► SessionState ──► collaborators                   │   │
//! │  │                (catalog file, cash drawer, checkout service)    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ caja-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │                      ┌──────────────┐                           │   │
//! │  │                      │ SalesEngine  │                           │   │
//! │  │                      └──────┬───────┘                           │   │
//! │  │     ┌──────────┬────────────┼───────────┬───────────┐          │   │
//! │  │     ▼          ▼            ▼           ▼           ▼          │   │
//! │  │  ┌───────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐    │   │
//! │  │  │ shift │ │ catalog │ │ variant │ │   cart   │ │  scan  │    │   │
//! │  │  │ gate  │ │  index  │ │resolver │ │aggregator│ │ buffer │    │   │
//! │  │  └───────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO ASYNC                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - The sales state machine that wires everything together
//! - [`shift`] - Shift gate and the cash-control collaborator trait
//! - [`catalog`] - Search, category filter, barcode lookup, stock badges
//! - [`variant`] - Selection routing and the variant-choice step
//! - [`cart`] - Line-keyed cart aggregate and totals
//! - [`scan`] - Scanner keystroke buffer
//! - [`types`] - Domain types (Product, Shift, Transaction, etc.)
//! - [`money`] - Integer-cent money
//! - [`error`] - Domain error types
//! - [`validation`] - Catalog load checks
//!
//! ## Example Usage
//!
//! ```rust
//! use caja_core::Money;
//! use caja_core::Discount;
//!
//! let gross = Money::from_cents(1000);
//! let off = Discount::Percentage { bps: 1500 }.amount_off(gross);
//! assert_eq!(off.cents(), 150);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod money;
pub mod scan;
pub mod shift;
pub mod types;
pub mod validation;
pub mod variant;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CartTotals, LineKey};
pub use engine::{CheckoutResult, CheckoutTicket, SalesEngine, SalesState, ScanOutcome, SelectOutcome};
pub use error::{ErrorKind, SalesError, SalesResult, ValidationError};
pub use money::Money;
pub use scan::Key;
pub use shift::{CashControl, CashIntent, GateState};
pub use types::*;
pub use variant::{PickerState, VariantOption, VariantPicker};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock at or below this (and above zero) shows the low-stock badge.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Maximum quantity on a single cart line.
pub const MAX_ITEM_QUANTITY: i64 = 999;
