//! # Commands Module
//!
//! Every action the register front end can take. Each command borrows the
//! state it needs, runs the engine inside a `SessionState` closure, and
//! returns `Result<T, ApiError>`.
//!
//! ## Command Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐   │
//! │  │  catalog.rs  │ │   cart.rs    │ │   scan.rs    │ │  shift.rs    │   │
//! │  │              │ │              │ │              │ │              │   │
//! │  │ list_products│ │ select       │ │ scan_barcode │ │ get_shift    │   │
//! │  │ categories   │ │ choose_var.  │ │ scan_key     │ │ open_shift   │   │
//! │  │              │ │ update/remove│ │              │ │ cash_in      │   │
//! │  │              │ │ discounts    │ │              │ │ close_shift  │   │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘   │
//! │                                                                         │
//! │  ┌──────────────┐                                                       │
//! │  │ checkout.rs  │  async: begin ─► submit().await ─► complete           │
//! │  └──────────────┘                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod scan;
pub mod shift;
