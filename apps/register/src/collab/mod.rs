//! # Collaborators
//!
//! In-process stand-ins for the systems the sales engine talks to but does
//! not own.
//!
//! - [`catalog`] - Product catalog source (JSON file or demo data)
//! - [`cash`] - Cash drawer: owns shift lifecycle and cash movements
//! - [`checkout`] - Records a sale after simulated latency

pub mod cash;
pub mod catalog;
pub mod checkout;
