//! # Session State
//!
//! The register's live sales session: the engine plus the history of sales
//! recorded by the checkout collaborator.
//!
//! The engine is wrapped in `Arc<Mutex<T>>` because:
//! 1. The checkout command runs async and may be driven from another task
//! 2. Each command must see and mutate the engine atomically
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command A (select)          Command B (checkout)                       │
//! │       │                           │                                     │
//! │       ▼                           ▼                                     │
//! │  with_engine_mut ──┐         with_engine_mut (begin_checkout)           │
//! │                    │              │ lock released                       │
//! │                    │              ▼                                     │
//! │                    │         submit().await    ◄── no lock held         │
//! │                    │              │                                     │
//! │                    │              ▼                                     │
//! │                    └──────►  with_engine_mut (complete_checkout)        │
//! │                                                                         │
//! │  NOTE: The lock is never held across an .await point.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use caja_core::{Money, Product, SalesEngine, Shift, Transaction};
use tracing::debug;

/// Thread-safe handle to the sales session.
#[derive(Debug, Clone)]
pub struct SessionState {
    engine: Arc<Mutex<SalesEngine>>,
    transactions: Arc<Mutex<Vec<Transaction>>>,
}

impl SessionState {
    pub fn new(products: Vec<Product>, active_shift: Option<Shift>) -> Self {
        SessionState {
            engine: Arc::new(Mutex::new(SalesEngine::new(products, active_shift))),
            transactions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Executes a function with read access to the engine.
    pub fn with_engine<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SalesEngine) -> R,
    {
        let engine = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
        f(&engine)
    }

    /// Executes a function with write access to the engine.
    pub fn with_engine_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SalesEngine) -> R,
    {
        let mut engine = self.engine.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut engine)
    }

    pub fn record_transaction(&self, transaction: Transaction) {
        debug!(transaction = %transaction.id, total = %transaction.total, "Transaction recorded");
        self.transactions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(transaction);
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Sales recorded against the active shift so far.
    pub fn sales_so_far(&self) -> Money {
        let transactions = self.transactions.lock().unwrap_or_else(PoisonError::into_inner);
        self.with_engine(|engine| engine.sales_so_far(&transactions))
    }
}
