//! # Checkout Command
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. with_engine_mut: begin_checkout()  → ticket, cart locked            │
//! │                                                                         │
//! │  2. service.submit(&ticket).await       (no engine lock held)           │
//! │         │                                                               │
//! │         ├── Ok(transaction) ──► complete_checkout(Succeeded)            │
//! │         │                       record_transaction, cart cleared        │
//! │         │                                                               │
//! │         └── Err ──────────────► complete_checkout(Failed)               │
//! │                                 cart kept, CHECKOUT_FAILED returned     │
//! │                                                                         │
//! │  While step 2 runs, other commands see CheckingOut and get BUSY.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use caja_core::{CheckoutResult, Transaction};
use tracing::debug;

use crate::collab::checkout::CheckoutService;
use crate::error::ApiError;
use crate::state::SessionState;

pub async fn checkout(
    session: &SessionState,
    service: &CheckoutService,
) -> Result<Transaction, ApiError> {
    debug!("checkout command");
    let ticket = session.with_engine_mut(|engine| engine.begin_checkout())?;

    match service.submit(&ticket).await {
        Ok(transaction) => {
            session.with_engine_mut(|engine| engine.complete_checkout(CheckoutResult::Succeeded))?;
            session.record_transaction(transaction.clone());
            Ok(transaction)
        }
        Err(err) => {
            session.with_engine_mut(|engine| engine.complete_checkout(CheckoutResult::Failed))?;
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::catalog::demo_catalog;
    use crate::commands::cart::{get_cart, select_product};
    use crate::error::ErrorCode;
    use caja_core::{Money, SalesState, Shift, ShiftStatus};
    use chrono::Utc;
    use std::sync::Arc;
    use std::time::Duration;

    fn session() -> SessionState {
        let shift = Shift {
            id: "shift-0001".to_string(),
            status: ShiftStatus::Open,
            opened_at: Utc::now(),
            closed_at: None,
            opening_float: Money::zero(),
        };
        SessionState::new(demo_catalog(), Some(shift))
    }

    #[tokio::test]
    async fn test_checkout_success_clears_cart() {
        let session = session();
        let service = CheckoutService::new(Duration::ZERO);
        select_product(&session, "p1").unwrap();
        select_product(&session, "p1").unwrap();

        let transaction = checkout(&session, &service).await.unwrap();
        assert_eq!(transaction.total.cents(), 500);
        assert_eq!(transaction.item_count, 2);
        assert_eq!(transaction.shift_id, "shift-0001");

        let cart = get_cart(&session);
        assert!(cart.items.is_empty());
        assert_eq!(cart.state, SalesState::Idle);
        assert_eq!(session.sales_so_far().cents(), 500);
    }

    #[tokio::test]
    async fn test_checkout_failure_keeps_cart() {
        let session = session();
        let service = CheckoutService::new(Duration::ZERO);
        select_product(&session, "p4").unwrap();
        service.fail_next();

        let err = checkout(&session, &service).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CheckoutFailed);

        let cart = get_cart(&session);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.state, SalesState::CartDirty);
        assert!(session.transactions().is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_is_refused() {
        let session = session();
        let service = CheckoutService::new(Duration::ZERO);
        let err = checkout(&session, &service).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Busy);
    }

    #[tokio::test]
    async fn test_cart_is_locked_while_in_flight() {
        let session = session();
        let service = Arc::new(CheckoutService::new(Duration::from_millis(200)));
        select_product(&session, "p1").unwrap();

        let in_flight = {
            let session = session.clone();
            let service = Arc::clone(&service);
            tokio::spawn(async move { checkout(&session, &service).await })
        };

        // Let the spawned task reach the simulated latency
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(get_cart(&session).state, SalesState::CheckingOut);
        let err = select_product(&session, "p1").unwrap_err();
        assert_eq!(err.code, ErrorCode::Busy);

        in_flight.await.unwrap().unwrap();
        assert!(get_cart(&session).items.is_empty());
    }
}
