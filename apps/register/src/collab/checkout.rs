//! # Checkout Service
//!
//! Stand-in for the payment/checkout collaborator. Takes the frozen cart
//! from [`SalesEngine::begin_checkout`](caja_core::SalesEngine::begin_checkout),
//! waits out a simulated round trip, and records a [`Transaction`].
//!
//! A single failure can be injected with [`CheckoutService::fail_next`], so the
//! "checkout failed, cart kept" path can be driven from the console and tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use caja_core::{CheckoutTicket, Transaction};
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Payment declined for shift {shift_id}")]
    Declined { shift_id: String },
}

#[derive(Debug)]
pub struct CheckoutService {
    latency: Duration,
    fail_next: AtomicBool,
}

impl CheckoutService {
    pub fn new(latency: Duration) -> Self {
        CheckoutService {
            latency,
            fail_next: AtomicBool::new(false),
        }
    }

    /// Makes the next submission fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub async fn submit(&self, ticket: &CheckoutTicket) -> Result<Transaction, CheckoutError> {
        debug!(shift = %ticket.shift_id, latency_ms = self.latency.as_millis() as u64, "Submitting sale");
        tokio::time::sleep(self.latency).await;

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(CheckoutError::Declined {
                shift_id: ticket.shift_id.clone(),
            });
        }

        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            shift_id: ticket.shift_id.clone(),
            total: ticket.totals.total,
            item_count: ticket.totals.total_quantity,
            created_at: Utc::now(),
        };
        info!(transaction = %transaction.id, total = %transaction.total, "Sale recorded");
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caja_core::{CartTotals, Money};

    fn ticket() -> CheckoutTicket {
        CheckoutTicket {
            shift_id: "shift-1".to_string(),
            items: Vec::new(),
            totals: CartTotals {
                item_count: 1,
                total_quantity: 3,
                subtotal: Money::from_cents(750),
                discount: Money::zero(),
                total: Money::from_cents(750),
            },
        }
    }

    #[tokio::test]
    async fn test_submit_records_transaction() {
        let service = CheckoutService::new(Duration::ZERO);
        let transaction = service.submit(&ticket()).await.unwrap();

        assert_eq!(transaction.shift_id, "shift-1");
        assert_eq!(transaction.total.cents(), 750);
        assert_eq!(transaction.item_count, 3);
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let service = CheckoutService::new(Duration::from_millis(1));
        service.fail_next();

        assert!(matches!(
            service.submit(&ticket()).await,
            Err(CheckoutError::Declined { .. })
        ));
        assert!(service.submit(&ticket()).await.is_ok());
    }
}
