//! # Cash Drawer
//!
//! Stand-in for the cash-control collaborator. It owns the shift lifecycle
//! and the drawer's cash movements; the engine only asks.
//!
//! ## Request / Acknowledge
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  engine.request_open(&mut drawer)                                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  drawer.request_cash_control(OPEN)  → new Shift staged                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  drawer.take_acknowledged()  ─────► engine.set_active_shift(Some(..))   │
//! │                                                                         │
//! │  engine.request_movement(&mut drawer)                                   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  drawer.request_cash_control(IN)    → CashMovement recorded             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use caja_core::{CashControl, CashIntent, Money, Shift, ShiftStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

/// Cash put into the drawer during a shift.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashMovement {
    pub id: String,
    pub shift_id: String,
    pub amount: Money,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct CashDrawer {
    opening_float: Money,
    current: Option<Shift>,
    acknowledged: Option<Shift>,
    staged_amount: Option<Money>,
    movements: Vec<CashMovement>,
}

impl CashDrawer {
    pub fn new(opening_float: Money) -> Self {
        CashDrawer {
            opening_float,
            ..CashDrawer::default()
        }
    }

    /// Sets the amount the next `In` request records.
    pub fn stage_movement(&mut self, amount: Money) {
        self.staged_amount = Some(amount);
    }

    /// Hands over a shift opened since the last call, for the engine.
    pub fn take_acknowledged(&mut self) -> Option<Shift> {
        self.acknowledged.take()
    }

    /// Closes the current shift and returns its final record.
    pub fn close_shift(&mut self) -> Option<Shift> {
        let mut shift = self.current.take()?;
        shift.status = ShiftStatus::Closed;
        shift.closed_at = Some(Utc::now());
        info!(shift = %shift.id, "Shift closed");
        Some(shift)
    }

    pub fn current_shift(&self) -> Option<&Shift> {
        self.current.as_ref()
    }

    pub fn movements(&self) -> &[CashMovement] {
        &self.movements
    }

    /// Opening float plus movements recorded for the current shift.
    pub fn expected_cash(&self) -> Money {
        match &self.current {
            Some(shift) => {
                shift.opening_float
                    + self
                        .movements
                        .iter()
                        .filter(|m| m.shift_id == shift.id)
                        .map(|m| m.amount)
                        .sum::<Money>()
            }
            None => Money::zero(),
        }
    }

    fn open_shift(&mut self) {
        if let Some(shift) = &self.current {
            warn!(shift = %shift.id, "Drawer already has an open shift");
            return;
        }
        let shift = Shift {
            id: Uuid::new_v4().to_string(),
            status: ShiftStatus::Open,
            opened_at: Utc::now(),
            closed_at: None,
            opening_float: self.opening_float,
        };
        info!(shift = %shift.id, float = %shift.opening_float, "Shift opened");
        self.current = Some(shift.clone());
        self.acknowledged = Some(shift);
    }

    fn record_movement(&mut self) {
        let amount = self.staged_amount.take().unwrap_or_default();
        let Some(shift) = &self.current else {
            warn!("Cash movement requested with no open shift");
            return;
        };
        let movement = CashMovement {
            id: Uuid::new_v4().to_string(),
            shift_id: shift.id.clone(),
            amount,
            recorded_at: Utc::now(),
        };
        info!(shift = %movement.shift_id, amount = %movement.amount, "Cash movement recorded");
        self.movements.push(movement);
    }
}

impl CashControl for CashDrawer {
    fn request_cash_control(&mut self, intent: CashIntent) {
        match intent {
            CashIntent::Open => self.open_shift(),
            CashIntent::In => self.record_movement(),
        }
    }
}
