//! # Shift Gate
//!
//! Decides whether sales interaction is permitted, and routes cash-control
//! requests to the collaborator that owns shift state.
//!
//! ## Gate States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────┐   collaborator acks OPEN    ┌──────────┐                │
//! │   │  CLOSED  │ ──────────────────────────► │   OPEN   │                │
//! │   │          │ ◄────────────────────────── │          │                │
//! │   └──────────┘   collaborator closes shift └──────────┘                │
//! │                                                                         │
//! │   affordance: request_open  (OPEN)   affordance: request_movement (IN) │
//! │   sales surface: blocked             sales surface: available          │
//! │                                                                         │
//! │   The gate never flips itself. Only set_active_shift() moves it.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ts_rs::TS;

use crate::error::{SalesError, SalesResult};
use crate::money::Money;
use crate::types::{Shift, Transaction};

/// Intent passed to the cash-control collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashIntent {
    /// Open a new shift.
    Open,
    /// Register a cash movement into the drawer.
    In,
}

/// The external collaborator that owns shift lifecycle and cash movements.
///
/// Acknowledgement is not returned here: the collaborator reports the new
/// shift back through [`ShiftGate::set_active_shift`] when it is done.
pub trait CashControl {
    fn request_cash_control(&mut self, intent: CashIntent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateState {
    Closed,
    Open,
}

#[derive(Debug, Clone, Default)]
pub struct ShiftGate {
    active_shift: Option<Shift>,
}

impl ShiftGate {
    pub fn new(active_shift: Option<Shift>) -> Self {
        ShiftGate {
            active_shift: active_shift.filter(Shift::is_open),
        }
    }

    pub fn state(&self) -> GateState {
        match self.active_shift {
            Some(_) => GateState::Open,
            None => GateState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == GateState::Open
    }

    pub fn active_shift(&self) -> Option<&Shift> {
        self.active_shift.as_ref()
    }

    /// Applies the collaborator's authoritative shift value.
    ///
    /// A shift record whose status is `Closed` counts as no shift.
    pub fn set_active_shift(&mut self, shift: Option<Shift>) {
        let shift = shift.filter(Shift::is_open);
        match (&self.active_shift, &shift) {
            (None, Some(s)) => info!(shift = %s.id, "Shift opened, sales unlocked"),
            (Some(old), None) => info!(shift = %old.id, "Shift closed, sales locked"),
            (Some(old), Some(new)) if old.id != new.id => {
                info!(from = %old.id, to = %new.id, "Active shift replaced")
            }
            _ => {}
        }
        self.active_shift = shift;
    }

    /// Admits a sales action, or refuses it with `GateClosed`.
    pub fn admit(&self) -> SalesResult<&Shift> {
        self.active_shift.as_ref().ok_or(SalesError::GateClosed)
    }

    /// Intents the surface should offer in the current state.
    pub fn affordances(&self) -> &'static [CashIntent] {
        match self.state() {
            GateState::Closed => &[CashIntent::Open],
            GateState::Open => &[CashIntent::In],
        }
    }

    /// Asks the collaborator to open a shift. Only meaningful while closed.
    pub fn request_open(&self, control: &mut dyn CashControl) -> SalesResult<()> {
        if let Some(shift) = &self.active_shift {
            warn!(shift = %shift.id, "Open requested while a shift is active");
            return Err(SalesError::ShiftAlreadyOpen(shift.id.clone()));
        }
        control.request_cash_control(CashIntent::Open);
        Ok(())
    }

    /// Asks the collaborator to record a cash movement. Requires an open
    /// shift.
    pub fn request_movement(&self, control: &mut dyn CashControl) -> SalesResult<()> {
        self.admit()?;
        control.request_cash_control(CashIntent::In);
        Ok(())
    }

    /// Short label of the active shift ("Turno #a1b2" on screen).
    pub fn label(&self) -> Option<&str> {
        self.active_shift.as_ref().map(Shift::label)
    }

    /// Live "sales so far" for the active shift. Zero while closed.
    pub fn sales_so_far(&self, transactions: &[Transaction]) -> Money {
        match &self.active_shift {
            Some(shift) => transactions
                .iter()
                .filter(|t| t.shift_id == shift.id)
                .map(|t| t.total)
                .sum(),
            None => Money::zero(),
        }
    }
}
