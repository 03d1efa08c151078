//! # Shift Commands
//!
//! The register-open badge, the "open register" affordance while closed, and
//! the cash-in affordance while open. The drawer decides; the engine only
//! learns the outcome through `set_active_shift`.

use caja_core::{CashIntent, Money, SalesError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::collab::cash::CashDrawer;
use crate::error::ApiError;
use crate::state::SessionState;

/// Shift badge data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftResponse {
    pub open: bool,
    /// Last four characters of the shift id ("Turno #a1b2").
    pub label: Option<String>,
    pub opened_at: Option<DateTime<Utc>>,
    pub sales_so_far: Money,
    /// What the cash-control button offers right now.
    pub affordances: Vec<CashIntent>,
}

pub fn get_shift(session: &SessionState) -> ShiftResponse {
    let sales_so_far = session.sales_so_far();
    session.with_engine(|engine| {
        let gate = engine.gate();
        ShiftResponse {
            open: gate.is_open(),
            label: gate.label().map(str::to_string),
            opened_at: gate.active_shift().map(|s| s.opened_at),
            sales_so_far,
            affordances: gate.affordances().to_vec(),
        }
    })
}

/// Asks the drawer to open a shift and feeds the acknowledgement back.
pub fn open_shift(session: &SessionState, drawer: &mut CashDrawer) -> Result<ShiftResponse, ApiError> {
    debug!("open_shift command");
    session.with_engine_mut(|engine| {
        engine.request_open(&mut *drawer)?;
        if let Some(shift) = drawer.take_acknowledged() {
            engine.set_active_shift(Some(shift));
        }
        Ok::<(), ApiError>(())
    })?;
    Ok(get_shift(session))
}

/// Records cash put into the drawer. Requires an open shift.
pub fn cash_in(
    session: &SessionState,
    drawer: &mut CashDrawer,
    amount: Money,
) -> Result<ShiftResponse, ApiError> {
    debug!(amount = %amount, "cash_in command");
    if amount.is_negative() || amount.is_zero() {
        return Err(ApiError::validation("Cash-in amount must be positive"));
    }
    drawer.stage_movement(amount);
    session.with_engine(|engine| engine.request_movement(&mut *drawer))?;
    Ok(get_shift(session))
}

/// Closes the drawer's shift. The engine locks the sales surface.
pub fn close_shift(session: &SessionState, drawer: &mut CashDrawer) -> Result<ShiftResponse, ApiError> {
    debug!("close_shift command");
    let closed = drawer.close_shift();
    if closed.is_none() {
        return Err(SalesError::GateClosed.into());
    }
    session.with_engine_mut(|engine| engine.set_active_shift(None));
    Ok(get_shift(session))
}
