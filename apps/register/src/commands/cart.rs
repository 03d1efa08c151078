//! # Cart Commands
//!
//! Product selection, the variant-choice step, and the cart panel.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checking │────►│  Empty   │       │
//! │  │  Cart    │     │          │     │   Out    │     │  Cart    │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │   ▲             │ failed                       │
//! │              select_product│             └──────► back to In Cart       │
//! │              choose_variant│                                            │
//! │              update / remove / discount                                 │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────► Empty              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use caja_core::{
    CartItem, CartTotals, Discount, LineKey, SalesEngine, SalesState, SelectOutcome,
    VariantPicker,
};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::SessionState;

/// Cart response including items, totals and the engine state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
    pub state: SalesState,
}

impl From<&SalesEngine> for CartResponse {
    fn from(engine: &SalesEngine) -> Self {
        CartResponse {
            items: engine.cart().items().to_vec(),
            totals: engine.totals(),
            state: engine.state().clone(),
        }
    }
}

/// What the front end shows after a product is selected or scanned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectResponse {
    Added { line: LineKey, cart: CartResponse },
    ChooseVariant { picker: VariantPicker },
}

impl SelectResponse {
    pub(crate) fn from_outcome(outcome: SelectOutcome, engine: &SalesEngine) -> Self {
        match outcome {
            SelectOutcome::Added(line) => SelectResponse::Added {
                line,
                cart: CartResponse::from(engine),
            },
            SelectOutcome::AwaitingVariant(picker) => SelectResponse::ChooseVariant { picker },
        }
    }
}

/// Gets the current cart contents.
pub fn get_cart(session: &SessionState) -> CartResponse {
    session.with_engine(|engine| CartResponse::from(engine))
}

/// Selects a product tile.
///
/// ## Behavior
/// - Variant-less product in stock: one unit added (merged by line key)
/// - Product with variants: the variant-choice step opens
/// - Out of stock: refused with `UNAVAILABLE`, cart unchanged
pub fn select_product(session: &SessionState, product_id: &str) -> Result<SelectResponse, ApiError> {
    debug!(product_id = %product_id, "select_product command");
    session.with_engine_mut(|engine| {
        let outcome = engine.select(product_id)?;
        Ok(SelectResponse::from_outcome(outcome, engine))
    })
}

/// Picks a variant in the open variant-choice step.
pub fn choose_variant(session: &SessionState, variant_id: &str) -> Result<CartResponse, ApiError> {
    debug!(variant_id = %variant_id, "choose_variant command");
    session.with_engine_mut(|engine| {
        engine.choose_variant(variant_id)?;
        Ok(CartResponse::from(&*engine))
    })
}

/// The open variant-choice step, rebuilt with current cart badges.
pub fn get_variant_picker(session: &SessionState) -> Option<VariantPicker> {
    session.with_engine(SalesEngine::variant_picker)
}

pub fn dismiss_variant_choice(session: &SessionState) -> Result<CartResponse, ApiError> {
    debug!("dismiss_variant_choice command");
    session.with_engine_mut(|engine| {
        engine.dismiss_variant_choice()?;
        Ok(CartResponse::from(&*engine))
    })
}

/// Sets the quantity of a cart line. Zero or less removes it.
pub fn update_cart_item(
    session: &SessionState,
    line: &LineKey,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(line = %line, quantity = %quantity, "update_cart_item command");
    session.with_engine_mut(|engine| {
        engine.update_quantity(line, quantity)?;
        Ok(CartResponse::from(&*engine))
    })
}

/// Removes a cart line. Removing a missing line is not an error.
pub fn remove_from_cart(session: &SessionState, line: &LineKey) -> Result<CartResponse, ApiError> {
    debug!(line = %line, "remove_from_cart command");
    session.with_engine_mut(|engine| {
        engine.remove(line)?;
        Ok(CartResponse::from(&*engine))
    })
}

pub fn apply_discount(
    session: &SessionState,
    line: &LineKey,
    discount: Discount,
) -> Result<CartResponse, ApiError> {
    debug!(line = %line, ?discount, "apply_discount command");
    session.with_engine_mut(|engine| {
        engine.apply_discount(line, discount)?;
        Ok(CartResponse::from(&*engine))
    })
}

pub fn clear_discount(session: &SessionState, line: &LineKey) -> Result<CartResponse, ApiError> {
    debug!(line = %line, "clear_discount command");
    session.with_engine_mut(|engine| {
        engine.clear_discount(line)?;
        Ok(CartResponse::from(&*engine))
    })
}

/// Clears all items from the cart.
pub fn clear_cart(session: &SessionState) -> Result<CartResponse, ApiError> {
    debug!("clear_cart command");
    session.with_engine_mut(|engine| {
        engine.clear()?;
        Ok(CartResponse::from(&*engine))
    })
}
