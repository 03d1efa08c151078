//! # Cart Aggregator
//!
//! Owns the authoritative line-item list for the active sale.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Cashier Action           Engine Call             Cart Change           │
//! │  ──────────────           ───────────             ───────────           │
//! │                                                                         │
//! │  Click / scan product ──► add(product, variant?) ► merge by LineKey    │
//! │                                                                         │
//! │  Edit quantity ─────────► update_quantity() ─────► qty = n (≤0 drops)  │
//! │                                                                         │
//! │  Click remove ──────────► remove() ──────────────► idempotent delete   │
//! │                                                                         │
//! │  Line discount ─────────► apply_discount() ──────► attach / replace    │
//! │                                                                         │
//! │  Cancel sale ───────────► clear() ───────────────► empty               │
//! │                                                                         │
//! │  NOTE: stock is NOT checked here. Availability is decided upstream     │
//! │        (variant resolver) at selection time.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{SalesError, SalesResult};
use crate::money::Money;
use crate::types::{Discount, Product, ProductVariant};
use crate::validation::validate_quantity;

// =============================================================================
// Line Key
// =============================================================================

/// Identity of a cart line: (product, optional variant).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineKey {
    pub product_id: String,
    #[serde(default)]
    pub variant_id: Option<String>,
}

impl LineKey {
    pub fn product(product_id: impl Into<String>) -> Self {
        LineKey {
            product_id: product_id.into(),
            variant_id: None,
        }
    }

    pub fn variant(product_id: impl Into<String>, variant_id: impl Into<String>) -> Self {
        LineKey {
            product_id: product_id.into(),
            variant_id: Some(variant_id.into()),
        }
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variant_id {
            Some(variant_id) => write!(f, "{}/{}", self.product_id, variant_id),
            None => write!(f, "{}", self.product_id),
        }
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart.
///
/// ## Snapshot Pattern
/// `name` and `unit_price` are frozen when the line is created. A catalog
/// refresh after that does not reprice the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub variant_id: Option<String>,
    /// "Product" or "Product (Variant)" at time of adding.
    pub name: String,
    /// Always ≥ 1 while the line exists.
    pub quantity: i64,
    pub unit_price: Money,
    pub discount: Option<Discount>,
}

impl CartItem {
    fn new(product: &Product, variant: Option<&ProductVariant>) -> Self {
        let (name, unit_price, variant_id) = match variant {
            Some(v) => (
                format!("{} ({})", product.name, v.name),
                v.price,
                Some(v.id.clone()),
            ),
            None => (product.name.clone(), product.price, None),
        };
        CartItem {
            product_id: product.id.clone(),
            variant_id,
            name,
            quantity: 1,
            unit_price,
            discount: None,
        }
    }

    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id.clone(),
            variant_id: self.variant_id.clone(),
        }
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id && self.variant_id == key.variant_id
    }

    /// Unit price × quantity, before discount.
    pub fn gross_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    pub fn discount_amount(&self) -> Money {
        self.discount
            .map(|d| d.amount_off(self.gross_total()))
            .unwrap_or_default()
    }

    /// Gross minus discount. Not clamped: an over-discounted line goes
    /// negative and checkout decides what to do with it.
    pub fn line_total(&self) -> Money {
        self.gross_total() - self.discount_amount()
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart for the current session.
///
/// ## Invariants
/// - No two items share a `LineKey`
/// - Every item has quantity ≥ 1
/// - While locked, nothing changes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,
    #[serde(skip)]
    locked: bool,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds one unit of `product` (or of its `variant`).
    ///
    /// Merges into the existing line when the key is already present,
    /// otherwise appends a new line at quantity 1 with the current price
    /// snapshot. The caller has already validated availability.
    pub fn add(&mut self, product: &Product, variant: Option<&ProductVariant>) -> SalesResult<LineKey> {
        self.ensure_unlocked()?;

        let key = LineKey {
            product_id: product.id.clone(),
            variant_id: variant.map(|v| v.id.clone()),
        };

        if let Some(item) = self.items.iter_mut().find(|i| i.matches(&key)) {
            validate_quantity(item.quantity + 1)?;
            item.quantity += 1;
            debug!(line = %key, quantity = item.quantity, "Cart line incremented");
        } else {
            self.items.push(CartItem::new(product, variant));
            debug!(line = %key, "Cart line added");
        }

        Ok(key)
    }

    /// Sets a line's quantity. `quantity <= 0` removes the line; above
    /// `MAX_ITEM_QUANTITY` is refused and the line is left as it was.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) -> SalesResult<()> {
        self.ensure_unlocked()?;

        if quantity <= 0 {
            self.remove_unchecked(key);
            return Ok(());
        }
        validate_quantity(quantity)?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.matches(key))
            .ok_or_else(|| SalesError::LineNotFound(key.clone()))?;
        item.quantity = quantity;
        Ok(())
    }

    /// Removes a line. Removing an absent line is a no-op.
    ///
    /// Returns whether a line was actually removed.
    pub fn remove(&mut self, key: &LineKey) -> SalesResult<bool> {
        self.ensure_unlocked()?;
        Ok(self.remove_unchecked(key))
    }

    /// Attaches or replaces the discount on one line.
    pub fn apply_discount(&mut self, key: &LineKey, discount: Discount) -> SalesResult<()> {
        self.ensure_unlocked()?;
        let item = self
            .items
            .iter_mut()
            .find(|i| i.matches(key))
            .ok_or_else(|| SalesError::LineNotFound(key.clone()))?;
        item.discount = Some(discount);
        Ok(())
    }

    pub fn clear_discount(&mut self, key: &LineKey) -> SalesResult<()> {
        self.ensure_unlocked()?;
        let item = self
            .items
            .iter_mut()
            .find(|i| i.matches(key))
            .ok_or_else(|| SalesError::LineNotFound(key.clone()))?;
        item.discount = None;
        Ok(())
    }

    /// Empties the cart, discounts included.
    pub fn clear(&mut self) -> SalesResult<()> {
        self.ensure_unlocked()?;
        self.items.clear();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Checkout lock
    // -------------------------------------------------------------------------

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, key: &LineKey) -> Option<&CartItem> {
        self.items.iter().find(|i| i.matches(key))
    }

    /// Units of `product_id` in the cart, across all of its variants.
    pub fn quantity_in_cart(&self, product_id: &str) -> i64 {
        self.items
            .iter()
            .filter(|i| i.product_id == product_id)
            .map(|i| i.quantity)
            .sum()
    }

    /// Units of one exact line (per-variant badge).
    pub fn quantity_of(&self, key: &LineKey) -> i64 {
        self.get(key).map(|i| i.quantity).unwrap_or(0)
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::gross_total).sum()
    }

    pub fn discount_total(&self) -> Money {
        self.items.iter().map(CartItem::discount_amount).sum()
    }

    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn ensure_unlocked(&self) -> SalesResult<()> {
        if self.locked {
            return Err(SalesError::CheckoutInFlight);
        }
        Ok(())
    }

    fn remove_unchecked(&mut self, key: &LineKey) -> bool {
        let before = self.items.len();
        self.items.retain(|i| !i.matches(key));
        let removed = self.items.len() != before;
        if removed {
            debug!(line = %key, "Cart line removed");
        }
        removed
    }
}

/// Cart totals summary for responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
            discount: cart.discount_total(),
            total: cart.total(),
        }
    }
}
