//! # Sales Engine
//!
//! One explicit state machine tying the shift gate, catalog index, variant
//! resolver, cart aggregator and scan buffer together.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │            add / update / remove / clear                                │
//! │   ┌──────┐ ─────────────────────────────► ┌───────────┐                │
//! │   │ Idle │                                 │ CartDirty │                │
//! │   └──────┘ ◄───────────────────────────── └───────────┘                │
//! │      │  ▲        cart emptied                 │  ▲    │               │
//! │      │  │                                     │  │    │ begin_checkout│
//! │      │  │ dismiss / accepted variant          │  │    ▼               │
//! │      ▼  │                                     ▼  │  ┌─────────────┐   │
//! │   ┌─────────────────────────────┐                  │  │ CheckingOut │   │
//! │   │ AwaitingVariantChoice(prod) │ ◄────────────────┘  │ (cart locked│   │
//! │   └─────────────────────────────┘  select(variant     └─────────────┘   │
//! │     scans refused here              product)          complete_checkout │
//! │                                                         → Idle/CartDirty│
//! │                                                                         │
//! │   Every sales operation passes the shift gate first. Refused calls    │
//! │   return an error and leave every piece of state untouched.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use caja_core::engine::{SalesEngine, SalesState, SelectOutcome};
//! use caja_core::{Money, Product, Shift, ShiftStatus};
//!
//! let soda = Product {
//!     id: "p1".into(),
//!     name: "Soda".into(),
//!     category: "Bebidas".into(),
//!     price: Money::from_cents(250),
//!     stock: 2,
//!     barcode: Some("111".into()),
//!     has_variants: false,
//!     variants: vec![],
//! };
//! let shift = Shift {
//!     id: "shift-0001".into(),
//!     status: ShiftStatus::Open,
//!     opened_at: chrono::Utc::now(),
//!     closed_at: None,
//!     opening_float: Money::zero(),
//! };
//!
//! let mut engine = SalesEngine::new(vec![soda], Some(shift));
//! engine.select("p1").unwrap();
//! engine.select("p1").unwrap();
//!
//! assert_eq!(engine.quantity_in_cart("p1"), 2);
//! assert_eq!(engine.state(), &SalesState::CartDirty);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::cart::{Cart, CartItem, CartTotals, LineKey};
use crate::catalog;
use crate::error::{SalesError, SalesResult};
use crate::money::Money;
use crate::scan::{Key, ScanBuffer, ScanEvent};
use crate::shift::{CashControl, ShiftGate};
use crate::types::{CategoryFilter, Discount, Product, Shift, Transaction};
use crate::variant::{resolve_selection, resolve_variant, Selection, VariantPicker, VariantResolution};

// =============================================================================
// State & Outcomes
// =============================================================================

/// Named states of the sales surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SalesState {
    /// Nothing pending, cart empty.
    Idle,
    /// Nothing pending, cart has lines.
    CartDirty,
    /// Variant-choice step open for a snapshot of this product.
    AwaitingVariantChoice { product: Product },
    /// Cart handed to the checkout collaborator; cart is locked.
    CheckingOut,
}

/// What happened after a product was selected (click or scan).
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    Added(LineKey),
    AwaitingVariant(VariantPicker),
}

/// What happened after one key reached the scan dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Key buffered, nothing resolved yet.
    Pending,
    /// Terminator on an empty buffer.
    Empty,
    /// Terminator resolved to a product and routed like a click.
    Selected(SelectOutcome),
}

/// The frozen cart handed to the checkout collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutTicket {
    pub shift_id: String,
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

/// Result reported back by the checkout collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutResult {
    /// Sale recorded. The cart is cleared.
    Succeeded,
    /// Sale not recorded. The cart is kept for another attempt.
    Failed,
}

// =============================================================================
// Sales Engine
// =============================================================================

#[derive(Debug, Clone)]
pub struct SalesEngine {
    products: Vec<Product>,
    gate: ShiftGate,
    cart: Cart,
    scanner: ScanBuffer,
    state: SalesState,
}

impl SalesEngine {
    pub fn new(products: Vec<Product>, active_shift: Option<Shift>) -> Self {
        SalesEngine {
            products,
            gate: ShiftGate::new(active_shift),
            cart: Cart::new(),
            scanner: ScanBuffer::new(),
            state: SalesState::Idle,
        }
    }

    // -------------------------------------------------------------------------
    // Collaborator inputs
    // -------------------------------------------------------------------------

    /// Catalog refresh. A pending variant choice keeps its own snapshot.
    pub fn set_products(&mut self, products: Vec<Product>) {
        debug!(count = products.len(), "Catalog refreshed");
        self.products = products;
    }

    /// Shift collaborator acknowledgement (open or close).
    ///
    /// Losing the shift abandons a pending variant choice without touching
    /// the cart. An in-flight checkout stays in flight.
    pub fn set_active_shift(&mut self, shift: Option<Shift>) {
        self.gate.set_active_shift(shift);
        if !self.gate.is_open() {
            if let SalesState::AwaitingVariantChoice { product } = &self.state {
                debug!(product = %product.id, "Variant choice abandoned on shift close");
                self.state = SalesState::Idle;
                self.settle();
            }
            self.scanner.reset();
        }
    }

    pub fn request_open(&self, control: &mut dyn CashControl) -> SalesResult<()> {
        self.gate.request_open(control)
    }

    pub fn request_movement(&self, control: &mut dyn CashControl) -> SalesResult<()> {
        self.gate.request_movement(control)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Cashier clicked a product tile.
    pub fn select(&mut self, product_id: &str) -> SalesResult<SelectOutcome> {
        self.admit_selection()?;
        let product = catalog::find_by_id(&self.products, product_id)
            .cloned()
            .ok_or_else(|| SalesError::ProductNotFound(product_id.to_string()))?;
        self.dispatch(product)
    }

    /// Cashier picked a variant in the open variant-choice step.
    pub fn choose_variant(&mut self, variant_id: &str) -> SalesResult<LineKey> {
        self.gate.admit()?;
        let SalesState::AwaitingVariantChoice { product } = &self.state else {
            return Err(SalesError::NoVariantChoicePending);
        };

        if product.variants.is_empty() {
            return Err(SalesError::NoVariantsConfigured {
                name: product.name.clone(),
            });
        }

        let variant = product
            .variant(variant_id)
            .ok_or_else(|| SalesError::VariantNotFound {
                product_id: product.id.clone(),
                variant_id: variant_id.to_string(),
            })?;

        if resolve_variant(product, variant) == VariantResolution::Rejected {
            warn!(product = %product.id, variant = %variant.id, "Variant out of stock");
            return Err(SalesError::Unavailable {
                name: format!("{} ({})", product.name, variant.name),
            });
        }

        let key = self.cart.add(product, Some(variant))?;
        self.state = SalesState::Idle;
        self.settle();
        Ok(key)
    }

    /// Closes the variant-choice step. Never mutates the cart.
    pub fn dismiss_variant_choice(&mut self) -> SalesResult<()> {
        let SalesState::AwaitingVariantChoice { product } = &self.state else {
            return Err(SalesError::NoVariantChoicePending);
        };
        debug!(product = %product.id, "Variant choice dismissed");
        self.state = SalesState::Idle;
        self.settle();
        Ok(())
    }

    /// Scan dispatcher: one key from the scanner input.
    ///
    /// A completed code is looked up by barcode and routed exactly like a
    /// click. The buffer is reset on every terminator, hit or miss.
    pub fn on_key(&mut self, key: Key) -> SalesResult<ScanOutcome> {
        self.admit_selection()?;

        match self.scanner.on_key(key) {
            ScanEvent::Pending => Ok(ScanOutcome::Pending),
            ScanEvent::Empty => Ok(ScanOutcome::Empty),
            ScanEvent::Completed(code) => {
                let product = catalog::find_by_barcode(&self.products, &code)
                    .cloned()
                    .ok_or_else(|| {
                        warn!(barcode = %code, "Scanned barcode not in catalog");
                        SalesError::BarcodeNotFound(code.clone())
                    })?;
                debug!(barcode = %code, product = %product.id, "Scan resolved");
                self.dispatch(product).map(ScanOutcome::Selected)
            }
        }
    }

    /// Feeds a whole scanner burst (text followed by Enter).
    pub fn scan(&mut self, code: &str) -> SalesResult<ScanOutcome> {
        self.admit_selection()?;
        for c in code.chars() {
            self.on_key(Key::Char(c))?;
        }
        self.on_key(Key::Enter)
    }

    // -------------------------------------------------------------------------
    // Cart edits
    // -------------------------------------------------------------------------

    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) -> SalesResult<()> {
        self.gate.admit()?;
        self.cart.update_quantity(key, quantity)?;
        self.settle();
        Ok(())
    }

    pub fn remove(&mut self, key: &LineKey) -> SalesResult<bool> {
        self.gate.admit()?;
        let removed = self.cart.remove(key)?;
        self.settle();
        Ok(removed)
    }

    pub fn apply_discount(&mut self, key: &LineKey, discount: Discount) -> SalesResult<()> {
        self.gate.admit()?;
        self.cart.apply_discount(key, discount)
    }

    pub fn clear_discount(&mut self, key: &LineKey) -> SalesResult<()> {
        self.gate.admit()?;
        self.cart.clear_discount(key)
    }

    pub fn clear(&mut self) -> SalesResult<()> {
        self.gate.admit()?;
        self.cart.clear()?;
        self.settle();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    /// Locks the cart and hands a frozen copy to the checkout collaborator.
    pub fn begin_checkout(&mut self) -> SalesResult<CheckoutTicket> {
        let shift_id = self.gate.admit()?.id.clone();
        match &self.state {
            SalesState::CheckingOut => return Err(SalesError::CheckoutInFlight),
            SalesState::AwaitingVariantChoice { product } => {
                return Err(SalesError::VariantChoicePending(product.id.clone()))
            }
            SalesState::Idle | SalesState::CartDirty => {}
        }
        if self.cart.is_empty() {
            return Err(SalesError::EmptyCart);
        }

        self.cart.lock();
        self.state = SalesState::CheckingOut;

        let ticket = CheckoutTicket {
            shift_id,
            items: self.cart.items().to_vec(),
            totals: CartTotals::from(&self.cart),
        };
        info!(
            shift = %ticket.shift_id,
            lines = ticket.items.len(),
            total = %ticket.totals.total,
            "Checkout started"
        );
        Ok(ticket)
    }

    /// Applies the checkout collaborator's result and unlocks the cart.
    pub fn complete_checkout(&mut self, result: CheckoutResult) -> SalesResult<()> {
        if self.state != SalesState::CheckingOut {
            return Err(SalesError::NoCheckoutInFlight);
        }

        self.cart.unlock();
        match result {
            CheckoutResult::Succeeded => {
                self.cart.clear()?;
                info!("Checkout succeeded, cart cleared");
            }
            CheckoutResult::Failed => warn!("Checkout failed, cart kept"),
        }
        self.state = SalesState::Idle;
        self.settle();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn state(&self) -> &SalesState {
        &self.state
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(&self.cart)
    }

    pub fn gate(&self) -> &ShiftGate {
        &self.gate
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn scan_buffer(&self) -> &str {
        self.scanner.as_str()
    }

    pub fn quantity_in_cart(&self, product_id: &str) -> i64 {
        self.cart.quantity_in_cart(product_id)
    }

    /// Products to show for the current search box and category bar.
    /// Nothing while the gate is closed: the grid is part of the sales
    /// surface.
    pub fn visible_products<'a>(
        &'a self,
        search_term: &str,
        category: &'a CategoryFilter,
    ) -> impl Iterator<Item = &'a Product> + Clone + 'a {
        let products: &[Product] = if self.gate.is_open() {
            &self.products
        } else {
            &[]
        };
        catalog::filter(products, search_term, category)
    }

    /// The picker for the pending variant choice, rebuilt against the
    /// current cart.
    pub fn variant_picker(&self) -> Option<VariantPicker> {
        match &self.state {
            SalesState::AwaitingVariantChoice { product } => {
                Some(VariantPicker::new(product, &self.cart))
            }
            _ => None,
        }
    }

    pub fn sales_so_far(&self, transactions: &[Transaction]) -> Money {
        self.gate.sales_so_far(transactions)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Gate plus "nothing else pending" check for anything that could add.
    fn admit_selection(&self) -> SalesResult<()> {
        self.gate.admit()?;
        match &self.state {
            SalesState::AwaitingVariantChoice { product } => {
                Err(SalesError::VariantChoicePending(product.id.clone()))
            }
            SalesState::CheckingOut => Err(SalesError::CheckoutInFlight),
            SalesState::Idle | SalesState::CartDirty => Ok(()),
        }
    }

    fn dispatch(&mut self, product: Product) -> SalesResult<SelectOutcome> {
        match resolve_selection(&product) {
            Selection::Rejected => {
                warn!(product = %product.id, stock = product.stock, "Product out of stock");
                Err(SalesError::Unavailable { name: product.name })
            }
            Selection::DirectAdd => {
                let key = self.cart.add(&product, None)?;
                self.settle();
                Ok(SelectOutcome::Added(key))
            }
            Selection::RequireVariantChoice => {
                let picker = VariantPicker::new(&product, &self.cart);
                if picker.is_empty() {
                    warn!(product = %product.id, "Product has no variants configured");
                }
                debug!(product = %product.id, "Awaiting variant choice");
                self.state = SalesState::AwaitingVariantChoice { product };
                Ok(SelectOutcome::AwaitingVariant(picker))
            }
        }
    }

    /// Re-derives Idle/CartDirty from the cart. Leaves pending states alone.
    fn settle(&mut self) {
        if matches!(self.state, SalesState::Idle | SalesState::CartDirty) {
            self.state = if self.cart.is_empty() {
                SalesState::Idle
            } else {
                SalesState::CartDirty
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::shift::CashIntent;
    use crate::types::{ProductVariant, ShiftStatus};
    use chrono::Utc;

    fn open_shift() -> Shift {
        Shift {
            id: "shift-7f3a".to_string(),
            status: ShiftStatus::Open,
            opened_at: Utc::now(),
            closed_at: None,
            opening_float: Money::zero(),
        }
    }

    fn soda() -> Product {
        Product {
            id: "p1".to_string(),
            name: "Soda".to_string(),
            category: "Bebidas".to_string(),
            price: Money::from_cents(250),
            stock: 2,
            barcode: Some("111".to_string()),
            has_variants: false,
            variants: Vec::new(),
        }
    }

    fn shirt() -> Product {
        Product {
            id: "p2".to_string(),
            name: "Polo".to_string(),
            category: "Ropa".to_string(),
            price: Money::from_cents(1500),
            stock: 0,
            barcode: Some("ABC123".to_string()),
            has_variants: true,
            variants: vec![
                ProductVariant {
                    id: "v1".to_string(),
                    name: "S".to_string(),
                    price: Money::from_cents(1500),
                    stock: 0,
                },
                ProductVariant {
                    id: "v2".to_string(),
                    name: "M".to_string(),
                    price: Money::from_cents(1600),
                    stock: 5,
                },
            ],
        }
    }

    fn unconfigured() -> Product {
        Product {
            id: "p3".to_string(),
            name: "Gorra".to_string(),
            has_variants: true,
            variants: Vec::new(),
            stock: 9,
            barcode: Some("333".to_string()),
            ..soda()
        }
    }

    fn sold_out() -> Product {
        Product {
            id: "p4".to_string(),
            name: "Chicle".to_string(),
            stock: 0,
            barcode: Some("444".to_string()),
            ..soda()
        }
    }

    fn engine() -> SalesEngine {
        SalesEngine::new(
            vec![soda(), shirt(), unconfigured(), sold_out()],
            Some(open_shift()),
        )
    }

    #[test]
    fn test_soda_added_twice_merges() {
        let mut engine = engine();
        engine.select("p1").unwrap();
        engine.select("p1").unwrap();

        let items = engine.cart().items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, "p1");
        assert_eq!(items[0].variant_id, None);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(engine.state(), &SalesState::CartDirty);
    }

    #[test]
    fn test_variant_choice_rejects_then_accepts() {
        let mut engine = engine();

        let outcome = engine.select("p2").unwrap();
        let SelectOutcome::AwaitingVariant(picker) = outcome else {
            panic!("expected variant choice, got {:?}", outcome);
        };
        assert_eq!(picker.options().len(), 2);

        let err = engine.choose_variant("v1").unwrap_err();
        assert!(matches!(err, SalesError::Unavailable { .. }));
        assert!(engine.cart().is_empty());
        // Step stays open after a rejected pick
        assert!(matches!(
            engine.state(),
            SalesState::AwaitingVariantChoice { .. }
        ));

        let key = engine.choose_variant("v2").unwrap();
        assert_eq!(key, LineKey::variant("p2", "v2"));
        let line = engine.cart().get(&key).unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.unit_price.cents(), 1600);
        assert_eq!(engine.state(), &SalesState::CartDirty);
    }

    #[test]
    fn test_dismissed_choice_leaves_no_mutation() {
        let mut engine = engine();
        engine.select("p1").unwrap();
        let before = engine.cart().items().to_vec();

        engine.select("p2").unwrap();
        engine.dismiss_variant_choice().unwrap();

        assert_eq!(engine.cart().items(), before.as_slice());
        assert_eq!(engine.state(), &SalesState::CartDirty);
        assert!(matches!(
            engine.dismiss_variant_choice(),
            Err(SalesError::NoVariantChoicePending)
        ));
    }

    #[test]
    fn test_no_variants_configured_is_explicit() {
        let mut engine = engine();
        let outcome = engine.select("p3").unwrap();
        let SelectOutcome::AwaitingVariant(picker) = outcome else {
            panic!("expected variant choice, got {:?}", outcome);
        };
        assert!(picker.is_empty());

        let err = engine.choose_variant("anything").unwrap_err();
        assert!(matches!(err, SalesError::NoVariantsConfigured { .. }));
        assert!(engine.cart().is_empty());

        engine.dismiss_variant_choice().unwrap();
        assert_eq!(engine.state(), &SalesState::Idle);
    }

    #[test]
    fn test_out_of_stock_product_is_refused() {
        let mut engine = engine();
        let err = engine.select("p4").unwrap_err();
        assert!(matches!(err, SalesError::Unavailable { .. }));
        assert!(engine.cart().is_empty());
        assert_eq!(engine.state(), &SalesState::Idle);
    }

    #[test]
    fn test_unknown_product() {
        let mut engine = engine();
        assert!(matches!(
            engine.select("nope"),
            Err(SalesError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_add_does_not_recheck_stock() {
        // Soda has stock 2; a third add still goes through.
        let mut engine = engine();
        for _ in 0..3 {
            engine.select("p1").unwrap();
        }
        assert_eq!(engine.quantity_in_cart("p1"), 3);
    }

    #[test]
    fn test_scan_hit_routes_like_click() {
        let mut engine = engine();
        let outcome = engine.scan("111").unwrap();
        assert_eq!(
            outcome,
            ScanOutcome::Selected(SelectOutcome::Added(LineKey::product("p1")))
        );

        // case-insensitive, routes into variant choice
        let outcome = engine.scan("abc123").unwrap();
        assert!(matches!(
            outcome,
            ScanOutcome::Selected(SelectOutcome::AwaitingVariant(_))
        ));
    }

    #[test]
    fn test_scan_miss_resets_buffer() {
        let mut engine = engine();
        for c in "999".chars() {
            assert_eq!(engine.on_key(Key::Char(c)).unwrap(), ScanOutcome::Pending);
        }
        assert_eq!(engine.scan_buffer(), "999");

        let err = engine.on_key(Key::Enter).unwrap_err();
        assert!(matches!(err, SalesError::BarcodeNotFound(ref code) if code == "999"));
        assert_eq!(engine.scan_buffer(), "");
        assert!(engine.cart().is_empty());
    }

    #[test]
    fn test_blank_scan() {
        let mut engine = engine();
        assert_eq!(engine.on_key(Key::Enter).unwrap(), ScanOutcome::Empty);
    }

    #[test]
    fn test_scan_refused_while_variant_choice_pending() {
        let mut engine = engine();
        engine.select("p2").unwrap();

        let err = engine.on_key(Key::Char('1')).unwrap_err();
        assert!(matches!(err, SalesError::VariantChoicePending(_)));
        assert_eq!(engine.scan_buffer(), "");
        assert!(matches!(
            engine.select("p1"),
            Err(SalesError::VariantChoicePending(_))
        ));

        // The cart panel stays usable meanwhile
        engine.clear().unwrap();
    }

    #[test]
    fn test_closed_gate_is_a_safe_no_op() {
        let mut engine = SalesEngine::new(vec![soda(), shirt()], None);
        let key = LineKey::product("p1");

        assert!(matches!(engine.select("p1"), Err(SalesError::GateClosed)));
        assert!(matches!(engine.on_key(Key::Char('1')), Err(SalesError::GateClosed)));
        assert!(matches!(engine.update_quantity(&key, 3), Err(SalesError::GateClosed)));
        assert!(matches!(engine.remove(&key), Err(SalesError::GateClosed)));
        assert!(matches!(engine.clear(), Err(SalesError::GateClosed)));
        assert!(matches!(engine.begin_checkout(), Err(SalesError::GateClosed)));

        assert!(engine.cart().is_empty());
        assert_eq!(engine.scan_buffer(), "");
        assert_eq!(engine.state(), &SalesState::Idle);
        assert_eq!(engine.visible_products("", &CategoryFilter::All).count(), 0);

        engine.set_active_shift(Some(open_shift()));
        assert_eq!(engine.visible_products("", &CategoryFilter::All).count(), 2);
    }

    #[test]
    fn test_oversized_quantity_is_refused() {
        let mut engine = engine();
        let key = LineKey::product("p1");
        engine.select("p1").unwrap();

        let err = engine.update_quantity(&key, i64::MAX / 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(engine.quantity_in_cart("p1"), 1);
        assert_eq!(engine.totals().total, soda().price);
    }

    #[test]
    fn test_shift_close_abandons_variant_choice() {
        let mut engine = engine();
        engine.select("p1").unwrap();
        engine.select("p2").unwrap();

        engine.set_active_shift(None);
        assert_eq!(engine.state(), &SalesState::CartDirty);
        assert_eq!(engine.quantity_in_cart("p1"), 1);

        engine.set_active_shift(Some(open_shift()));
        engine.select("p1").unwrap();
        assert_eq!(engine.quantity_in_cart("p1"), 2);
    }

    #[test]
    fn test_cash_control_delegation() {
        #[derive(Default)]
        struct Recorder(Vec<CashIntent>);
        impl CashControl for Recorder {
            fn request_cash_control(&mut self, intent: CashIntent) {
                self.0.push(intent);
            }
        }

        let mut recorder = Recorder::default();
        let mut engine = SalesEngine::new(vec![soda()], None);
        engine.request_open(&mut recorder).unwrap();
        assert!(!engine.gate().is_open());

        engine.set_active_shift(Some(open_shift()));
        engine.request_movement(&mut recorder).unwrap();
        assert_eq!(recorder.0, [CashIntent::Open, CashIntent::In]);
    }

    #[test]
    fn test_checkout_locks_until_resolved() {
        let mut engine = engine();
        engine.select("p1").unwrap();

        let ticket = engine.begin_checkout().unwrap();
        assert_eq!(ticket.shift_id, "shift-7f3a");
        assert_eq!(ticket.totals.total.cents(), 250);
        assert_eq!(engine.state(), &SalesState::CheckingOut);

        let key = LineKey::product("p1");
        assert!(matches!(engine.select("p1"), Err(SalesError::CheckoutInFlight)));
        assert!(matches!(engine.scan("111"), Err(SalesError::CheckoutInFlight)));
        assert!(matches!(engine.update_quantity(&key, 5), Err(SalesError::CheckoutInFlight)));
        assert!(matches!(engine.clear(), Err(SalesError::CheckoutInFlight)));
        assert!(matches!(engine.begin_checkout(), Err(SalesError::CheckoutInFlight)));
        assert_eq!(engine.quantity_in_cart("p1"), 1);

        engine.complete_checkout(CheckoutResult::Succeeded).unwrap();
        assert!(engine.cart().is_empty());
        assert_eq!(engine.state(), &SalesState::Idle);
        assert!(matches!(
            engine.complete_checkout(CheckoutResult::Succeeded),
            Err(SalesError::NoCheckoutInFlight)
        ));
    }

    #[test]
    fn test_failed_checkout_keeps_cart() {
        let mut engine = engine();
        engine.select("p1").unwrap();
        engine.begin_checkout().unwrap();
        engine.complete_checkout(CheckoutResult::Failed).unwrap();

        assert_eq!(engine.quantity_in_cart("p1"), 1);
        assert_eq!(engine.state(), &SalesState::CartDirty);
        engine.select("p1").unwrap();
        assert_eq!(engine.quantity_in_cart("p1"), 2);
    }

    #[test]
    fn test_checkout_preconditions() {
        let mut engine = engine();
        assert!(matches!(engine.begin_checkout(), Err(SalesError::EmptyCart)));

        engine.select("p1").unwrap();
        engine.select("p2").unwrap();
        assert!(matches!(
            engine.begin_checkout(),
            Err(SalesError::VariantChoicePending(_))
        ));
    }

    #[test]
    fn test_clear_after_discounts() {
        let mut engine = engine();
        engine.select("p1").unwrap();
        engine.select("p1").unwrap();
        engine
            .apply_discount(&LineKey::product("p1"), Discount::Percentage { bps: 5000 })
            .unwrap();

        engine.clear().unwrap();
        assert!(engine.cart().is_empty());
        assert_eq!(engine.totals().total, Money::zero());
        assert_eq!(engine.state(), &SalesState::Idle);
    }

    #[test]
    fn test_removing_last_line_returns_to_idle() {
        let mut engine = engine();
        engine.select("p1").unwrap();
        let key = LineKey::product("p1");
        assert!(engine.remove(&key).unwrap());
        assert!(!engine.remove(&key).unwrap());
        assert_eq!(engine.state(), &SalesState::Idle);
    }

    #[test]
    fn test_visible_products_and_picker_refresh() {
        let mut engine = engine();
        let ropa = CategoryFilter::named("Ropa");
        let ids: Vec<_> = engine
            .visible_products("", &ropa)
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, ["p2"]);

        engine.select("p2").unwrap();
        engine.choose_variant("v2").unwrap();
        engine.select("p2").unwrap();
        let picker = engine.variant_picker().unwrap();
        assert_eq!(picker.options()[1].in_cart, 1);
    }
}
