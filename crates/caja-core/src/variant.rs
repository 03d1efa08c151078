//! # Variant Resolver
//!
//! Routes a selected product either straight into the cart or into a
//! variant-choice step, and validates the variant the cashier picks.
//!
//! ## Selection Routing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product clicked or scanned                                             │
//! │       │                                                                 │
//! │       ├── has_variants ──────────────► RequireVariantChoice             │
//! │       │                                   │                             │
//! │       │                                   ├── no variants listed        │
//! │       │                                   │     → NoVariantsConfigured  │
//! │       │                                   │       (explicit empty state)│
//! │       │                                   │                             │
//! │       │                                   └── pick variant              │
//! │       │                                         ├── stock ≤ 0 → Rejected│
//! │       │                                         └── else → Accepted     │
//! │       │                                                                 │
//! │       ├── stock ≤ 0 ─────────────────► Rejected                         │
//! │       │                                                                 │
//! │       └── otherwise ─────────────────► DirectAdd                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, LineKey};
use crate::types::{Product, ProductVariant};

/// Where a selected product goes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    DirectAdd,
    RequireVariantChoice,
    /// Variant-less product with no stock.
    Rejected,
}

/// Outcome of validating a picked variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantResolution {
    Accepted,
    Rejected,
}

/// Decides how a product selection proceeds.
///
/// `has_variants` always wins: parent stock is ignored for such products.
pub fn resolve_selection(product: &Product) -> Selection {
    if product.has_variants {
        Selection::RequireVariantChoice
    } else if product.stock <= 0 {
        Selection::Rejected
    } else {
        Selection::DirectAdd
    }
}

/// Validates a picked variant. Rejects iff `variant.stock <= 0`.
pub fn resolve_variant(_product: &Product, variant: &ProductVariant) -> VariantResolution {
    if variant.is_available() {
        VariantResolution::Accepted
    } else {
        VariantResolution::Rejected
    }
}

// =============================================================================
// Variant Picker
// =============================================================================

/// One row in the variant-choice step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VariantOption {
    pub variant: ProductVariant,
    /// False for zero-stock variants: shown disabled, not hidden.
    pub selectable: bool,
    /// Units of this exact variant already in the cart.
    pub in_cart: i64,
}

/// What the variant-choice step shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "state", content = "options", rename_all = "snake_case")]
pub enum PickerState {
    /// Product is flagged `has_variants` but lists none. Terminal: the
    /// only way out is dismissing the step.
    NoVariantsConfigured,
    Options(Vec<VariantOption>),
}

/// The data behind a variant-choice step for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VariantPicker {
    pub product_id: String,
    pub product_name: String,
    pub state: PickerState,
}

impl VariantPicker {
    pub fn new(product: &Product, cart: &Cart) -> Self {
        let state = if product.variants.is_empty() {
            PickerState::NoVariantsConfigured
        } else {
            PickerState::Options(
                product
                    .variants
                    .iter()
                    .map(|v| VariantOption {
                        variant: v.clone(),
                        selectable: v.is_available(),
                        in_cart: cart.quantity_of(&LineKey::variant(&product.id, &v.id)),
                    })
                    .collect(),
            )
        };

        VariantPicker {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            state,
        }
    }

    pub fn state(&self) -> &PickerState {
        &self.state
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, PickerState::NoVariantsConfigured)
    }

    pub fn options(&self) -> &[VariantOption] {
        match &self.state {
            PickerState::Options(options) => options,
            PickerState::NoVariantsConfigured => &[],
        }
    }
}
