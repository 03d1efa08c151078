//! # Domain Types
//!
//! Closed record types for everything the sales engine reads or produces.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │ ProductVariant  │   │     Shift       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, name       │──►│  id (per parent)│   │  id             │       │
//! │  │  category       │   │  name           │   │  status         │       │
//! │  │  price, stock   │   │  price, stock   │   │  opened_at      │       │
//! │  │  barcode?       │   └─────────────────┘   └─────────────────┘       │
//! │  │  has_variants   │                                                    │
//! │  └─────────────────┘   ┌─────────────────┐   ┌─────────────────┐       │
//! │                        │   Transaction   │   │    Discount     │       │
//! │                        │  (read-only)    │   │  Amount | Pct   │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products and variants are owned by the catalog collaborator. The engine
//! only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product shown on the sales screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,

    /// Display name shown to the cashier; also a search field.
    pub name: String,

    pub category: String,

    /// Base price. Variants carry their own price.
    pub price: Money,

    /// Stock on hand. Ignored for availability when `has_variants` is set.
    pub stock: i64,

    /// Barcode (EAN-13, UPC-A, internal codes). Matched case-insensitively.
    #[serde(default)]
    pub barcode: Option<String>,

    /// Selling this product requires choosing a variant first.
    #[serde(default)]
    pub has_variants: bool,

    /// Ordered as configured; the picker lists them in this order.
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Looks up one of this product's variants by id.
    pub fn variant(&self, variant_id: &str) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }
}

// =============================================================================
// Product Variant
// =============================================================================

/// A sellable sub-configuration of a product (size, color, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Unique within the parent product only.
    pub id: String,
    pub name: String,
    pub price: Money,
    /// A variant at 0 is listed but disabled, never hidden.
    pub stock: i64,
}

impl ProductVariant {
    #[inline]
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Discount
// =============================================================================

/// A discount attached to one cart line.
///
/// The engine stores and applies it; bounds and authorization are decided
/// by the checkout collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Discount {
    /// Fixed amount off the line total.
    Amount { amount: Money },
    /// Percentage off the line total, in basis points (1000 = 10%).
    Percentage { bps: u32 },
}

impl Discount {
    /// The amount taken off a line whose gross total is `gross`.
    pub fn amount_off(&self, gross: Money) -> Money {
        match self {
            Discount::Amount { amount } => *amount,
            Discount::Percentage { bps } => gross.percentage_of(*bps),
        }
    }
}

// =============================================================================
// Shift
// =============================================================================

/// Lifecycle status of a cash shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    #[default]
    Open,
    Closed,
}

/// A bounded cashier session during which sales are permitted.
///
/// Created and closed by the cash-control collaborator; the engine only
/// reacts to its presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    pub status: ShiftStatus,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
    /// Cash placed in the drawer when the shift was opened.
    #[serde(default)]
    pub opening_float: Money,
}

impl Shift {
    /// Short label shown in the "register open" badge: the last four
    /// characters of the id.
    pub fn label(&self) -> &str {
        let start = self
            .id
            .char_indices()
            .rev()
            .nth(3)
            .map(|(i, _)| i)
            .unwrap_or(0);
        &self.id[start..]
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == ShiftStatus::Open
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A completed sale as recorded by the checkout collaborator.
///
/// Read-only to the engine; only used to aggregate shift sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub shift_id: String,
    pub total: Money,
    pub item_count: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Category Filter
// =============================================================================

/// Category selection on the sales screen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum CategoryFilter {
    /// The "all categories" sentinel.
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn named(category: impl Into<String>) -> Self {
        CategoryFilter::Named(category.into())
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => name == category,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
