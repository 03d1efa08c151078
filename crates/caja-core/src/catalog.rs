//! # Catalog Index
//!
//! Read-only queries over the product list supplied by the catalog
//! collaborator: search/category filtering, barcode lookup, stock badges.
//!
//! ## Search Matching
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cashier types: "cola"          Category: Bebidas                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  name contains "cola"  OR  barcode contains "cola"   (case-insensitive) │
//! │       AND                                                               │
//! │  category == "Bebidas"  OR  filter == All                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Results in catalog order (stable filter, never re-sorted)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{CategoryFilter, Product};
use crate::LOW_STOCK_THRESHOLD;

/// Products matching `search_term` and `category`, in input order.
///
/// The returned iterator is lazy and `Clone`, so callers can walk it more
/// than once (count first, then render) without re-filtering by hand.
pub fn filter<'a>(
    products: &'a [Product],
    search_term: &str,
    category: &'a CategoryFilter,
) -> impl Iterator<Item = &'a Product> + Clone + 'a {
    let needle = search_term.to_lowercase();
    products.iter().filter(move |p| {
        let matches_search = p.name.to_lowercase().contains(&needle)
            || p
                .barcode
                .as_deref()
                .is_some_and(|b| b.to_lowercase().contains(&needle));
        matches_search && category.matches(&p.category)
    })
}

/// Exact, case-insensitive barcode match. First match wins when the
/// catalog carries duplicates.
pub fn find_by_barcode<'a>(products: &'a [Product], code: &str) -> Option<&'a Product> {
    let code = code.to_lowercase();
    products.iter().find(|p| {
        p.barcode
            .as_deref()
            .is_some_and(|b| b.to_lowercase() == code)
    })
}

pub fn find_by_id<'a>(products: &'a [Product], id: &str) -> Option<&'a Product> {
    products.iter().find(|p| p.id == id)
}

/// Distinct categories in first-seen order, for the category bar.
pub fn categories(products: &[Product]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for product in products {
        if !seen.contains(&product.category.as_str()) {
            seen.push(&product.category);
        }
    }
    seen
}

// =============================================================================
// Stock Level
// =============================================================================

/// Stock badge for a product tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "level", content = "units", rename_all = "snake_case")]
pub enum StockLevel {
    /// Variant-less product with nothing left. Tile is disabled.
    OutOfStock,
    /// At or below [`LOW_STOCK_THRESHOLD`].
    Low(i64),
    InStock(i64),
    /// Availability is decided per variant in the picker.
    Variants,
}

pub fn stock_level(product: &Product) -> StockLevel {
    if product.has_variants {
        return StockLevel::Variants;
    }
    match product.stock {
        s if s <= 0 => StockLevel::OutOfStock,
        s if s <= LOW_STOCK_THRESHOLD => StockLevel::Low(s),
        s => StockLevel::InStock(s),
    }
}
