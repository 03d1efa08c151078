//! # Catalog Commands
//!
//! Product grid and category bar.

use caja_core::catalog::{categories, stock_level, StockLevel};
use caja_core::validation::validate_search_query;
use caja_core::{CategoryFilter, Money, Product};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::SessionState;

/// One tile in the product grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTile {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: Money,
    pub stock: StockLevel,
    pub has_variants: bool,
    /// Units of this product already in the cart, across variants.
    pub in_cart: i64,
}

impl ProductTile {
    fn new(product: &Product, in_cart: i64) -> Self {
        ProductTile {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            stock: stock_level(product),
            has_variants: product.has_variants,
            in_cart,
        }
    }
}

/// Lists products matching the search box and category bar.
///
/// ## Arguments
/// * `query` - Case-insensitive substring of the product name or barcode,
///   whitespace included
/// * `category` - `None` for all categories
///
/// ## Errors
/// `SHIFT_CLOSED` while no shift is open.
pub fn list_products(
    session: &SessionState,
    query: &str,
    category: Option<&str>,
) -> Result<Vec<ProductTile>, ApiError> {
    let query = validate_search_query(query)?;
    let filter = category.map(CategoryFilter::named).unwrap_or_default();
    debug!(query = %query, ?filter, "list_products command");

    session.with_engine(|engine| -> Result<_, ApiError> {
        engine.gate().admit()?;
        Ok(engine
            .visible_products(query, &filter)
            .map(|p| ProductTile::new(p, engine.quantity_in_cart(&p.id)))
            .collect())
    })
}

/// Distinct categories in catalog order.
pub fn list_categories(session: &SessionState) -> Result<Vec<String>, ApiError> {
    session.with_engine(|engine| -> Result<_, ApiError> {
        engine.gate().admit()?;
        Ok(categories(engine.products())
            .into_iter()
            .map(str::to_string)
            .collect())
    })
}
