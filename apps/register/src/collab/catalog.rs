//! # Catalog Source
//!
//! Loads the product catalog the engine sells from.
//!
//! ## File Format
//! ```json
//! [
//!   {
//!     "id": "p1",
//!     "name": "Inca Kola 500ml",
//!     "category": "Bebidas",
//!     "price": 250,
//!     "stock": 24,
//!     "barcode": "7750182000123"
//!   },
//!   {
//!     "id": "p2",
//!     "name": "Polo Básico",
//!     "category": "Ropa",
//!     "price": 3500,
//!     "stock": 0,
//!     "hasVariants": true,
//!     "variants": [
//!       { "id": "v1", "name": "S", "price": 3500, "stock": 0 },
//!       { "id": "v2", "name": "M", "price": 3500, "stock": 4 }
//!     ]
//!   }
//! ]
//! ```
//! Prices are in minor units.

use std::path::Path;

use caja_core::validation::{duplicate_barcodes, validate_catalog};
use caja_core::{Money, Product, ProductVariant};
use tracing::{info, warn};

use crate::error::AppError;

/// Loads the catalog from `path`, or the demo catalog when `None`.
pub fn load_catalog(path: Option<&Path>) -> Result<Vec<Product>, AppError> {
    let Some(path) = path else {
        info!("No catalog file configured, using demo catalog");
        return Ok(demo_catalog());
    };

    let contents = std::fs::read_to_string(path).map_err(|source| AppError::CatalogRead {
        path: path.to_path_buf(),
        source,
    })?;
    let products = parse_catalog(&contents)?;
    info!(?path, count = products.len(), "Catalog loaded");
    Ok(products)
}

/// Parses and validates catalog JSON.
///
/// Duplicate barcodes are allowed (the first product wins at scan time) but
/// logged.
pub fn parse_catalog(json: &str) -> Result<Vec<Product>, AppError> {
    let products: Vec<Product> = serde_json::from_str(json)?;
    validate_catalog(&products)?;

    for barcode in duplicate_barcodes(&products) {
        warn!(barcode = %barcode, "Barcode shared by several products, first match wins");
    }

    Ok(products)
}

fn product(id: &str, name: &str, category: &str, cents: i64, stock: i64, barcode: &str) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        price: Money::from_cents(cents),
        stock,
        barcode: Some(barcode.to_string()),
        has_variants: false,
        variants: Vec::new(),
    }
}

fn variant(id: &str, name: &str, cents: i64, stock: i64) -> ProductVariant {
    ProductVariant {
        id: id.to_string(),
        name: name.to_string(),
        price: Money::from_cents(cents),
        stock,
    }
}

/// A small catalog covering every selection path: plain, low stock, sold
/// out, variants with a sold-out size, and variants not configured.
pub fn demo_catalog() -> Vec<Product> {
    vec![
        product("p1", "Inca Kola 500ml", "Bebidas", 250, 24, "7750182000123"),
        product("p2", "Agua San Luis 625ml", "Bebidas", 150, 3, "7751271000456"),
        product("p3", "Galletas Casino", "Snacks", 80, 0, "7750106000789"),
        product("p4", "Papas Lays Clásicas", "Snacks", 200, 12, "7750243000111"),
        Product {
            has_variants: true,
            stock: 0,
            variants: vec![
                variant("v1", "S", 3500, 0),
                variant("v2", "M", 3500, 4),
                variant("v3", "L", 3800, 2),
            ],
            ..product("p5", "Polo Básico", "Ropa", 3500, 0, "POLO-001")
        },
        Product {
            has_variants: true,
            stock: 6,
            ..product("p6", "Gorra Bordada", "Ropa", 2500, 6, "GORRA-001")
        },
    ]
}
