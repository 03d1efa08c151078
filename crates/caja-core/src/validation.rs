//! # Validation Module
//!
//! Checks applied to catalog data when the register loads it, and to
//! cashier search input.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog file (JSON)                                                    │
//! │       │  serde: shape and types                                         │
//! │       ▼                                                                 │
//! │  validate_catalog()  ← THIS MODULE                                      │
//! │       │  ids present, no duplicate ids, variant stock ≥ 0               │
//! │       ▼                                                                 │
//! │  SalesEngine::set_products()                                            │
//! │                                                                         │
//! │  Duplicate barcodes are reported, not rejected: lookup is first-match. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::Product;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_QUERY_LEN: usize = 100;

fn require(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a product name.
///
/// ```rust
/// use caja_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Inca Kola 500ml").is_ok());
/// assert!(validate_product_name("  ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    require("name", name)?;
    if name.trim().chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// Validates a search query. Only the length is checked: whitespace is
/// part of the term. Empty is allowed and matches every product.
pub fn validate_search_query(query: &str) -> ValidationResult<&str> {
    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }
    Ok(query)
}

/// Validates a cart line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed `MAX_ITEM_QUANTITY` (999)
///
/// ```rust
/// use caja_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(999).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(1000).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Validates one product and its variants.
///
/// ## Rules
/// - id, name and category present
/// - variant ids present and unique within the product
/// - variant stock ≥ 0
///
/// Parent stock may be zero or negative (oversold); that only makes the
/// product unselectable.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    require("product id", &product.id)?;
    validate_product_name(&product.name)?;
    require("category", &product.category)?;

    let mut variant_ids = HashSet::new();
    for variant in &product.variants {
        require("variant id", &variant.id)?;
        if !variant_ids.insert(variant.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: format!("variant id on {}", product.id),
                value: variant.id.clone(),
            });
        }
        if variant.stock < 0 {
            return Err(ValidationError::Negative {
                field: format!("stock of variant {}/{}", product.id, variant.id),
            });
        }
    }

    Ok(())
}

/// Validates a whole catalog: every product, plus unique product ids.
pub fn validate_catalog(products: &[Product]) -> ValidationResult<()> {
    let mut ids = HashSet::new();
    for product in products {
        validate_product(product)?;
        if !ids.insert(product.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "product id".to_string(),
                value: product.id.clone(),
            });
        }
    }
    Ok(())
}

/// Barcodes (lowercased) shared by more than one product.
pub fn duplicate_barcodes(products: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for barcode in products.iter().filter_map(|p| p.barcode.as_deref()) {
        let barcode = barcode.to_lowercase();
        if !seen.insert(barcode.clone()) && !duplicates.contains(&barcode) {
            duplicates.push(barcode);
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::ProductVariant;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: "Polo".to_string(),
            category: "Ropa".to_string(),
            price: Money::from_cents(1000),
            stock: 0,
            barcode: None,
            has_variants: false,
            variants: Vec::new(),
        }
    }

    fn variant(id: &str, stock: i64) -> ProductVariant {
        ProductVariant {
            id: id.to_string(),
            name: "M".to_string(),
            price: Money::from_cents(1000),
            stock,
        }
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Polo").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  cola ").unwrap(), "  cola ");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_quantity_bounds() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(matches!(
            validate_quantity(MAX_ITEM_QUANTITY + 1),
            Err(ValidationError::OutOfRange { min: 1, max: 999, .. })
        ));
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(i64::MAX).is_err());
    }

    #[test]
    fn test_variant_rules() {
        let mut p = product("p1");
        p.has_variants = true;
        p.variants = vec![variant("v1", 0), variant("v2", 3)];
        assert!(validate_product(&p).is_ok());

        p.variants.push(variant("v1", 1));
        assert!(matches!(
            validate_product(&p),
            Err(ValidationError::Duplicate { .. })
        ));

        p.variants = vec![variant("v1", -1)];
        assert!(matches!(
            validate_product(&p),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_empty_variant_list_is_not_a_load_error() {
        // Surfaced at selection time as an explicit empty state instead.
        let mut p = product("p1");
        p.has_variants = true;
        assert!(validate_product(&p).is_ok());
    }

    #[test]
    fn test_validate_catalog_duplicate_ids() {
        let products = vec![product("p1"), product("p2"), product("p1")];
        assert!(matches!(
            validate_catalog(&products),
            Err(ValidationError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_duplicate_barcodes() {
        let mut a = product("p1");
        a.barcode = Some("ABC".into());
        let mut b = product("p2");
        b.barcode = Some("abc".into());
        let mut c = product("p3");
        c.barcode = Some("xyz".into());
        assert_eq!(duplicate_barcodes(&[a, b, c]), vec!["abc".to_string()]);
    }
}
