//! # Error Types
//!
//! Domain error types for caja-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  caja-core errors (this file)                                          │
//! │  ├── SalesError       - Refused engine operations                      │
//! │  └── ValidationError  - Bad catalog data / search input                │
//! │                                                                         │
//! │  caja-register errors (app)                                            │
//! │  ├── ApiError         - What the console/frontend sees                 │
//! │  └── AppError         - Startup failures (config, catalog file)        │
//! │                                                                         │
//! │  Flow: ValidationError → SalesError → ApiError → Notification          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every refused operation leaves the engine exactly as it was; none of
//! these are fatal to the session.

use thiserror::Error;

use crate::cart::LineKey;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification of a refused operation.
///
/// The notification collaborator keys its presentation off this, not off
/// individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Scan or lookup matched nothing.
    NotFound,
    /// Product or variant has no stock to sell.
    Unavailable,
    /// Catalog data contradicts itself (variants flagged but none listed).
    InvalidConfiguration,
    /// No active shift.
    GateClosed,
    /// Another step (variant choice, checkout) must resolve first.
    Busy,
    /// Input failed validation.
    Validation,
}

// =============================================================================
// Sales Error
// =============================================================================

/// Errors returned by the sales engine.
#[derive(Debug, Error)]
pub enum SalesError {
    /// A completed scan matched no product barcode.
    #[error("Product not found for barcode: {0}")]
    BarcodeNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Variant {variant_id} not found on product {product_id}")]
    VariantNotFound {
        product_id: String,
        variant_id: String,
    },

    #[error("Line not in cart: {0}")]
    LineNotFound(LineKey),

    /// Zero stock at selection time.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "Soda" (stock 0)
    ///      │
    ///      ▼
    /// resolve_selection → Rejected
    ///      │
    ///      ▼
    /// Unavailable { name: "Soda" }  →  cart unchanged
    /// ```
    #[error("{name} is out of stock")]
    Unavailable { name: String },

    /// Product is flagged as having variants but lists none.
    #[error("No variants configured for {name}")]
    NoVariantsConfigured { name: String },

    /// Sales action attempted with no active shift.
    #[error("No active shift: open the register to start selling")]
    GateClosed,

    #[error("A shift is already open: {0}")]
    ShiftAlreadyOpen(String),

    #[error("A variant choice is pending for {0}")]
    VariantChoicePending(String),

    #[error("No variant choice is pending")]
    NoVariantChoicePending,

    /// Cart is locked while the checkout collaborator works.
    #[error("Checkout in progress, cart is locked")]
    CheckoutInFlight,

    #[error("No checkout in progress")]
    NoCheckoutInFlight,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl SalesError {
    /// Maps the error onto the notification taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SalesError::BarcodeNotFound(_)
            | SalesError::ProductNotFound(_)
            | SalesError::VariantNotFound { .. }
            | SalesError::LineNotFound(_) => ErrorKind::NotFound,
            SalesError::Unavailable { .. } => ErrorKind::Unavailable,
            SalesError::NoVariantsConfigured { .. } => ErrorKind::InvalidConfiguration,
            SalesError::GateClosed | SalesError::ShiftAlreadyOpen(_) => ErrorKind::GateClosed,
            SalesError::VariantChoicePending(_)
            | SalesError::NoVariantChoicePending
            | SalesError::CheckoutInFlight
            | SalesError::NoCheckoutInFlight
            | SalesError::EmptyCart => ErrorKind::Busy,
            SalesError::Validation(_) => ErrorKind::Validation,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised when catalog data or cashier input doesn't meet requirements.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must not be negative")]
    Negative { field: String },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Duplicate value (product id, variant id within a product).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with SalesError.
pub type SalesResult<T> = Result<T, SalesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SalesError::Unavailable {
            name: "Soda".to_string(),
        };
        assert_eq!(err.to_string(), "Soda is out of stock");

        let err = SalesError::LineNotFound(LineKey::variant("p2", "v2"));
        assert_eq!(err.to_string(), "Line not in cart: p2/v2");
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            SalesError::BarcodeNotFound("111".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            SalesError::NoVariantsConfigured { name: "X".into() }.kind(),
            ErrorKind::InvalidConfiguration
        );
        assert_eq!(SalesError::GateClosed.kind(), ErrorKind::GateClosed);
        assert_eq!(SalesError::CheckoutInFlight.kind(), ErrorKind::Busy);
    }

    #[test]
    fn test_validation_converts_to_sales_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let err: SalesError = validation_err.into();
        assert!(matches!(err, SalesError::Validation(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
