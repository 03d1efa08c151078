//! # Register Error Types
//!
//! Two error types live here:
//!
//! - [`ApiError`]: what a command hands back when it refuses or fails. The
//!   console prints it as a notice; it is serializable so another front end
//!   can switch on `code`.
//! - [`AppError`]: startup failures (config file, catalog file). These are
//!   fatal: the register does not start without a valid catalog.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  command ──► SessionState::with_engine_mut ──► SalesEngine              │
//! │                                                   │                     │
//! │                                        SalesError │ (typed, classified) │
//! │                                                   ▼                     │
//! │                       From<SalesError> for ApiError                     │
//! │                                                   │                     │
//! │                                                   ▼                     │
//! │             { "code": "SHIFT_CLOSED", "message": "No active shift..." } │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use caja_core::{ErrorKind, SalesError, ValidationError};
use serde::Serialize;
use thiserror::Error;

use crate::collab::checkout::CheckoutError;

/// API error returned from register commands.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found for barcode: 999"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown product, barcode, variant or cart line
    NotFound,

    /// Zero stock at selection time
    Unavailable,

    /// Catalog data the sales surface cannot act on
    Misconfigured,

    /// No active shift
    ShiftClosed,

    /// Another step (variant choice, checkout) must finish first
    Busy,

    /// Input validation failed
    ValidationError,

    /// The checkout collaborator did not record the sale
    CheckoutFailed,

    /// Unparseable console input
    BadRequest,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

/// Converts engine errors to API errors using the engine's own taxonomy.
impl From<SalesError> for ApiError {
    fn from(err: SalesError) -> Self {
        let code = match err.kind() {
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::Unavailable => ErrorCode::Unavailable,
            ErrorKind::InvalidConfiguration => ErrorCode::Misconfigured,
            ErrorKind::GateClosed => ErrorCode::ShiftClosed,
            ErrorKind::Busy => ErrorCode::Busy,
            ErrorKind::Validation => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        tracing::error!("Checkout failed: {}", err);
        ApiError::new(ErrorCode::CheckoutFailed, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Startup Errors
// =============================================================================

/// Errors that stop the register from starting.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read catalog file {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(#[from] ValidationError),

    #[error("Console I/O error: {0}")]
    Io(#[from] std::io::Error),
}
