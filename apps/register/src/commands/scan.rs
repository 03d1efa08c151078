//! # Scan Commands
//!
//! Barcode scanner input. A hardware scanner types the code and presses
//! Enter; `scan_key` takes it one key at a time, `scan_barcode` takes a
//! whole burst.

use caja_core::{Key, ScanOutcome};
use serde::Serialize;
use tracing::debug;

use crate::commands::cart::SelectResponse;
use crate::error::ApiError;
use crate::state::SessionState;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanResponse {
    /// Key buffered; `buffer` is what the scan field shows.
    Pending { buffer: String },
    /// Enter on an empty field.
    Empty,
    Resolved { selection: SelectResponse },
}

pub fn scan_key(session: &SessionState, key: Key) -> Result<ScanResponse, ApiError> {
    session.with_engine_mut(|engine| {
        let response = match engine.on_key(key)? {
            ScanOutcome::Pending => ScanResponse::Pending {
                buffer: engine.scan_buffer().to_string(),
            },
            ScanOutcome::Empty => ScanResponse::Empty,
            ScanOutcome::Selected(outcome) => ScanResponse::Resolved {
                selection: SelectResponse::from_outcome(outcome, engine),
            },
        };
        Ok(response)
    })
}

/// Feeds `code` followed by Enter.
///
/// An unknown barcode is refused with `NOT_FOUND` ("product not found"
/// notice); the scan field is cleared either way.
pub fn scan_barcode(session: &SessionState, code: &str) -> Result<ScanResponse, ApiError> {
    debug!(code = %code, "scan_barcode command");
    for c in code.chars() {
        scan_key(session, Key::Char(c))?;
    }
    scan_key(session, Key::Enter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::catalog::demo_catalog;
    use crate::error::ErrorCode;
    use caja_core::{LineKey, Money, Shift, ShiftStatus};
    use chrono::Utc;

    fn session() -> SessionState {
        let shift = Shift {
            id: "shift-0001".to_string(),
            status: ShiftStatus::Open,
            opened_at: Utc::now(),
            closed_at: None,
            opening_float: Money::zero(),
        };
        SessionState::new(demo_catalog(), Some(shift))
    }

    #[test]
    fn test_scan_adds_product() {
        let session = session();
        let response = scan_barcode(&session, "7750182000123").unwrap();
        let ScanResponse::Resolved {
            selection: SelectResponse::Added { line, cart },
        } = response
        else {
            panic!("expected Added, got {:?}", response);
        };
        assert_eq!(line, LineKey::product("p1"));
        assert_eq!(cart.items[0].quantity, 1);
    }

    #[test]
    fn test_scan_is_case_insensitive_and_opens_picker() {
        let session = session();
        let response = scan_barcode(&session, "polo-001").unwrap();
        assert!(matches!(
            response,
            ScanResponse::Resolved {
                selection: SelectResponse::ChooseVariant { .. }
            }
        ));

        // Further scans wait for the variant choice
        let err = scan_barcode(&session, "7750182000123").unwrap_err();
        assert_eq!(err.code, ErrorCode::Busy);
    }

    #[test]
    fn test_unknown_barcode_clears_field() {
        let session = session();
        let err = scan_barcode(&session, "0000").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(session.with_engine(|e| e.scan_buffer().to_string()), "");
    }

    #[test]
    fn test_key_by_key() {
        let session = session();
        assert_eq!(
            scan_key(&session, Key::Char('7')).unwrap(),
            ScanResponse::Pending { buffer: "7".into() }
        );
        scan_key(&session, Key::Backspace).unwrap();
        assert_eq!(scan_key(&session, Key::Enter).unwrap(), ScanResponse::Empty);
    }
}
