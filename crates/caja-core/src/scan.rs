//! # Scan Dispatcher Buffer
//!
//! Hardware barcode scanners behave like a keyboard: a burst of characters
//! followed by Enter. `ScanBuffer` accumulates the burst and yields one
//! completed code per terminator.
//!
//! ```text
//!  '7' '7' '5' '0' '0' '0' '1' ⏎
//!   │   │   │   │   │   │   │  │
//!   ▼   ▼   ▼   ▼   ▼   ▼   ▼  ▼
//!  Pending ............... Completed("7750001")  → buffer reset to ""
//! ```
//!
//! Resolving the code against the catalog happens in the engine.

use serde::{Deserialize, Serialize};

/// A key delivered by the scanner (or the cashier typing into the field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Backspace,
    /// Carriage return / Enter: terminates a scan.
    Enter,
}

/// Result of feeding one key into the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Still accumulating.
    Pending,
    /// Terminator on a blank buffer; nothing to look up.
    Empty,
    /// Terminator with a trimmed, non-empty code.
    Completed(String),
}

#[derive(Debug, Clone, Default)]
pub struct ScanBuffer {
    buffer: String,
}

impl ScanBuffer {
    pub fn new() -> Self {
        ScanBuffer::default()
    }

    /// Feeds one key. Enter always leaves the buffer empty.
    pub fn on_key(&mut self, key: Key) -> ScanEvent {
        match key {
            Key::Char(c) => {
                self.buffer.push(c);
                ScanEvent::Pending
            }
            Key::Backspace => {
                self.buffer.pop();
                ScanEvent::Pending
            }
            Key::Enter => {
                let code = std::mem::take(&mut self.buffer);
                let code = code.trim();
                if code.is_empty() {
                    ScanEvent::Empty
                } else {
                    ScanEvent::Completed(code.to_string())
                }
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}
