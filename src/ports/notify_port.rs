//! Notification sink port.

use crate::domain::error::ScanError;

/// Accepts one opaque text block per call.
pub trait NotifyPort {
    fn send(&self, text: &str) -> Result<(), ScanError>;
}
