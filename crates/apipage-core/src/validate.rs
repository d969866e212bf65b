//! Input checks shared by command handlers.

use crate::error::StoreError;

/// Fails with `StoreError::Validation` when `value` is empty or whitespace.
///
/// # Errors
///
/// Returns `StoreError::Validation` naming `field`.
pub fn require(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}
