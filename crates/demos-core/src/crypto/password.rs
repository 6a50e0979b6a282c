//! Encryption password validation.
//!
//! Enforced when new encrypted material is created, never when unlocking
//! an existing file (an old password must always be able to open it).

use crate::error::{CoreError, Result};

/// Minimum password length in characters.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate a new encryption password.
///
/// Requires a non-empty, non-whitespace password of at least 8 characters.
pub fn validate_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(CoreError::InvalidInput(
            "password cannot be empty".to_string(),
        ));
    }

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::InvalidInput(format!(
            "password must be at least {} characters (got {})",
            MIN_PASSWORD_LENGTH,
            password.len()
        )));
    }

    Ok(())
}
