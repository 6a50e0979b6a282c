//! Password prompting over the controlling terminal.

use dialoguer::Password;

use demos_core::{CoreError, PasswordProvider, Result};

/// Terminal-backed [`PasswordProvider`]. The `DEMOS_PASSWORD` environment
/// variable bypasses prompting for scripts and tests.
pub struct DialoguerPasswords;

impl PasswordProvider for DialoguerPasswords {
    fn unlock_password(&mut self) -> Result<String> {
        if let Some(value) = env_password() {
            return Ok(value);
        }
        Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| CoreError::InvalidInput(format!("failed to read password: {}", e)))
    }

    fn new_password(&mut self) -> Result<String> {
        if let Some(value) = env_password() {
            return Ok(value);
        }
        Password::new()
            .with_prompt("Enter new password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(|e| CoreError::InvalidInput(format!("failed to read password: {}", e)))
    }
}

fn env_password() -> Option<String> {
    std::env::var("DEMOS_PASSWORD")
        .ok()
        .filter(|v| !v.trim().is_empty())
}
