//! Application-level utilities for the Demostools CLI.
//!
//! This module provides:
//! - Loading the three setting sources for one invocation
//! - `.env` file loading into the process environment
//! - Password prompting over the controlling terminal

mod context;
mod env_file;
mod password;

// Re-export public API
pub use context::AppContext;
pub use env_file::load as load_env_file;
pub use password::DialoguerPasswords;
