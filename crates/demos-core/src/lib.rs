//! # Demos Core
//!
//! Core library for demostools - the layered secret configuration store
//! behind the Demos command-line toolkit.
//!
//! This crate resolves runtime settings (credential, RPC endpoint, referral
//! code) from three ordered sources and protects the credential at rest with
//! password-derived encryption. It contains no terminal or network code:
//! prompting is an injected [`gate::PasswordProvider`] capability and all
//! failures are typed; the CLI layer decides process exit.
//!
//! ## Architecture
//!
//! - **crypto**: password-based encryption of a single secret string
//! - **store**: the on-disk config file (plaintext or encrypted shape)
//! - **resolve**: merges file, environment, and command-line overrides,
//!   with per-field provenance
//! - **gate**: mediated access to the credential, lazy decryption
//! - **migrate**: one-shot transitions between storage representations

pub mod crypto;
pub mod error;
pub mod fs;
pub mod gate;
pub mod migrate;
pub mod resolve;
pub mod settings;
pub mod store;

pub use error::{CoreError, Result};
pub use gate::{PasswordProvider, SecretGate, DEFAULT_RPC_URL};
pub use settings::{Field, Settings};
pub use store::{ConfigStore, StoredConfig};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
