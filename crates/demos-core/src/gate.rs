//! Mediated access to the resolved credential.
//!
//! The gate is the only component that ever decrypts the credential. It
//! owns the session password: entered once on first access, held in a
//! zeroizing buffer for the remainder of the process, never persisted.
//!
//! Prompting is an injected capability so tests can stub it without a
//! terminal. A wrong password surfaces [`CoreError::Decryption`] without
//! automatic retry; the command exits with failure rather than looping.

use zeroize::Zeroizing;

use crate::crypto;
use crate::error::{CoreError, Result};
use crate::resolve::{Credential, ResolvedSettings};

/// Fallback endpoint when no source supplies one.
pub const DEFAULT_RPC_URL: &str = "https://node2.demos.sh";

/// Blocking password entry, implemented by the CLI over the controlling
/// terminal and by tests as an in-memory stub.
pub trait PasswordProvider {
    /// Password to unlock an existing encrypted credential.
    fn unlock_password(&mut self) -> Result<String>;

    /// New password for encrypting a credential (confirmed entry).
    fn new_password(&mut self) -> Result<String>;
}

/// Gate over the credential field of one resolved settings view.
pub struct SecretGate<P> {
    credential: Credential,
    rpc_url: Option<String>,
    session_password: Option<Zeroizing<String>>,
    provider: P,
}

impl<P: PasswordProvider> SecretGate<P> {
    pub fn new(resolved: &ResolvedSettings, provider: P) -> Self {
        Self {
            credential: resolved.credential.clone(),
            rpc_url: resolved.rpc_url.clone(),
            session_password: None,
            provider,
        }
    }

    /// The credential in the clear.
    ///
    /// Plaintext sources return immediately. An encrypted file entry
    /// prompts for the password on first call, caches it for the process
    /// lifetime, and decrypts. Fails with `MissingCredential` when unset
    /// across all sources.
    pub fn credential(&mut self) -> Result<String> {
        match &self.credential {
            Credential::Plain(value) => Ok(value.clone()),
            Credential::Unset => Err(CoreError::MissingCredential(
                missing_credential_message().to_string(),
            )),
            Credential::Encrypted(secret) => {
                let password = match self.session_password.take() {
                    Some(cached) => cached,
                    None => Zeroizing::new(self.provider.unlock_password()?),
                };
                let result = crypto::decrypt(secret, &password);
                self.session_password = Some(password);
                result
            }
        }
    }

    /// Whether reading the credential will need a password.
    pub fn requires_password(&self) -> bool {
        self.session_password.is_none() && matches!(self.credential, Credential::Encrypted(_))
    }

    /// The RPC endpoint, with a hard-coded fallback. Never fails.
    pub fn rpc_url(&self) -> &str {
        self.rpc_url.as_deref().unwrap_or(DEFAULT_RPC_URL)
    }
}

/// Guidance listing the three ways a credential can be supplied.
pub fn missing_credential_message() -> &'static str {
    "No credential configured.\n\n\
     Provide one with any of:\n  \
     1. Config file:   demostools config init, then edit PRIVATE_KEY\n  \
     2. Environment:   set PRIVATE_KEY in .env or the environment\n  \
     3. Command line:  --config private_key=\"your mnemonic\""
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{resolve, EnvValues, Overrides};
    use crate::settings::Settings;
    use crate::store::StoredConfig;

    /// Scripted provider that records how often it was asked.
    pub struct StubPasswords {
        password: String,
        pub prompts: usize,
    }

    impl StubPasswords {
        pub fn new(password: &str) -> Self {
            Self {
                password: password.to_string(),
                prompts: 0,
            }
        }
    }

    impl PasswordProvider for StubPasswords {
        fn unlock_password(&mut self) -> Result<String> {
            self.prompts += 1;
            Ok(self.password.clone())
        }

        fn new_password(&mut self) -> Result<String> {
            self.prompts += 1;
            Ok(self.password.clone())
        }
    }

    fn encrypted_file(plaintext: &str, password: &str) -> StoredConfig {
        StoredConfig::Encrypted {
            rpc_url: None,
            referral_code: None,
            credential: Some(crypto::encrypt(plaintext, password)),
        }
    }

    #[test]
    fn test_plain_source_never_prompts() {
        let env = EnvValues {
            private_key: Some("abc".to_string()),
            ..Default::default()
        };
        let resolved = resolve(None, &env, &Overrides::default());
        let mut gate = SecretGate::new(&resolved, StubPasswords::new("unused"));

        assert!(!gate.requires_password());
        assert_eq!(gate.credential().unwrap(), "abc");
        assert_eq!(gate.provider.prompts, 0);
    }

    #[test]
    fn test_encrypted_source_prompts_once() {
        let file = encrypted_file("the mnemonic", "hunter2-hunter2");
        let resolved = resolve(Some(&file), &EnvValues::default(), &Overrides::default());
        let mut gate = SecretGate::new(&resolved, StubPasswords::new("hunter2-hunter2"));

        assert!(gate.requires_password());
        assert_eq!(gate.credential().unwrap(), "the mnemonic");
        assert_eq!(gate.credential().unwrap(), "the mnemonic");
        // Password cached after the first access.
        assert_eq!(gate.provider.prompts, 1);
        assert!(!gate.requires_password());
    }

    #[test]
    fn test_wrong_password_is_decryption_error() {
        let file = encrypted_file("the mnemonic", "hunter2-hunter2");
        let resolved = resolve(Some(&file), &EnvValues::default(), &Overrides::default());
        let mut gate = SecretGate::new(&resolved, StubPasswords::new("wrong-password"));

        assert!(matches!(gate.credential(), Err(CoreError::Decryption)));
        // No automatic retry.
        assert_eq!(gate.provider.prompts, 1);
    }

    #[test]
    fn test_missing_credential_message_lists_setup_paths() {
        let resolved = resolve(None, &EnvValues::default(), &Overrides::default());
        let mut gate = SecretGate::new(&resolved, StubPasswords::new("unused"));

        let err = gate.credential().unwrap_err();
        assert!(matches!(err, CoreError::MissingCredential(_)));
        let message = err.to_string();
        assert!(message.contains("Config file"));
        assert!(message.contains("Environment"));
        assert!(message.contains("Command line"));
    }

    #[test]
    fn test_endpoint_fallback() {
        let resolved = resolve(None, &EnvValues::default(), &Overrides::default());
        let gate = SecretGate::new(&resolved, StubPasswords::new("unused"));
        assert_eq!(gate.rpc_url(), DEFAULT_RPC_URL);

        let file = StoredConfig::Plain(Settings {
            private_key: None,
            rpc_url: Some("https://custom".to_string()),
            referral_code: None,
        });
        let resolved = resolve(Some(&file), &EnvValues::default(), &Overrides::default());
        let gate = SecretGate::new(&resolved, StubPasswords::new("unused"));
        assert_eq!(gate.rpc_url(), "https://custom");
    }
}
