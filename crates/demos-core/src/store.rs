//! The on-disk config store.
//!
//! One JSON file at `<config-dir>/demos/config.json`, in one of two
//! shapes selected by the `encrypted` boolean:
//!
//! ```json
//! { "PRIVATE_KEY": "...", "DEMOS_RPC": "...", "REFERRAL_CODE": "..." }
//! ```
//!
//! ```json
//! { "PRIVATE_KEY": { "ciphertext": "...", "salt": "...", "iv": "..." },
//!   "DEMOS_RPC": "...", "REFERRAL_CODE": "...", "encrypted": true }
//! ```
//!
//! Unknown additional fields are ignored, not rejected. Concurrent
//! invocations against the same file are last-writer-wins; there is no
//! file locking.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::{self, EncryptedSecret};
use crate::error::{CoreError, Result};
use crate::fs::write_atomic;
use crate::settings::{Field, Settings};

/// Parsed contents of the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredConfig {
    /// Fully plaintext settings.
    Plain(Settings),
    /// Endpoint and referral in plaintext (they are not secrets), the
    /// credential encrypted.
    Encrypted {
        rpc_url: Option<String>,
        referral_code: Option<String>,
        credential: Option<EncryptedSecret>,
    },
}

impl StoredConfig {
    /// Whether this file contributes a value for `field`.
    ///
    /// An encrypted credential counts as contributed even though it is
    /// not decrypted until accessed.
    pub fn contributes(&self, field: Field) -> bool {
        match self {
            StoredConfig::Plain(settings) => settings.get(field).is_some(),
            StoredConfig::Encrypted {
                rpc_url,
                referral_code,
                credential,
            } => match field {
                Field::PrivateKey => credential.is_some(),
                Field::RpcUrl => non_empty(rpc_url.as_deref()).is_some(),
                Field::ReferralCode => non_empty(referral_code.as_deref()).is_some(),
            },
        }
    }

    /// The plaintext-visible fields, for merging and display.
    pub fn plain_settings(&self) -> Settings {
        match self {
            StoredConfig::Plain(settings) => settings.clone(),
            StoredConfig::Encrypted {
                rpc_url,
                referral_code,
                ..
            } => Settings {
                private_key: None,
                rpc_url: rpc_url.clone(),
                referral_code: referral_code.clone(),
            },
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// On-disk JSON shape. The credential slot holds either a plain string
/// or an [`EncryptedSecret`] object.
#[derive(Serialize, Deserialize)]
struct RawConfigFile {
    #[serde(rename = "PRIVATE_KEY", default, skip_serializing_if = "Option::is_none")]
    private_key: Option<RawCredential>,

    #[serde(rename = "DEMOS_RPC", default, skip_serializing_if = "Option::is_none")]
    rpc_url: Option<String>,

    #[serde(rename = "REFERRAL_CODE", default, skip_serializing_if = "Option::is_none")]
    referral_code: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    encrypted: bool,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawCredential {
    Plain(String),
    Encrypted(EncryptedSecret),
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Durable representation of one [`StoredConfig`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// A store at an explicit path (tests, overrides).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store at the per-user default path.
    pub fn open_default() -> Result<Self> {
        Ok(Self {
            path: default_config_path()?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Parse the file. `Ok(None)` when absent; `ConfigCorrupt` when the
    /// contents are malformed (callers warn and continue without it).
    pub fn read_raw(&self) -> Result<Option<StoredConfig>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CoreError::io(&self.path, e)),
        };

        let raw: RawConfigFile =
            serde_json::from_str(&contents).map_err(|e| self.corrupt(e.to_string()))?;

        let stored = match (raw.encrypted, raw.private_key) {
            (true, Some(RawCredential::Encrypted(secret))) => StoredConfig::Encrypted {
                rpc_url: raw.rpc_url,
                referral_code: raw.referral_code,
                credential: Some(secret),
            },
            (true, None) => StoredConfig::Encrypted {
                rpc_url: raw.rpc_url,
                referral_code: raw.referral_code,
                credential: None,
            },
            (true, Some(RawCredential::Plain(_))) => {
                return Err(
                    self.corrupt("file is marked encrypted but the credential is a plain string")
                );
            }
            (false, Some(RawCredential::Encrypted(_))) => {
                return Err(self.corrupt(
                    "credential is an encrypted object but the file is not marked encrypted",
                ));
            }
            (false, credential) => StoredConfig::Plain(Settings {
                private_key: match credential {
                    Some(RawCredential::Plain(value)) => Some(value),
                    _ => None,
                },
                rpc_url: raw.rpc_url,
                referral_code: raw.referral_code,
            }),
        };

        Ok(Some(stored))
    }

    /// Serialize `settings` without the `encrypted` discriminator.
    pub fn write_plain(&self, settings: &Settings) -> Result<()> {
        let raw = RawConfigFile {
            private_key: settings.private_key.clone().map(RawCredential::Plain),
            rpc_url: settings.rpc_url.clone(),
            referral_code: settings.referral_code.clone(),
            encrypted: false,
        };
        self.write_raw(&raw)
    }

    /// Encrypt only the credential field and write the encrypted shape.
    /// An absent or empty credential is written as absent, not encrypted.
    pub fn write_encrypted(&self, settings: &Settings, password: &str) -> Result<()> {
        let credential = settings
            .get(Field::PrivateKey)
            .map(|value| crypto::encrypt(value, password));

        let raw = RawConfigFile {
            private_key: credential.map(RawCredential::Encrypted),
            rpc_url: settings.rpc_url.clone(),
            referral_code: settings.referral_code.clone(),
            encrypted: true,
        };
        self.write_raw(&raw)
    }

    fn write_raw(&self, raw: &RawConfigFile) -> Result<()> {
        let contents = serde_json::to_string_pretty(raw)
            .map_err(|e| CoreError::io(&self.path, io::Error::new(io::ErrorKind::InvalidData, e)))?;
        write_atomic(&self.path, &contents)
    }

    fn corrupt(&self, message: impl Into<String>) -> CoreError {
        CoreError::ConfigCorrupt {
            path: self.path.display().to_string(),
            message: message.into(),
        }
    }
}

/// Default config file path: `<XDG_CONFIG_HOME or ~/.config>/demos/config.json`.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

fn config_dir() -> Result<PathBuf> {
    if let Ok(value) = env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("demos"));
        }
    }
    let home = env::var("HOME").map_err(|_| {
        CoreError::InvalidInput("HOME is not set; cannot resolve the config path".to_string())
    })?;
    Ok(PathBuf::from(home).join(".config").join("demos"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &Path) -> ConfigStore {
        ConfigStore::at(dir.join("config.json"))
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = tempdir().unwrap();
        assert_eq!(store_in(dir.path()).read_raw().unwrap(), None);
    }

    #[test]
    fn test_plain_round_trip() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        let settings = Settings {
            private_key: Some("mnemonic words".to_string()),
            rpc_url: Some("https://node2.demos.sh".to_string()),
            referral_code: Some("REF123".to_string()),
        };

        store.write_plain(&settings).unwrap();
        let stored = store.read_raw().unwrap().unwrap();
        assert_eq!(stored, StoredConfig::Plain(settings));

        // Plain files carry no discriminator.
        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(!contents.contains("encrypted"));
    }

    #[test]
    fn test_encrypted_round_trip() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        let settings = Settings {
            private_key: Some("mnemonic words".to_string()),
            rpc_url: Some("https://node2.demos.sh".to_string()),
            referral_code: None,
        };

        store.write_encrypted(&settings, "hunter2-hunter2").unwrap();
        let stored = store.read_raw().unwrap().unwrap();
        match stored {
            StoredConfig::Encrypted {
                rpc_url,
                credential,
                ..
            } => {
                assert_eq!(rpc_url.as_deref(), Some("https://node2.demos.sh"));
                let secret = credential.expect("credential present");
                // The credential is not stored in the clear.
                let contents = fs::read_to_string(store.path()).unwrap();
                assert!(!contents.contains("mnemonic words"));
                assert_eq!(
                    crypto::decrypt(&secret, "hunter2-hunter2").unwrap(),
                    "mnemonic words"
                );
            }
            other => panic!("expected encrypted config, got {:?}", other),
        }
    }

    #[test]
    fn test_encrypted_without_credential() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        let settings = Settings {
            private_key: None,
            rpc_url: Some("https://x".to_string()),
            referral_code: None,
        };

        store.write_encrypted(&settings, "hunter2-hunter2").unwrap();
        let stored = store.read_raw().unwrap().unwrap();
        assert!(matches!(
            stored,
            StoredConfig::Encrypted {
                credential: None,
                ..
            }
        ));
        assert!(!stored.contributes(Field::PrivateKey));
    }

    #[test]
    fn test_malformed_json_is_corrupt() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(store.path(), "{ not json").unwrap();

        let err = store.read_raw().unwrap_err();
        assert!(matches!(err, CoreError::ConfigCorrupt { .. }));
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn test_inconsistent_discriminator_is_corrupt() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(
            store.path(),
            r#"{ "PRIVATE_KEY": "plain", "encrypted": true }"#,
        )
        .unwrap();
        assert!(matches!(
            store.read_raw(),
            Err(CoreError::ConfigCorrupt { .. })
        ));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(
            store.path(),
            r#"{ "DEMOS_RPC": "https://x", "FUTURE_FIELD": 42 }"#,
        )
        .unwrap();

        let stored = store.read_raw().unwrap().unwrap();
        assert_eq!(
            stored.plain_settings().get(Field::RpcUrl),
            Some("https://x")
        );
    }

    #[test]
    fn test_explicit_false_discriminator_is_plain() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(
            store.path(),
            r#"{ "PRIVATE_KEY": "abc", "encrypted": false }"#,
        )
        .unwrap();

        let stored = store.read_raw().unwrap().unwrap();
        assert!(matches!(stored, StoredConfig::Plain(_)));
        assert!(stored.contributes(Field::PrivateKey));
    }
}
