//! End-to-end flow through the library: store, resolve, gate, migrate.

use std::fs;

use tempfile::tempdir;

use demos_core::gate::missing_credential_message;
use demos_core::migrate::{apply_env_to_encrypted, prefer_file_over_env};
use demos_core::resolve::{provenance, resolve, Credential, EnvValues, Overrides, Source};
use demos_core::{
    ConfigStore, CoreError, Field, PasswordProvider, Result, SecretGate, Settings,
    DEFAULT_RPC_URL,
};

struct ScriptedPasswords {
    password: String,
    prompts: usize,
}

impl ScriptedPasswords {
    fn new(password: &str) -> Self {
        Self {
            password: password.to_string(),
            prompts: 0,
        }
    }
}

impl PasswordProvider for ScriptedPasswords {
    fn unlock_password(&mut self) -> Result<String> {
        self.prompts += 1;
        Ok(self.password.clone())
    }

    fn new_password(&mut self) -> Result<String> {
        self.prompts += 1;
        Ok(self.password.clone())
    }
}

#[test]
fn test_env_only_resolution_never_prompts() {
    let env = EnvValues {
        private_key: Some("mnemonic words".to_string()),
        rpc_url: None,
        referral_code: None,
    };

    let resolved = resolve(None, &env, &Overrides::default());
    let mut gate = SecretGate::new(&resolved, ScriptedPasswords::new("unused"));

    assert!(!gate.requires_password());
    assert_eq!(gate.credential().unwrap(), "mnemonic words");
    assert_eq!(gate.rpc_url(), DEFAULT_RPC_URL);
}

#[test]
fn test_apply_env_then_resolve_prompts_once() {
    let dir = tempdir().unwrap();
    let store = ConfigStore::at(dir.path().join("config.json"));
    let env_file = dir.path().join(".env");
    fs::write(&env_file, "PRIVATE_KEY=mnemonic words\n").unwrap();

    let env = EnvValues {
        private_key: Some("mnemonic words".to_string()),
        rpc_url: None,
        referral_code: None,
    };
    let mut provider = ScriptedPasswords::new("hunter2-hunter2");
    apply_env_to_encrypted(&store, &env_file, &env, None, &mut provider).unwrap();
    assert_eq!(provider.prompts, 1);
    assert!(!env_file.exists());

    // The environment no longer supplies the credential; the encrypted
    // file does, so access goes through the gate with one prompt.
    let file = store.read_raw().unwrap();
    let resolved = resolve(file.as_ref(), &EnvValues::default(), &Overrides::default());
    assert!(matches!(resolved.credential, Credential::Encrypted(_)));

    let record = provenance(file.as_ref(), &EnvValues::default(), &Overrides::default());
    assert_eq!(record.source(Field::PrivateKey), Source::File);

    let mut gate = SecretGate::new(&resolved, ScriptedPasswords::new("hunter2-hunter2"));
    assert!(gate.requires_password());
    assert_eq!(gate.credential().unwrap(), "mnemonic words");
    assert_eq!(gate.credential().unwrap(), "mnemonic words");
}

#[test]
fn test_missing_credential_fails_with_guidance() {
    let resolved = resolve(None, &EnvValues::default(), &Overrides::default());
    let mut gate = SecretGate::new(&resolved, ScriptedPasswords::new("unused"));

    let err = gate.credential().unwrap_err();
    assert!(matches!(err, CoreError::MissingCredential(_)));
    assert_eq!(
        err.to_string(),
        missing_credential_message().to_string()
    );
}

#[test]
fn test_use_config_flow_shifts_precedence_to_file() {
    let dir = tempdir().unwrap();
    let store = ConfigStore::at(dir.path().join("config.json"));
    store
        .write_plain(&Settings {
            private_key: Some("from-file".to_string()),
            rpc_url: None,
            referral_code: None,
        })
        .unwrap();

    let env_file = dir.path().join(".env");
    fs::write(&env_file, "PRIVATE_KEY=from-env\n").unwrap();

    let backup = prefer_file_over_env(&store, &env_file).unwrap();
    assert_eq!(backup, Some(dir.path().join(".env.backup")));

    // With the env file retired, only the config file contributes.
    let file = store.read_raw().unwrap();
    let resolved = resolve(file.as_ref(), &EnvValues::default(), &Overrides::default());
    assert_eq!(resolved.credential, Credential::Plain("from-file".to_string()));
}

#[test]
fn test_migration_write_failure_preserves_env_file() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let store = ConfigStore::at(blocker.join("config.json"));

    let env_file = dir.path().join(".env");
    fs::write(&env_file, "PRIVATE_KEY=abc\n").unwrap();

    let env = EnvValues {
        private_key: Some("abc".to_string()),
        rpc_url: None,
        referral_code: None,
    };
    let mut provider = ScriptedPasswords::new("hunter2-hunter2");
    let err = apply_env_to_encrypted(&store, &env_file, &env, None, &mut provider).unwrap_err();

    assert!(matches!(err, CoreError::Io { .. }));
    assert!(env_file.exists());
}
