//! One-shot migrations between storage representations.
//!
//! Two independent transitions, both preconditioned and both safe to
//! re-run after a failure:
//!
//! - `.env` -> encrypted config file (the env file is deleted only after
//!   the write is confirmed)
//! - config file over `.env` (the env file is backed up, then removed
//!   from consideration; the config file itself is untouched)

use std::fs;
use std::path::{Path, PathBuf};

use crate::crypto::validate_password;
use crate::error::{CoreError, Result};
use crate::gate::{PasswordProvider, DEFAULT_RPC_URL};
use crate::resolve::EnvValues;
use crate::settings::{Field, Settings};
use crate::store::{ConfigStore, StoredConfig};

/// Move the environment-supplied settings into an encrypted config file
/// and delete the `.env` source.
///
/// Environment values win over existing file values; the endpoint falls
/// back to the default. The env file is only deleted after
/// `write_encrypted` succeeds, so a failed write leaves it untouched.
pub fn apply_env_to_encrypted(
    store: &ConfigStore,
    env_file: &Path,
    env: &EnvValues,
    current: Option<&StoredConfig>,
    provider: &mut dyn PasswordProvider,
) -> Result<()> {
    if !env_file.exists() {
        return Err(CoreError::Precondition(format!(
            "no {} file found in the current directory",
            env_file.display()
        )));
    }
    if !env.contributes_any() {
        return Err(CoreError::Precondition(format!(
            "{} supplies none of PRIVATE_KEY, DEMOS_RPC, or REFERRAL_CODE",
            env_file.display()
        )));
    }

    let current = current.map(StoredConfig::plain_settings).unwrap_or_default();
    let merged = Settings {
        private_key: pick(env.get(Field::PrivateKey), current.get(Field::PrivateKey)),
        rpc_url: pick(env.get(Field::RpcUrl), current.get(Field::RpcUrl))
            .or_else(|| Some(DEFAULT_RPC_URL.to_string())),
        referral_code: pick(env.get(Field::ReferralCode), current.get(Field::ReferralCode)),
    };

    let password = provider.new_password()?;
    validate_password(&password)?;

    store.write_encrypted(&merged, &password)?;

    fs::remove_file(env_file).map_err(|e| CoreError::io(env_file, e))
}

fn pick(env: Option<&str>, current: Option<&str>) -> Option<String> {
    env.or(current).map(String::from)
}

/// Remove `.env` from consideration so the config file takes precedence
/// on the next resolution. The env file is copied to a `.backup` sibling
/// before deletion; the config file contents are not touched.
///
/// Returns the backup path when an env file was present.
pub fn prefer_file_over_env(store: &ConfigStore, env_file: &Path) -> Result<Option<PathBuf>> {
    if !store.exists() {
        return Err(CoreError::Precondition(format!(
            "no config file found at {}; run `demostools config init` first",
            store.path().display()
        )));
    }

    if !env_file.exists() {
        return Ok(None);
    }

    let backup = backup_path(env_file);
    fs::copy(env_file, &backup).map_err(|e| CoreError::io(&backup, e))?;
    fs::remove_file(env_file).map_err(|e| CoreError::io(env_file, e))?;
    Ok(Some(backup))
}

fn backup_path(env_file: &Path) -> PathBuf {
    let mut name = env_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".backup");
    env_file.with_file_name(name)
}
