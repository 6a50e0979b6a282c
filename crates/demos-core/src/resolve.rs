//! Source merging and provenance.
//!
//! Resolution is a pure function of the file contents, an environment
//! snapshot, and the parsed command-line overrides. It performs no I/O
//! and never decrypts: an encrypted file credential is carried forward
//! as "present but deferred" for the gate to unlock on first access.
//!
//! Precedence is fixed: command line > environment > file.

use std::env;
use std::fmt;

use crate::crypto::EncryptedSecret;
use crate::settings::Field;
use crate::store::StoredConfig;

/// Snapshot of the three recognized environment variables, captured once
/// at process start. Empty values do not contribute.
#[derive(Debug, Clone, Default)]
pub struct EnvValues {
    pub private_key: Option<String>,
    pub rpc_url: Option<String>,
    pub referral_code: Option<String>,
}

impl EnvValues {
    /// Capture the current process environment. The CLI loads the local
    /// `.env` file into the environment before calling this.
    pub fn capture() -> Self {
        Self {
            private_key: env_value(Field::PrivateKey),
            rpc_url: env_value(Field::RpcUrl),
            referral_code: env_value(Field::ReferralCode),
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::PrivateKey => self.private_key.as_deref(),
            Field::RpcUrl => self.rpc_url.as_deref(),
            Field::ReferralCode => self.referral_code.as_deref(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Whether any of the three fields is supplied.
    pub fn contributes_any(&self) -> bool {
        Field::ALL.iter().any(|&field| self.get(field).is_some())
    }
}

fn env_value(field: Field) -> Option<String> {
    env::var(field.env_var())
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Parsed `--config key=value` overrides.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub private_key: Option<String>,
    pub rpc_url: Option<String>,
    pub referral_code: Option<String>,
}

impl Overrides {
    /// Parse raw `key=value` pairs. Keys match case-insensitively;
    /// `demos_rpc_url` is accepted as an alias for `demos_rpc`. Unknown
    /// or malformed pairs produce warnings, never failures. Repeated
    /// keys are last-write-wins.
    pub fn parse<S: AsRef<str>>(pairs: &[S]) -> (Self, Vec<String>) {
        let mut overrides = Overrides::default();
        let mut warnings = Vec::new();

        for pair in pairs {
            let pair = pair.as_ref();
            let Some((key, value)) = pair.split_once('=') else {
                warnings.push(format!(
                    "ignoring malformed --config value (expected key=value): {}",
                    pair
                ));
                continue;
            };

            match key.to_ascii_lowercase().as_str() {
                "private_key" => overrides.private_key = Some(value.to_string()),
                "demos_rpc" | "demos_rpc_url" => overrides.rpc_url = Some(value.to_string()),
                "referral_code" => overrides.referral_code = Some(value.to_string()),
                _ => warnings.push(format!("unknown config key: {}", key)),
            }
        }

        (overrides, warnings)
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::PrivateKey => self.private_key.as_deref(),
            Field::RpcUrl => self.rpc_url.as_deref(),
            Field::ReferralCode => self.referral_code.as_deref(),
        }
    }
}

/// The resolved credential, before any decryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Supplied in the clear by some source.
    Plain(String),
    /// Present in the file but encrypted; decryption is deferred to the
    /// secret access gate.
    Encrypted(EncryptedSecret),
    Unset,
}

/// The effective settings view for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub credential: Credential,
    pub rpc_url: Option<String>,
    pub referral_code: Option<String>,
}

/// Merge the three sources. Overlay order: file, then environment, then
/// command-line overrides; last write wins per field.
pub fn resolve(
    file: Option<&StoredConfig>,
    env: &EnvValues,
    overrides: &Overrides,
) -> ResolvedSettings {
    let mut credential = Credential::Unset;
    let mut rpc_url: Option<String> = None;
    let mut referral_code: Option<String> = None;

    if let Some(stored) = file {
        let plain = stored.plain_settings();
        if let Some(value) = plain.get(Field::PrivateKey) {
            credential = Credential::Plain(value.to_string());
        }
        rpc_url = plain.get(Field::RpcUrl).map(String::from);
        referral_code = plain.get(Field::ReferralCode).map(String::from);

        if let StoredConfig::Encrypted {
            credential: Some(secret),
            ..
        } = stored
        {
            credential = Credential::Encrypted(secret.clone());
        }
    }

    if let Some(value) = env.get(Field::PrivateKey) {
        credential = Credential::Plain(value.to_string());
    }
    if let Some(value) = env.get(Field::RpcUrl) {
        rpc_url = Some(value.to_string());
    }
    if let Some(value) = env.get(Field::ReferralCode) {
        referral_code = Some(value.to_string());
    }

    if let Some(value) = overrides.get(Field::PrivateKey) {
        credential = Credential::Plain(value.to_string());
    }
    if let Some(value) = overrides.get(Field::RpcUrl) {
        rpc_url = Some(value.to_string());
    }
    if let Some(value) = overrides.get(Field::ReferralCode) {
        referral_code = Some(value.to_string());
    }

    ResolvedSettings {
        credential,
        rpc_url,
        referral_code,
    }
}

/// Which source won a field under the precedence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    CommandLine,
    Environment,
    File,
    Unset,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Source::CommandLine => "command line",
            Source::Environment => "environment (.env)",
            Source::File => "config file",
            Source::Unset => "not set",
        };
        write!(f, "{}", label)
    }
}

/// Per-field winning sources, computed on demand for display.
#[derive(Debug, Clone)]
pub struct ProvenanceRecord {
    entries: Vec<(Field, Source)>,
}

impl ProvenanceRecord {
    pub fn source(&self, field: Field) -> Source {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, s)| *s)
            .unwrap_or(Source::Unset)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, Source)> + '_ {
        self.entries.iter().copied()
    }
}

/// Determine the winning source per field by re-checking each source
/// independently, highest precedence first. This is deliberately not the
/// inverse of the resolve fold: environment and file may coincidentally
/// agree on a value, and the report must still name the source that wins
/// by precedence.
pub fn provenance(
    file: Option<&StoredConfig>,
    env: &EnvValues,
    overrides: &Overrides,
) -> ProvenanceRecord {
    let entries = Field::ALL
        .iter()
        .map(|&field| {
            let source = if overrides.get(field).is_some() {
                Source::CommandLine
            } else if env.get(field).is_some() {
                Source::Environment
            } else if file.map(|f| f.contributes(field)).unwrap_or(false) {
                Source::File
            } else {
                Source::Unset
            };
            (field, source)
        })
        .collect();

    ProvenanceRecord { entries }
}
