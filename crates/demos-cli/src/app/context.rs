//! Per-invocation view of the three setting sources.

use std::path::Path;

use demos_core::resolve::{
    provenance, resolve, EnvValues, Overrides, ProvenanceRecord, ResolvedSettings,
};
use demos_core::{ConfigStore, StoredConfig};

use crate::cli::Cli;

/// The setting sources captured once at command start: the config file
/// (parsed), the process environment, and command-line overrides.
pub struct AppContext {
    store: ConfigStore,
    file: Option<StoredConfig>,
    env: EnvValues,
    overrides: Overrides,
}

impl AppContext {
    /// Capture all sources. An unreadable or corrupt config file never
    /// aborts the command: warn on stderr and resolve without it.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let store = ConfigStore::open_default()?;

        let (overrides, warnings) = Overrides::parse(&cli.overrides);
        for warning in warnings {
            eprintln!("Warning: {}", warning);
        }

        let file = match store.read_raw() {
            Ok(file) => file,
            Err(err) => {
                eprintln!("Warning: {}; continuing without it", err);
                None
            }
        };

        Ok(Self {
            store,
            file,
            env: EnvValues::capture(),
            overrides,
        })
    }

    pub fn resolved(&self) -> ResolvedSettings {
        resolve(self.file.as_ref(), &self.env, &self.overrides)
    }

    pub fn provenance(&self) -> ProvenanceRecord {
        provenance(self.file.as_ref(), &self.env, &self.overrides)
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn file(&self) -> Option<&StoredConfig> {
        self.file.as_ref()
    }

    pub fn env(&self) -> &EnvValues {
        &self.env
    }

    /// The env file consulted by migrations: `.env` in the current
    /// directory, no ancestor search.
    pub fn env_file(&self) -> &'static Path {
        Path::new(".env")
    }
}
