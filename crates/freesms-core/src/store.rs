use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::{
    providers::{Format, Toml},
    Figment,
};

use crate::credentials::Credentials;
use crate::settings::config_dir;

/// On-disk configuration of one module: a single TOML file named after
/// the module in the user configuration directory.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Open the store for a module, creating the config directory on
    /// first use.
    pub fn open(module: &str) -> Result<Self> {
        let path = config_dir()?.join(format!("{module}.conf"));
        Ok(Self { path })
    }

    /// Store backed by an explicit file, used by tests.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored credentials; a missing or unreadable file yields
    /// the empty defaults.
    pub fn load(&self) -> Credentials {
        let figment = Figment::new().merge(Toml::file(&self.path));

        match figment.extract() {
            Ok(credentials) => credentials,
            Err(_) => Credentials::default(),
        }
    }

    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(credentials).context("Failed to serialize module config")?;
        fs::write(&self.path, toml_string)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}
