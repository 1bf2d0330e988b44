//! Configuration loading and management
//!
//! Handles parsing of `taskflow.toml` from the data directory. Every field
//! has a default, so a missing file behaves like an empty one.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::repository::{Backend, LocalRepository, RemoteRepository};

/// File name looked up inside the data directory.
pub const CONFIG_FILE: &str = "taskflow.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub local: LocalConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Which task store to use
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Remote,
}

/// Local JSON store
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalConfig {
    /// Store file; relative paths resolve against the data directory.
    /// Defaults to `tasks.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Hosted record store
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub public_key: Option<String>,

    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_table() -> String {
    "task2".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            project_id: None,
            public_key: None,
            table: default_table(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Dashboard behaviour
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardConfig {
    /// Fail instead of ignoring a collection that disagrees with the store.
    #[serde(default)]
    pub strict: bool,
}

impl Config {
    /// Parse configuration from a file.
    ///
    /// Not validated: callers apply command-line overrides first and then
    /// call [`Config::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Parse configuration from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Path of the local store file.
    pub fn local_path(&self, data_dir: &Path) -> PathBuf {
        match &self.local.path {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => data_dir.join(p),
            None => data_dir.join("tasks.json"),
        }
    }

    /// Build the configured repository.
    pub fn backend(&self, data_dir: &Path, today: NaiveDate) -> Result<Backend> {
        self.validate()?;
        Ok(match self.backend.kind {
            BackendKind::Local => Backend::Local(LocalRepository::new(self.local_path(data_dir), today)),
            BackendKind::Remote => Backend::Remote(RemoteRepository::new(&self.remote)),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend.kind == BackendKind::Remote {
            self.remote.validate()?;
        }
        Ok(())
    }
}

impl RemoteConfig {
    fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(Error::InvalidConfig(
                "remote.base_url is required for the remote backend".to_string(),
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!(
                "remote.base_url must be an http(s) URL, got '{url}'"
            )));
        }
        if self.table.trim().is_empty() {
            return Err(Error::InvalidConfig("remote.table cannot be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "remote.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
