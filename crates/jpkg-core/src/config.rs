//! Optional `config.toml` under the jpkg home.
//!
//! ```toml
//! base_path = "/opt/jpkg"
//!
//! [install_env]
//! CC = "clang"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::paths::Layout;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Package base directory. Defaults to the home directory.
    pub base_path: Option<PathBuf>,
    /// Extra environment variables passed to install scripts.
    pub install_env: BTreeMap<String, String>,
}

impl Config {
    /// Load `<home>/config.toml`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file exists but can not be read or parsed.
    pub fn load(home: &Path) -> Result<Self, ConfigError> {
        let path = home.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Directory layout for this configuration rooted at `home`.
    ///
    /// A relative `base_path` is taken relative to `home`.
    pub fn layout(&self, home: &Path) -> Layout {
        match &self.base_path {
            Some(base) => Layout::new(home.join(base)),
            None => Layout::new(home),
        }
    }
}
