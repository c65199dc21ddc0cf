use dirs::home_dir;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable overriding the jpkg home directory.
pub const HOME_ENV: &str = "JPKG_HOME";

/// Returns the primary configuration directory, or None if the user's home cannot be resolved.
pub fn try_jpkg_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var(HOME_ENV) {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".jpkg"))
}

/// Returns the jpkg home directory (`~/.jpkg` unless `JPKG_HOME` is set).
///
/// # Errors
///
/// Returns [`ConfigError::NoHome`] if neither `JPKG_HOME` is set nor the
/// user's home directory can be resolved.
pub fn jpkg_home() -> Result<PathBuf, ConfigError> {
    try_jpkg_home().ok_or(ConfigError::NoHome)
}

/// Extract the filename from a URL.
pub fn filename_from_url(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.split('/').next_back().unwrap_or("")
}

/// Directory layout under a package base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    base: PathBuf,
}

impl Layout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Manifests of packages that can be installed: <base>/availablePackages
    pub fn available_dir(&self) -> PathBuf {
        self.base.join("availablePackages")
    }

    /// Manifests of installed packages: <base>/installedPackages
    pub fn installed_dir(&self) -> PathBuf {
        self.base.join("installedPackages")
    }

    /// Local source archives: <base>/sources
    pub fn sources_dir(&self) -> PathBuf {
        self.base.join("sources")
    }

    /// Local install scripts: <base>/installScripts
    pub fn scripts_dir(&self) -> PathBuf {
        self.base.join("installScripts")
    }

    /// Per-package unpack directories: <base>/build
    pub fn build_dir(&self) -> PathBuf {
        self.base.join("build")
    }

    /// Downloaded artifacts: <base>/cache
    pub fn cache_dir(&self) -> PathBuf {
        self.base.join("cache")
    }
}
