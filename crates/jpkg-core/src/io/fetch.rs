//! Artifact fetching
//!
//! A package manifest only names its source archive and install script. A
//! [`Fetcher`] turns such a reference into a local file.

use std::path::{Component, Path, PathBuf};

use crate::error::FetchError;
use crate::io::download::HttpFetcher;
use crate::paths::Layout;

/// What a fetched artifact is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactRole {
    Source,
    InstallScript,
}

impl ArtifactRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Source => "Source file",
            Self::InstallScript => "Install script",
        }
    }
}

/// Resolves an artifact reference to a local path.
pub trait Fetcher {
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the artifact can not be made available.
    fn fetch(&self, role: ArtifactRole, reference: &str) -> Result<PathBuf, FetchError>;
}

impl<T: Fetcher + ?Sized> Fetcher for &T {
    fn fetch(&self, role: ArtifactRole, reference: &str) -> Result<PathBuf, FetchError> {
        (**self).fetch(role, reference)
    }
}

/// Finds artifacts in the local `sources/` and `installScripts/` directories.
#[derive(Debug, Clone)]
pub struct LocalFetcher {
    sources: PathBuf,
    scripts: PathBuf,
}

impl LocalFetcher {
    pub fn new(sources: impl Into<PathBuf>, scripts: impl Into<PathBuf>) -> Self {
        Self {
            sources: sources.into(),
            scripts: scripts.into(),
        }
    }

    pub fn from_layout(layout: &Layout) -> Self {
        Self::new(layout.sources_dir(), layout.scripts_dir())
    }

    fn dir(&self, role: ArtifactRole) -> &Path {
        match role {
            ArtifactRole::Source => &self.sources,
            ArtifactRole::InstallScript => &self.scripts,
        }
    }
}

impl Fetcher for LocalFetcher {
    fn fetch(&self, role: ArtifactRole, reference: &str) -> Result<PathBuf, FetchError> {
        // Must stay inside the role's directory
        if Path::new(reference)
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(FetchError::UnsafeReference {
                role: role.label(),
                reference: reference.to_string(),
            });
        }

        let path = self.dir(role).join(reference);
        if !path.is_file() {
            return Err(FetchError::Missing {
                role: role.label(),
                reference: reference.to_string(),
                path,
            });
        }
        tracing::debug!("{} '{}' at {}", role.label(), reference, path.display());
        Ok(path)
    }
}

/// Sends `http://` and `https://` references to an [`HttpFetcher`] and
/// everything else to a [`LocalFetcher`].
#[derive(Debug)]
pub struct DefaultFetcher {
    local: LocalFetcher,
    remote: HttpFetcher,
}

impl DefaultFetcher {
    pub fn new(local: LocalFetcher, remote: HttpFetcher) -> Self {
        Self { local, remote }
    }

    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client can not be built.
    pub fn from_layout(layout: &Layout) -> Result<Self, FetchError> {
        Ok(Self::new(
            LocalFetcher::from_layout(layout),
            HttpFetcher::new(layout.cache_dir())?,
        ))
    }
}

pub fn is_url(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

impl Fetcher for DefaultFetcher {
    fn fetch(&self, role: ArtifactRole, reference: &str) -> Result<PathBuf, FetchError> {
        if is_url(reference) {
            self.remote.fetch(role, reference)
        } else {
            self.local.fetch(role, reference)
        }
    }
}
