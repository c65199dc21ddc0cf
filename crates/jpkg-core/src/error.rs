//! Domain-specific errors for planning and executing installs

use std::path::PathBuf;

use jpkg_schema::{ManifestError, PackageName, Version};
use thiserror::Error;

/// Errors raised while loading a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog directory {} does not exist", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Failed to scan catalog directory {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Errors raised while resolving dependencies or building a plan.
///
/// All of these are detected before any side effect happens, so the plan can
/// be retried once the catalog is fixed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Can not resolve dependency '{name}' of package '{required_by}'")]
    UnresolvedDependency {
        name: PackageName,
        required_by: PackageName,
    },

    #[error("Circular dependency detected: {}", format_cycle(.path))]
    DependencyCycle { path: Vec<PackageName> },
}

fn format_cycle(path: &[PackageName]) -> String {
    path.iter()
        .map(PackageName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Failure of the fetch collaborator.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{role} '{reference}' not found at {}", path.display())]
    Missing {
        role: &'static str,
        reference: String,
        path: PathBuf,
    },

    #[error("{role} '{reference}' must be a plain relative path")]
    UnsafeReference {
        role: &'static str,
        reference: String,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("HTTP error fetching '{url}': {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    #[error("Server returned {status} for '{url}'")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of the install-step collaborator.
#[derive(Error, Debug)]
pub enum InstallStepError {
    #[error("Failed to unpack {}: {source}", archive.display())]
    Unpack {
        archive: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid path in archive: {}", .0.display())]
    UnsafePath(PathBuf),

    #[error("Failed to launch install script {}: {source}", script.display())]
    Launch {
        script: PathBuf,
        source: std::io::Error,
    },

    #[error("Install script {} exited with {status}", script.display())]
    Script {
        script: PathBuf,
        status: std::process::ExitStatus,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to record a package as installed.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Cause of a failed install step.
#[derive(Error, Debug)]
pub enum StepFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Install(#[from] InstallStepError),
}

/// Errors raised while executing a plan.
///
/// These happen after side effects have begun. Packages committed before the
/// failure stay installed; re-plan from the current installed state instead of
/// resuming.
#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("Package '{name}' has kind '{kind}' which can not be installed yet")]
    UnsupportedPackageKind {
        name: PackageName,
        kind: &'static str,
    },

    #[error("Installing {package} ({version}) failed: {source}")]
    InstallStepFailed {
        package: PackageName,
        version: Version,
        source: StepFailure,
    },

    #[error("Recording {package} as installed failed: {source}")]
    Commit {
        package: PackageName,
        source: StoreError,
    },
}

impl ExecuteError {
    /// Name of the package whose action failed.
    pub fn package(&self) -> &PackageName {
        match self {
            Self::UnsupportedPackageKind { name, .. } => name,
            Self::InstallStepFailed { package, .. } | Self::Commit { package, .. } => package,
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine home directory. Set JPKG_HOME to override.")]
    NoHome,

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
