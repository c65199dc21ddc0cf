//! JSON package manifests
//!
//! One manifest describes one package:
//!
//! ```json
//! {
//!   "name": "lib",
//!   "version": "1.2.0",
//!   "type": "archive",
//!   "dependencies": ["base"],
//!   "sourceFile": "lib-1.2.0.tar.gz",
//!   "installScript": "lib.sh"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{PackageName, Version};

/// Errors that can occur when loading or parsing a manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("Failed to read manifest {}: {source}", path.display())]
    Io {
        /// Path of the manifest file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The manifest content is not a valid package description.
    #[error("Invalid manifest {}: {source}", path.display())]
    Parse {
        /// Path of the manifest file (empty when parsed from a string).
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// A required field is present but empty.
    #[error("Invalid manifest {}: empty field '{field}'", path.display())]
    EmptyField {
        /// Path of the manifest file (empty when parsed from a string).
        path: PathBuf,
        /// Name of the offending field.
        field: &'static str,
    },
}

/// How a package's content is obtained and installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PackageKind {
    /// A source archive unpacked and installed by a script.
    Archive {
        /// Identifier of the fetchable source archive.
        #[serde(rename = "sourceFile")]
        source_ref: String,
        /// Identifier of the fetchable install script.
        #[serde(rename = "installScript")]
        install_script_ref: String,
    },
    /// A package with no content of its own, only dependencies.
    Meta,
    /// Reserved for packages checked out from version control. Not installable yet.
    #[serde(rename = "git")]
    SourceControl,
}

impl PackageKind {
    /// Short lowercase label matching the manifest `type` field.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Archive { .. } => "archive",
            Self::Meta => "meta",
            Self::SourceControl => "git",
        }
    }
}

/// An immutable package descriptor.
///
/// Two packages are equal when their name and version are equal; kind and
/// dependencies do not take part in identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    /// Unique name within a catalog.
    pub name: PackageName,
    /// Version token.
    pub version: Version,
    /// Content kind and its fetch references.
    #[serde(flatten)]
    pub kind: PackageKind,
    /// Dependency names in declaration order.
    #[serde(default)]
    pub dependencies: Vec<PackageName>,
}

impl PartialEq for Package {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.version == other.version
    }
}

impl Eq for Package {}

impl std::fmt::Display for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.version)
    }
}

impl Package {
    /// Build a meta package. Mostly useful for tests and synthetic catalogs.
    pub fn meta(name: &str, version: &str, dependencies: &[&str]) -> Self {
        Self {
            name: PackageName::new(name),
            version: Version::new(version),
            kind: PackageKind::Meta,
            dependencies: dependencies.iter().map(|d| PackageName::new(d)).collect(),
        }
    }

    /// Build an archive package whose source and script references are
    /// derived from its name and version.
    pub fn archive(name: &str, version: &str, dependencies: &[&str]) -> Self {
        Self {
            name: PackageName::new(name),
            version: Version::new(version),
            kind: PackageKind::Archive {
                source_ref: format!("{name}-{version}.tar.gz"),
                install_script_ref: format!("{name}.sh"),
            },
            dependencies: dependencies.iter().map(|d| PackageName::new(d)).collect(),
        }
    }

    /// Parse a manifest from a JSON file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Io`] if the file cannot be read, or
    /// [`ManifestError::Parse`] / [`ManifestError::EmptyField`] if the
    /// content is not a valid manifest.
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_at(&content, path)
    }

    /// Parse a manifest from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Parse`] if the JSON does not match the
    /// manifest schema, or [`ManifestError::EmptyField`] if `name` or
    /// `version` is empty.
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        Self::parse_at(content, Path::new(""))
    }

    fn parse_at(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let package: Self = serde_json::from_str(content).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let empty = |field| ManifestError::EmptyField {
            path: path.to_path_buf(),
            field,
        };
        if package.name.is_empty() {
            return Err(empty("name"));
        }
        if package.version.is_empty() {
            return Err(empty("version"));
        }
        if let PackageKind::Archive {
            source_ref,
            install_script_ref,
        } = &package.kind
        {
            if source_ref.is_empty() {
                return Err(empty("sourceFile"));
            }
            if install_script_ref.is_empty() {
                return Err(empty("installScript"));
            }
        }

        Ok(package)
    }

    /// Serialize this package to a pretty-printed manifest.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl std::str::FromStr for Package {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
