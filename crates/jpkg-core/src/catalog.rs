//! Manifest catalogs
//!
//! A [`Catalog`] maps package names to descriptors. Every run builds two: the
//! *available* catalog (what could be installed) and the *installed* catalog
//! (what is on the system). Planning only ever borrows them; the executor is
//! the single writer of the installed one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use jpkg_schema::{Package, PackageName, Version};
use walkdir::WalkDir;

use crate::error::CatalogError;

/// Mapping from package name to package descriptor. Keys are unique.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    packages: BTreeMap<PackageName, Package>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a package by name.
    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    /// Returns true if a package with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Insert or overwrite a package by name, returning the replaced entry.
    pub fn insert(&mut self, package: Package) -> Option<Package> {
        self.packages.insert(package.name.clone(), package)
    }

    /// Iterate packages in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    /// Number of packages.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns true if the catalog holds no packages.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Packages whose name contains any of the queries, case-insensitively.
    ///
    /// An empty query list matches everything.
    pub fn search<S: AsRef<str>>(&self, queries: &[S]) -> Vec<&Package> {
        let needles: Vec<String> = queries.iter().map(|q| q.as_ref().to_lowercase()).collect();
        self.iter()
            .filter(|p| {
                needles.is_empty() || {
                    let name = p.name.to_lowercase();
                    needles.iter().any(|n| name.contains(n.as_str()))
                }
            })
            .collect()
    }
}

impl FromIterator<Package> for Catalog {
    fn from_iter<I: IntoIterator<Item = Package>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for package in iter {
            catalog.insert(package);
        }
        catalog
    }
}

/// A non-fatal problem found while loading a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    /// Two manifests declared the same name; the later one was kept.
    Duplicate {
        name: PackageName,
        replaced: Version,
        by: Version,
        source: PathBuf,
    },
}

impl std::fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicate {
                name,
                replaced,
                by,
                source,
            } => write!(
                f,
                "Package '{name}' defined more than once; {replaced} replaced by {by} from {}",
                source.display()
            ),
        }
    }
}

/// A loaded catalog together with the warnings collected while loading it.
#[derive(Debug, Default)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub warnings: Vec<CatalogWarning>,
    /// Manifest file each surviving entry was read from.
    pub origins: BTreeMap<PackageName, PathBuf>,
}

/// Builds a [`Catalog`] from directories of JSON manifests.
///
/// Each directory is scanned non-recursively in file name order. Files whose
/// name starts with `.` are ignored. Later definitions of a name win over
/// earlier ones, across files and across directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogLoader {
    allow_missing: bool,
}

impl CatalogLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat a missing directory as empty instead of failing.
    pub fn allow_missing(mut self, allow: bool) -> Self {
        self.allow_missing = allow;
        self
    }

    /// Load every manifest from the given directories.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingDirectory`] for an absent directory
    /// (unless allowed), or the first manifest that fails to read or parse.
    pub fn load<P: AsRef<Path>>(&self, sources: &[P]) -> Result<LoadedCatalog, CatalogError> {
        let mut loaded = LoadedCatalog::default();

        for dir in sources {
            let dir = dir.as_ref();
            if !dir.is_dir() {
                if self.allow_missing {
                    tracing::debug!("Catalog directory {} missing, treating as empty", dir.display());
                    continue;
                }
                return Err(CatalogError::MissingDirectory(dir.to_path_buf()));
            }

            for path in manifest_files(dir)? {
                let package = Package::from_file(&path)?;
                tracing::trace!("Loaded {} from {}", package, path.display());

                if let Some(previous) = loaded.catalog.insert(package.clone()) {
                    let warning = CatalogWarning::Duplicate {
                        name: package.name.clone(),
                        replaced: previous.version,
                        by: package.version.clone(),
                        source: path.clone(),
                    };
                    tracing::warn!("{warning}");
                    loaded.warnings.push(warning);
                }
                loaded.origins.insert(package.name, path);
            }
        }

        tracing::debug!("Loaded {} packages", loaded.catalog.len());
        Ok(loaded)
    }
}

fn manifest_files(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|source| CatalogError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !hidden && entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
