//! Recording installed packages.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use jpkg_schema::{Package, PackageName};

use crate::catalog::{Catalog, CatalogLoader, CatalogWarning};
use crate::error::{CatalogError, StoreError};

/// Where the executor records a package once its action has completed.
pub trait InstalledStore {
    /// Record `package` as installed, replacing any entry with the same name.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the record can not be persisted.
    fn commit(&mut self, package: &Package) -> Result<(), StoreError>;
}

impl InstalledStore for Catalog {
    fn commit(&mut self, package: &Package) -> Result<(), StoreError> {
        self.insert(package.clone());
        Ok(())
    }
}

/// The installed catalog backed by `installedPackages/`.
///
/// Every commit writes `<name>.json` and updates the in-memory catalog.
#[derive(Debug)]
pub struct ManifestStore {
    dir: PathBuf,
    catalog: Catalog,
    origins: BTreeMap<PackageName, PathBuf>,
}

impl ManifestStore {
    /// Load the installed catalog from `dir`. A missing directory is empty.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if an existing manifest can not be read.
    pub fn open(dir: impl Into<PathBuf>) -> Result<(Self, Vec<CatalogWarning>), CatalogError> {
        let dir = dir.into();
        let loaded = CatalogLoader::new().allow_missing(true).load(&[&dir])?;
        Ok((
            Self {
                dir,
                catalog: loaded.catalog,
                origins: loaded.origins,
            },
            loaded.warnings,
        ))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn manifest_path(&self, name: &PackageName) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl InstalledStore for ManifestStore {
    fn commit(&mut self, package: &Package) -> Result<(), StoreError> {
        let path = self.manifest_path(&package.name);
        let write_err = |source| StoreError::Write {
            path: path.clone(),
            source,
        };

        let content = package.to_json()?;
        fs::create_dir_all(&self.dir).map_err(write_err)?;

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, content).map_err(write_err)?;
        fs::rename(&temp_path, &path).map_err(write_err)?;

        // Drop a manifest for the same package stored under another name
        if let Some(previous) = self.origins.insert(package.name.clone(), path.clone()) {
            if previous != path {
                fs::remove_file(&previous).map_err(|source| StoreError::Write {
                    path: previous.clone(),
                    source,
                })?;
            }
        }

        tracing::debug!("Recorded {} in {}", package, path.display());
        self.catalog.insert(package.clone());
        Ok(())
    }
}
