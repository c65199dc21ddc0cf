//! Shared command context.
//!
//! This module defines the `Context` struct, which groups the resolved home
//! directory, configuration and reporter used by every command.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use jpkg_core::io::{DefaultFetcher, ManifestStore, ScriptInstaller};
use jpkg_core::{Catalog, CatalogLoader, CatalogWarning, Config, Executor, Layout, Reporter};

use crate::ui::ConsoleReporter;

/// Groups common state used by the commands.
#[derive(Clone)]
pub struct Context {
    pub home: PathBuf,
    pub config: Config,
    pub layout: Layout,
    pub reporter: Arc<dyn Reporter>,
    pub dry_run: bool,
    pub yes: bool,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("home", &self.home)
            .field("layout", &self.layout)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Resolve the home directory and load its configuration.
    pub fn load(home: Option<PathBuf>, dry_run: bool, yes: bool) -> Result<Self> {
        let home = match home {
            Some(home) => home,
            None => jpkg_core::jpkg_home()?,
        };
        let config = Config::load(&home).context("Failed to load configuration")?;
        let layout = config.layout(&home);
        tracing::debug!("Using package base {}", layout.base().display());

        Ok(Self {
            home,
            config,
            layout,
            reporter: Arc::new(ConsoleReporter::new()),
            dry_run,
            yes,
        })
    }

    /// Load the available catalog. The directory has to exist.
    pub fn available(&self) -> Result<Catalog> {
        let dir = self.layout.available_dir();
        let loaded = CatalogLoader::new()
            .load(&[&dir])
            .with_context(|| format!("Failed to load available packages from {}", dir.display()))?;
        self.report_warnings(&loaded.warnings);
        Ok(loaded.catalog)
    }

    /// Open the installed store. A missing directory means nothing is installed.
    pub fn installed(&self) -> Result<ManifestStore> {
        let (store, warnings) = ManifestStore::open(self.layout.installed_dir())
            .context("Failed to load installed packages")?;
        self.report_warnings(&warnings);
        Ok(store)
    }

    /// Executor wired to the local/HTTP fetcher and the script installer.
    pub fn executor(&self) -> Result<Executor<DefaultFetcher, ScriptInstaller>> {
        let fetcher = DefaultFetcher::from_layout(&self.layout)?;
        Ok(
            Executor::new(fetcher, ScriptInstaller::from_layout(&self.layout))
                .with_reporter(self.reporter.clone())
                .with_env(self.config.install_env.clone())
                .dry_run(self.dry_run),
        )
    }

    fn report_warnings(&self, warnings: &[CatalogWarning]) {
        for warning in warnings {
            self.reporter.warning(&warning.to_string());
        }
    }
}
