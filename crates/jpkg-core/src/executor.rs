//! Plan execution
//!
//! Runs planned actions strictly one after another. After each action the
//! package is committed to the installed store, so a failure part way leaves
//! every earlier package recorded and nothing after it touched.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use jpkg_schema::{Package, PackageKind, PackageName};

use crate::error::{ExecuteError, StepFailure};
use crate::io::fetch::{ArtifactRole, Fetcher};
use crate::io::install::{Artifacts, Installer};
use crate::io::store::InstalledStore;
use crate::planner::{Action, ActionKind};
use crate::reporter::{NullReporter, Reporter};

pub struct Executor<F, I> {
    fetcher: F,
    installer: I,
    reporter: Arc<dyn Reporter>,
    env: BTreeMap<String, String>,
    dry_run: bool,
}

impl<F: Fetcher, I: Installer> Executor<F, I> {
    pub fn new(fetcher: F, installer: I) -> Self {
        Self {
            fetcher,
            installer,
            reporter: Arc::new(NullReporter),
            env: BTreeMap::new(),
            dry_run: false,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Environment variables passed to every install step.
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Report each action without fetching, installing or committing.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Execute `actions` in order, committing each package to `store`.
    ///
    /// Returns the names of the packages processed.
    ///
    /// # Errors
    ///
    /// Stops at the first failing action. Packages committed before it stay
    /// committed.
    pub fn execute<S: InstalledStore + ?Sized>(
        &self,
        actions: &[Action],
        store: &mut S,
    ) -> Result<Vec<PackageName>, ExecuteError> {
        let start = Instant::now();
        let mut done = Vec::with_capacity(actions.len());

        if self.dry_run {
            self.reporter.section("Dry run");
        } else {
            self.reporter.section("Installing");
        }

        for action in actions {
            let package = &action.package;
            tracing::info!("Executing {action}");

            if let Err(e) = self.perform(action) {
                self.reporter
                    .failed(&package.name, &package.version, &e.to_string());
                return Err(e);
            }

            if !self.dry_run {
                if let Err(source) = store.commit(package) {
                    let e = ExecuteError::Commit {
                        package: package.name.clone(),
                        source,
                    };
                    self.reporter
                        .failed(&package.name, &package.version, &e.to_string());
                    return Err(e);
                }
            }

            self.reporter
                .done(&package.name, &package.version, verb(&action.kind));
            done.push(package.name.clone());
        }

        if !done.is_empty() {
            let action = if self.dry_run { "planned" } else { "processed" };
            self.reporter
                .summary(done.len(), action, start.elapsed().as_secs_f64());
        }
        Ok(done)
    }

    fn perform(&self, action: &Action) -> Result<(), ExecuteError> {
        let package = &action.package;
        match &package.kind {
            PackageKind::SourceControl => Err(ExecuteError::UnsupportedPackageKind {
                name: package.name.clone(),
                kind: package.kind.label(),
            }),
            PackageKind::Meta => {
                tracing::debug!("{package} is a meta package, nothing to install");
                Ok(())
            }
            PackageKind::Archive {
                source_ref,
                install_script_ref,
            } => {
                if self.dry_run {
                    self.reporter.info(&format!(
                        "Would {} using {source_ref} and {install_script_ref}",
                        action
                    ));
                    return Ok(());
                }
                self.install_archive(package, source_ref, install_script_ref)
                    .map_err(|source| ExecuteError::InstallStepFailed {
                        package: package.name.clone(),
                        version: package.version.clone(),
                        source,
                    })
            }
        }
    }

    fn install_archive(
        &self,
        package: &Package,
        source_ref: &str,
        install_script_ref: &str,
    ) -> Result<(), StepFailure> {
        self.reporter
            .installing(&package.name, &package.version, "fetching");
        let source = self.fetcher.fetch(ArtifactRole::Source, source_ref)?;
        let install_script = self
            .fetcher
            .fetch(ArtifactRole::InstallScript, install_script_ref)?;

        self.reporter
            .installing(&package.name, &package.version, "installing");
        self.installer.run_install(
            package,
            &Artifacts {
                source,
                install_script,
            },
            &self.env,
        )?;
        Ok(())
    }
}

fn verb(kind: &ActionKind) -> &'static str {
    match kind {
        ActionKind::Install => "installed",
        ActionKind::Reinstall => "reinstalled",
        ActionKind::Update { .. } => "updated",
    }
}
