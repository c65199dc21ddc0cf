//! Install planning
//!
//! Turns a list of requested package names into an ordered, deduplicated
//! list of [`Action`]s. Dependencies always come before their dependents.
//!
//! The plan is built back to front: requested names are visited in reverse,
//! each package's resolved dependencies are visited in reverse, and every
//! accepted package is pushed onto the front of the working list. When a
//! package turns up a second time the position it already has is the one
//! closest to the end of execution order, which is exactly the slot that
//! precedes every package that needs it. The working list is reversed once
//! at the end to give execution order.

use std::collections::VecDeque;

use jpkg_schema::{Package, PackageName, SemverOrder, Version, VersionOrder};

use crate::catalog::Catalog;
use crate::error::PlanError;
use crate::resolver::resolve_transitive_dependencies;

/// What the executor should do with a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// Not installed yet.
    Install,
    /// Installed at exactly this version; install it again.
    Reinstall,
    /// Installed at a different version; replace it.
    Update { previous: Version },
}

/// One planned unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub package: Package,
    pub kind: ActionKind,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ActionKind::Install => write!(f, "install {}", self.package),
            ActionKind::Reinstall => write!(f, "reinstall {}", self.package),
            ActionKind::Update { previous } => write!(
                f,
                "update {} {} -> {}",
                self.package.name, previous, self.package.version
            ),
        }
    }
}

/// Advisory produced while planning. Never an error on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The requested name is not in the available catalog; it was skipped.
    NotAvailable { name: PackageName },

    /// The requested package is already installed and reinstall was not asked for.
    AlreadyInstalled { name: PackageName, version: Version },

    /// An installed, requested package has a newer available version.
    NewerVersionAvailable {
        name: PackageName,
        installed: Version,
        available: Version,
    },

    /// A dependency is installed at an older version than available.
    ///
    /// Planning stops and no actions are returned: the caller has to update
    /// the dependency first, or ask for dependencies to be reinstalled.
    DependencyOutdated {
        dependency: PackageName,
        required_by: PackageName,
        installed: Version,
        available: Version,
    },
}

impl Notice {
    /// Returns true if this notice stopped the plan.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::DependencyOutdated { .. })
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAvailable { name } => write!(f, "Package '{name}' is not available"),
            Self::AlreadyInstalled { name, version } => {
                write!(f, "Package '{name}' is already installed in version {version}")
            }
            Self::NewerVersionAvailable {
                name,
                installed,
                available,
            } => write!(
                f,
                "Newer version of '{name}' available: {installed} -> {available}"
            ),
            Self::DependencyOutdated {
                dependency,
                required_by,
                installed,
                available,
            } => write!(
                f,
                "Newer version available for {dependency} ({installed} -> {available}), \
                 required by {required_by}; update dependencies first"
            ),
        }
    }
}

/// Policy flags for a planning run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanOptions {
    /// Plan requested packages even when they are already installed.
    pub reinstall: bool,
    /// Plan every dependency regardless of its installed state.
    pub reinstall_dependencies: bool,
}

/// The planner's result: actions in execution order plus advisories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub actions: Vec<Action>,
    pub notices: Vec<Notice>,
}

impl Plan {
    /// Returns true if a blocking notice stopped planning.
    pub fn is_blocked(&self) -> bool {
        self.notices.iter().any(Notice::is_blocking)
    }

    /// Returns true if there is nothing to execute.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Plans installs against a pair of catalog snapshots.
pub struct Planner<'a> {
    available: &'a Catalog,
    installed: &'a Catalog,
    versions: &'a dyn VersionOrder,
}

impl std::fmt::Debug for Planner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("available", &self.available.len())
            .field("installed", &self.installed.len())
            .finish_non_exhaustive()
    }
}

impl<'a> Planner<'a> {
    /// Create a planner using [`SemverOrder`] to compare versions.
    pub fn new(available: &'a Catalog, installed: &'a Catalog) -> Self {
        Self {
            available,
            installed,
            versions: &SemverOrder,
        }
    }

    /// Use a different version ordering.
    pub fn with_version_order(mut self, versions: &'a dyn VersionOrder) -> Self {
        self.versions = versions;
        self
    }

    pub fn available(&self) -> &'a Catalog {
        self.available
    }

    pub fn installed(&self) -> &'a Catalog {
        self.installed
    }

    pub fn versions(&self) -> &'a dyn VersionOrder {
        self.versions
    }

    /// Plan the requested packages.
    ///
    /// Unknown names and already-installed packages produce notices and are
    /// skipped; planning continues with the remaining names. An outdated
    /// installed dependency stops planning with an empty action list and a
    /// [`Notice::DependencyOutdated`].
    ///
    /// Requested packages that do not depend on each other execute in reverse
    /// request order: `["a", "c"]` runs `c` before `a`.
    ///
    /// # Errors
    ///
    /// Returns a [`PlanError`] if a dependency can not be resolved or forms a
    /// cycle. No partial plan is returned in that case.
    pub fn plan<S: AsRef<str>>(
        &self,
        requested: &[S],
        options: PlanOptions,
    ) -> Result<Plan, PlanError> {
        // Reverse execution order; reversed once at the end.
        let mut planned: VecDeque<&'a Package> = VecDeque::new();
        let mut notices = Vec::new();

        for name in requested.iter().rev() {
            let name = name.as_ref();

            let Some(package) = self.available.get(name) else {
                tracing::info!("Package '{name}' is not available");
                notices.push(Notice::NotAvailable { name: name.into() });
                continue;
            };

            if planned.contains(&package) {
                tracing::debug!("{package} already planned");
                continue;
            }

            if !options.reinstall {
                if let Some(current) = self.installed.get(name) {
                    tracing::info!("{current} is already installed");
                    notices.push(Notice::AlreadyInstalled {
                        name: current.name.clone(),
                        version: current.version.clone(),
                    });
                    if self.versions.is_newer(&package.version, &current.version) {
                        notices.push(Notice::NewerVersionAvailable {
                            name: current.name.clone(),
                            installed: current.version.clone(),
                            available: package.version.clone(),
                        });
                    }
                    continue;
                }
            }

            let dependencies = resolve_transitive_dependencies(package, self.available)?;
            let mut block: VecDeque<&'a Package> = VecDeque::new();

            for dependency in dependencies.into_iter().rev() {
                if block.contains(&dependency) || planned.contains(&dependency) {
                    continue;
                }

                if !options.reinstall_dependencies {
                    if let Some(current) = self.installed.get(&dependency.name) {
                        if self
                            .versions
                            .is_newer(&dependency.version, &current.version)
                        {
                            let notice = Notice::DependencyOutdated {
                                dependency: dependency.name.clone(),
                                required_by: package.name.clone(),
                                installed: current.version.clone(),
                                available: dependency.version.clone(),
                            };
                            tracing::warn!("{notice}");
                            notices.push(notice);
                            return Ok(Plan {
                                actions: Vec::new(),
                                notices,
                            });
                        }
                        tracing::trace!("{current} satisfies {}", package.name);
                        continue;
                    }
                }

                block.push_front(dependency);
            }

            block.push_front(package);
            while let Some(entry) = block.pop_back() {
                planned.push_front(entry);
            }
        }

        let actions: Vec<Action> = planned
            .into_iter()
            .rev()
            .map(|package| self.classify(package))
            .collect();

        tracing::debug!("Planned {} actions", actions.len());
        Ok(Plan { actions, notices })
    }

    fn classify(&self, package: &Package) -> Action {
        let kind = match self.installed.get(&package.name) {
            None => ActionKind::Install,
            Some(current) if current == package => ActionKind::Reinstall,
            Some(current) => ActionKind::Update {
                previous: current.version.clone(),
            },
        };

        Action {
            package: package.clone(),
            kind,
        }
    }
}

/// Plan `requested` with the default version ordering.
///
/// # Errors
///
/// See [`Planner::plan`].
pub fn plan<S: AsRef<str>>(
    requested: &[S],
    available: &Catalog,
    installed: &Catalog,
    reinstall: bool,
    reinstall_dependencies: bool,
) -> Result<Plan, PlanError> {
    Planner::new(available, installed).plan(
        requested,
        PlanOptions {
            reinstall,
            reinstall_dependencies,
        },
    )
}
