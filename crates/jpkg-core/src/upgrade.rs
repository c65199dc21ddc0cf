//! Upgrade cascade
//!
//! Finds installed packages with a newer available version, adds every
//! installed package that depends on them (directly or not), and plans the
//! lot as reinstalls so stale packages are upgraded before their dependents
//! are rebuilt.

use std::collections::{HashMap, VecDeque};

use jpkg_schema::{Package, PackageName, VersionOrder};

use crate::catalog::Catalog;
use crate::error::PlanError;
use crate::planner::{Plan, PlanOptions, Planner};

/// The result of planning an upgrade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradePlan {
    /// Installed packages with a newer available version.
    pub stale: Vec<PackageName>,
    /// Names handed to the planner, in the order it received them.
    pub requested: Vec<PackageName>,
    pub plan: Plan,
}

impl UpgradePlan {
    /// Returns true if every installed package is up to date.
    pub fn is_up_to_date(&self) -> bool {
        self.stale.is_empty()
    }
}

/// Installed packages whose available counterpart is strictly newer, in name order.
pub fn stale_packages<'a>(
    available: &Catalog,
    installed: &'a Catalog,
    versions: &dyn VersionOrder,
) -> Vec<&'a Package> {
    installed
        .iter()
        .filter(|current| match available.get(&current.name) {
            Some(candidate) => versions.is_newer(&candidate.version, &current.version),
            None => {
                tracing::debug!("{current} is no longer available");
                false
            }
        })
        .collect()
}

/// Every installed package that transitively depends on `name`.
///
/// Listed depth-first, direct dependents before their own dependents, one
/// entry per path.
///
/// # Errors
///
/// Returns [`PlanError::DependencyCycle`] if the installed dependency graph
/// loops back onto the current path.
pub fn dependent_closure(name: &str, installed: &Catalog) -> Result<Vec<PackageName>, PlanError> {
    let dependents = reverse_edges(installed, installed);
    let mut closure = Vec::new();
    let mut path = Vec::new();
    collect_dependents(name, &dependents, &mut path, &mut closure)?;
    Ok(closure)
}

/// Names to hand to the planner for an upgrade, in planner input order.
///
/// Dependency edges come from the descriptor each installed package will be
/// planned with, so a stale package whose new version starts depending on
/// another stale package is ordered after it.
///
/// # Errors
///
/// See [`dependent_closure`].
pub fn upgrade_requests(
    available: &Catalog,
    installed: &Catalog,
    versions: &dyn VersionOrder,
) -> Result<Vec<PackageName>, PlanError> {
    let stale = stale_packages(available, installed, versions);
    let effective = effective_catalog(available, installed);
    let dependents = reverse_edges(installed, &effective);

    let mut merged = Vec::new();
    for package in &stale {
        merged.push(package.name.clone());
        let mut path = Vec::new();
        collect_dependents(&package.name, &dependents, &mut path, &mut merged)?;
    }

    // Keep each name at its last position: a dependent then follows every
    // stale package it was reached from.
    let mut unique: VecDeque<PackageName> = VecDeque::new();
    for name in merged.into_iter().rev() {
        if !unique.contains(&name) {
            unique.push_front(name);
        }
    }

    Ok(unique.into_iter().rev().collect())
}

impl Planner<'_> {
    /// Plan an upgrade of every stale installed package and a rebuild of
    /// everything installed on top of them.
    ///
    /// Dependents that are no longer in the available catalog are rebuilt
    /// from their installed descriptor.
    ///
    /// # Errors
    ///
    /// Returns a [`PlanError`] if the installed graph has a cycle or a
    /// dependency can not be resolved.
    pub fn plan_upgrade(&self) -> Result<UpgradePlan, PlanError> {
        let available = self.available();
        let installed = self.installed();
        let versions = self.versions();

        let stale: Vec<PackageName> = stale_packages(available, installed, versions)
            .into_iter()
            .map(|p| p.name.clone())
            .collect();
        if stale.is_empty() {
            tracing::info!("All packages are up to date");
            return Ok(UpgradePlan::default());
        }

        let requested = upgrade_requests(available, installed, versions)?;
        tracing::debug!("Upgrade requests: {requested:?}");

        let effective = effective_catalog(available, installed);

        let plan = Planner::new(&effective, installed)
            .with_version_order(versions)
            .plan(
                requested.as_slice(),
                PlanOptions {
                    reinstall: true,
                    reinstall_dependencies: false,
                },
            )?;

        Ok(UpgradePlan {
            stale,
            requested,
            plan,
        })
    }
}

/// Plan an upgrade with the default version ordering.
///
/// # Errors
///
/// See [`Planner::plan_upgrade`].
pub fn plan_upgrade(available: &Catalog, installed: &Catalog) -> Result<UpgradePlan, PlanError> {
    Planner::new(available, installed).plan_upgrade()
}

/// Installed packages overlaid with their available descriptors.
fn effective_catalog(available: &Catalog, installed: &Catalog) -> Catalog {
    let mut effective = installed.clone();
    for package in available.iter() {
        effective.insert(package.clone());
    }
    effective
}

/// Maps each name to the installed packages depending on it, reading each
/// installed package's dependencies from `descriptors`.
fn reverse_edges<'a>(
    installed: &'a Catalog,
    descriptors: &'a Catalog,
) -> HashMap<&'a str, Vec<&'a PackageName>> {
    let mut dependents: HashMap<&str, Vec<&PackageName>> = HashMap::new();
    for installed_package in installed.iter() {
        let package = descriptors
            .get(&installed_package.name)
            .unwrap_or(installed_package);
        for dependency in &package.dependencies {
            dependents
                .entry(dependency.as_str())
                .or_default()
                .push(&package.name);
        }
    }
    dependents
}

fn collect_dependents(
    name: &str,
    dependents: &HashMap<&str, Vec<&PackageName>>,
    path: &mut Vec<PackageName>,
    closure: &mut Vec<PackageName>,
) -> Result<(), PlanError> {
    path.push(PackageName::new(name));

    for dependent in dependents.get(name).into_iter().flatten() {
        if let Some(start) = path.iter().position(|p| p == *dependent) {
            let mut cycle = path[start..].to_vec();
            cycle.push((*dependent).clone());
            return Err(PlanError::DependencyCycle { path: cycle });
        }

        closure.push((*dependent).clone());
        collect_dependents(dependent, dependents, path, closure)?;
    }

    path.pop();
    Ok(())
}
