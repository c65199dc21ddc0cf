use jpkg_schema::{Package, PackageName};

use crate::catalog::Catalog;
use crate::error::PlanError;

/// Computes the transitive dependency closure of a package against the
/// available catalog.
///
/// Performs a depth-first walk in declaration order: each dependency is
/// listed, immediately followed by its own transitive dependencies, before
/// moving on to the next declared dependency. A package reachable along
/// several paths is listed once per path; deduplication is left to the
/// planner.
///
/// # Errors
///
/// Returns [`PlanError::UnresolvedDependency`] if a declared dependency is
/// not in the catalog, or [`PlanError::DependencyCycle`] if a package is
/// reached again while it is still on the current path.
pub fn resolve_transitive_dependencies<'a>(
    package: &Package,
    available: &'a Catalog,
) -> Result<Vec<&'a Package>, PlanError> {
    let mut resolved = Vec::new();
    let mut path = Vec::new();

    resolve_recursive(package, available, &mut path, &mut resolved)?;

    Ok(resolved)
}

fn resolve_recursive<'a>(
    package: &Package,
    available: &'a Catalog,
    path: &mut Vec<PackageName>,
    resolved: &mut Vec<&'a Package>,
) -> Result<(), PlanError> {
    path.push(package.name.clone());

    for dep_name in &package.dependencies {
        if let Some(start) = path.iter().position(|p| p == dep_name) {
            let mut cycle = path[start..].to_vec();
            cycle.push(dep_name.clone());
            return Err(PlanError::DependencyCycle { path: cycle });
        }

        let dependency =
            available
                .get(dep_name)
                .ok_or_else(|| PlanError::UnresolvedDependency {
                    name: dep_name.clone(),
                    required_by: package.name.clone(),
                })?;

        tracing::trace!("{} requires {}", package.name, dependency);
        resolved.push(dependency);
        resolve_recursive(dependency, available, path, resolved)?;
    }

    path.pop();
    Ok(())
}
