//! Upgrade command - upgrade outdated packages and rebuild their dependents

use anyhow::Result;
use jpkg_core::Planner;

use crate::ops::{Context, apply_plan};

/// Upgrade every installed package with a newer available version.
pub fn upgrade(ctx: &Context) -> Result<()> {
    let available = ctx.available()?;
    let mut store = ctx.installed()?;

    let upgrade = Planner::new(&available, store.catalog()).plan_upgrade()?;
    if upgrade.is_up_to_date() {
        ctx.reporter.success("All packages are up to date.");
        return Ok(());
    }
    tracing::debug!("Outdated: {:?}", upgrade.stale);

    apply_plan(ctx, &upgrade.plan, &mut store, "upgrade")
}
