//! Install command

use anyhow::Result;
use jpkg_core::{PlanOptions, Planner};

use crate::ops::{Context, apply_plan};

/// Install packages and every dependency they need.
pub fn install(
    ctx: &Context,
    packages: &[String],
    reinstall: bool,
    reinstall_dependencies: bool,
) -> Result<()> {
    let available = ctx.available()?;
    let mut store = ctx.installed()?;

    let plan = Planner::new(&available, store.catalog()).plan(
        packages,
        PlanOptions {
            reinstall,
            reinstall_dependencies,
        },
    )?;

    apply_plan(ctx, &plan, &mut store, "install")
}
