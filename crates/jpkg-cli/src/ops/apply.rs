//! Present a plan, confirm it and run it.

use anyhow::{Result, bail};
use jpkg_core::io::ManifestStore;
use jpkg_core::{Notice, Plan};

use crate::ops::Context;
use crate::ui::{plan::write_actions, prompt::confirm};

/// Report notices, print the actions, ask for confirmation and execute.
///
/// A blocked plan is an error: the requested work did not happen.
pub fn apply_plan(ctx: &Context, plan: &Plan, store: &mut ManifestStore, verb: &str) -> Result<()> {
    for notice in &plan.notices {
        match notice {
            Notice::DependencyOutdated { .. } => ctx.reporter.error(&notice.to_string()),
            Notice::NotAvailable { .. } => ctx.reporter.warning(&notice.to_string()),
            Notice::AlreadyInstalled { .. } | Notice::NewerVersionAvailable { .. } => {
                ctx.reporter.info(&notice.to_string());
            }
        }
    }

    if plan.is_blocked() {
        bail!("Nothing to {verb}: update outdated dependencies first or pass --reinstall-deps");
    }
    if plan.is_empty() {
        ctx.reporter.info("Nothing to do.");
        return Ok(());
    }

    write_actions(&mut std::io::stdout().lock(), &plan.actions)?;

    if !ctx.dry_run && !ctx.yes && !confirm(&format!("Proceed with {verb}?"))? {
        ctx.reporter.info("Cancelled.");
        return Ok(());
    }

    ctx.executor()?.execute(&plan.actions, store)?;
    Ok(())
}
