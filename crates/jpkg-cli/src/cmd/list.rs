use anyhow::Result;

use crate::ops::Context;
use crate::ui::list::write_packages;

/// List all installed packages
pub fn list(ctx: &Context) -> Result<()> {
    let store = ctx.installed()?;

    if store.catalog().is_empty() {
        println!();
        println!("  No packages installed.");
        println!("  Run 'jpkg install <package>' to get started.");
        return Ok(());
    }

    write_packages(&mut std::io::stdout().lock(), store.catalog().iter(), "installed")?;
    Ok(())
}
