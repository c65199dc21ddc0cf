use anyhow::Result;

use crate::ops::Context;
use crate::ui::list::write_packages;

/// List every package that can be installed
pub fn available(ctx: &Context) -> Result<()> {
    let catalog = ctx.available()?;

    if catalog.is_empty() {
        println!();
        println!("  No packages available.");
        return Ok(());
    }

    write_packages(&mut std::io::stdout().lock(), catalog.iter(), "available")?;
    Ok(())
}
